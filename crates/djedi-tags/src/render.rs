use djedi_content::ContentError;
use djedi_content::Node;
use djedi_templates::Map;
use djedi_templates::Value;

/// Render `node` for a template, wrapped in the inline-edit envelope when
/// `edit` is set.
///
/// The envelope carries the canonical URI (no scheme, extension or version),
/// which is what the client-side editor addresses nodes by. A node with
/// nothing to show renders as the empty string.
pub fn render_node(
    node: &Node,
    context: &Map<String, Value>,
    edit: bool,
) -> Result<String, ContentError> {
    let output = node.render(context)?.unwrap_or_default();
    if edit {
        Ok(format!(
            r#"<span data-i18n="{}">{}</span>"#,
            node.uri().canonical(),
            output
        ))
    } else {
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use djedi_content::ContentStore;
    use djedi_content::MemoryStore;
    use serde_json::json;

    use super::*;

    fn node(key: &str, default: &str) -> Node {
        MemoryStore::default().get_key(key, default).unwrap()
    }

    #[test]
    fn test_edit_envelope() {
        let node = node("i18n://sv-se@page/title.txt#3", "Rubrik");
        insta::assert_snapshot!(
            render_node(&node, &Map::new(), true).unwrap(),
            @r#"<span data-i18n="sv-se@page/title">Rubrik</span>"#
        );
    }

    #[test]
    fn test_envelope_has_exactly_one_canonical_attribute() {
        let node = node("page/body.md", "Some *text*");
        let output = render_node(&node, &Map::new(), true).unwrap();
        assert_eq!(output.matches("data-i18n=").count(), 1);
        assert!(output.contains(&format!(r#"data-i18n="{}""#, node.uri().canonical())));
    }

    #[test]
    fn test_without_edit_is_bare_text() {
        let node = node("page/title", "Lorem ipsum");
        let output = render_node(&node, &Map::new(), false).unwrap();
        assert!(!output.contains("data-i18n"));
        assert_eq!(Some(output), node.render(&Map::new()).unwrap());
    }

    #[test]
    fn test_empty_content() {
        let node = node("page/title", "");
        assert_eq!(render_node(&node, &Map::new(), false).unwrap(), "");
        assert_eq!(
            render_node(&node, &Map::new(), true).unwrap(),
            r#"<span data-i18n="en-us@page/title"></span>"#
        );
    }

    #[test]
    fn test_context_reaches_node() {
        let node = node("page/greeting", "Hello {name}");
        let context = json!({"name": "World"}).as_object().cloned().unwrap();
        assert_eq!(render_node(&node, &context, false).unwrap(), "Hello World");
    }

    #[test]
    fn test_render_errors_propagate() {
        let node = node("page/logo.png", "x");
        assert!(matches!(
            render_node(&node, &Map::new(), true),
            Err(ContentError::UnknownPlugin { .. })
        ));
    }
}
