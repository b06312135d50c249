use std::sync::Arc;

use djedi_content::ContentStore;
use djedi_content::Node;
use djedi_templates::parse_bits;
use djedi_templates::render_value;
use djedi_templates::BoundArguments;
use djedi_templates::Context;
use djedi_templates::FilterExpression;
use djedi_templates::NodeList;
use djedi_templates::Parser;
use djedi_templates::Signature;
use djedi_templates::TagToken;
use djedi_templates::TemplateError;
use djedi_templates::TemplateNode;

use crate::dedent::default_text;
use crate::options::NodeOptions;
use crate::render::render_node;

pub(crate) const TAG: &str = "blocknode";
const END_TAG: &str = "endblocknode";

/// `{% blocknode uri [edit] [name=value ...] %}default{% endblocknode %}`
fn signature() -> Signature {
    Signature::new(&["uri", "edit"]).with_defaults(1).with_varkw()
}

/// Where a block's node comes from.
enum NodeTarget {
    /// Looked up while compiling: the URI was a literal.
    Resolved(Node),
    /// Looked up on every render, once the URI expression can be resolved.
    Pending { uri: FilterExpression, default: String },
}

/// A `blocknode` tag. Its body, rendered without context, is the node's
/// default text.
pub struct BlockNode {
    store: Arc<dyn ContentStore>,
    nodelist: NodeList,
    target: NodeTarget,
    arguments: BoundArguments,
}

impl BlockNode {
    pub(crate) fn compile(
        store: &Arc<dyn ContentStore>,
        parser: &mut Parser<'_>,
        token: &TagToken,
    ) -> Result<Self, TemplateError> {
        let bits = token.split_contents();
        let mut arguments =
            parse_bits(parser, bits.get(1..).unwrap_or_default(), &signature(), TAG)?;

        if arguments.args.len() > 1 {
            return Err(TemplateError::MalformedArguments {
                tag: TAG.to_string(),
            });
        }
        let Some(uri) = arguments
            .args
            .first()
            .cloned()
            .or_else(|| arguments.kwargs.remove("uri"))
        else {
            return Err(TemplateError::syntax(format!(
                "'{TAG}' did not receive value(s) for the argument(s): 'uri'"
            )));
        };

        let nodelist = parser.parse(&[END_TAG])?;
        parser.delete_first_token();
        let default = default_text(&nodelist.render(&Context::new())?);

        let target = if uri.is_literal() {
            let key = render_value(&uri.resolve(&Context::new())?);
            let node = store.get_key(&key, &default).map_err(TemplateError::other)?;
            tracing::debug!(uri = %node.uri(), line = token.line(), "resolved blocknode");
            NodeTarget::Resolved(node)
        } else {
            tracing::debug!(
                expression = uri.token(),
                line = token.line(),
                "deferring blocknode lookup to render time"
            );
            NodeTarget::Pending { uri, default }
        };

        Ok(Self {
            store: Arc::clone(store),
            nodelist,
            target,
            arguments,
        })
    }

    /// Whether the node was looked up at compile time.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.target, NodeTarget::Resolved(_))
    }

    #[must_use]
    pub fn default_text(&self) -> &str {
        match &self.target {
            NodeTarget::Resolved(node) => node.default_text(),
            NodeTarget::Pending { default, .. } => default,
        }
    }
}

impl TemplateNode for BlockNode {
    fn render(&self, context: &Context) -> Result<String, TemplateError> {
        let looked_up;
        let node = match &self.target {
            NodeTarget::Resolved(node) => node,
            NodeTarget::Pending { uri, default } => {
                let key = render_value(&uri.resolve(context)?);
                tracing::trace!(expression = uri.token(), key = %key, "resolving deferred blocknode");
                looked_up = self
                    .store
                    .get_key(&key, default)
                    .map_err(TemplateError::other)?;
                &looked_up
            }
        };

        let options = NodeOptions::split(self.arguments.resolve_kwargs(context)?);
        render_node(node, &options.extra, options.edit).map_err(TemplateError::other)
    }
}

impl std::fmt::Debug for BlockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockNode")
            .field("resolved", &self.is_resolved())
            .field("default", &self.default_text())
            .field("nodelist", &self.nodelist)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use djedi_templates::Engine;
    use djedi_templates::Lexer;
    use djedi_templates::Library;
    use serde_json::json;

    use super::*;
    use crate::testing::RecordingStore;

    /// Compile a `blocknode` whose opening tag reads `contents`, with the
    /// parser positioned just after it.
    fn compile(
        store: &Arc<RecordingStore>,
        contents: &str,
        rest: &str,
    ) -> Result<BlockNode, TemplateError> {
        let store: Arc<dyn ContentStore> = store.clone();
        let library = Library::builtins();
        let mut parser = Parser::new(Lexer::new(rest).tokenize(), &library);
        BlockNode::compile(&store, &mut parser, &TagToken::new(contents, 1))
    }

    #[test]
    fn test_literal_uri_resolves_at_compile_time() {
        let store = RecordingStore::new();
        let node = compile(
            &store,
            "blocknode 'page/body'",
            "\n    Hello\n    World\n{% endblocknode %}",
        )
        .unwrap();

        assert!(node.is_resolved());
        assert_eq!(node.default_text(), "Hello\nWorld");
        assert_eq!(
            store.lookups(),
            vec![("page/body".to_string(), "Hello\nWorld".to_string())]
        );

        node.render(&Context::new()).unwrap();
        node.render(&Context::new().with("x", 1)).unwrap();
        assert_eq!(store.lookups().len(), 1);
    }

    #[test]
    fn test_variable_uri_is_deferred() {
        let store = RecordingStore::new();
        let node = compile(&store, "blocknode page_uri", "Default{% endblocknode %}").unwrap();

        assert!(!node.is_resolved());
        assert_eq!(node.default_text(), "Default");
        assert!(store.lookups().is_empty());

        let output = node
            .render(&Context::new().with("page_uri", "page/intro"))
            .unwrap();
        assert_eq!(output, r#"<span data-i18n="en-us@page/intro">Default</span>"#);
        assert_eq!(
            store.lookups(),
            vec![("page/intro".to_string(), "Default".to_string())]
        );

        node.render(&Context::new().with("page_uri", "page/outro"))
            .unwrap();
        assert_eq!(store.lookups().len(), 2);
        assert_eq!(store.lookups()[1].0, "page/outro");
    }

    #[test]
    fn test_filtered_literal_is_resolved() {
        let store = RecordingStore::new();
        let node = compile(&store, "blocknode 'PAGE/Title'|lower", "x{% endblocknode %}").unwrap();
        assert!(node.is_resolved());
        assert_eq!(store.lookups()[0].0, "page/title");
    }

    #[test]
    fn test_filter_with_variable_argument_is_deferred() {
        let store = RecordingStore::new();
        let node = compile(&store, "blocknode ''|default:page_uri", "x{% endblocknode %}").unwrap();
        assert!(!node.is_resolved());
        assert!(store.lookups().is_empty());
    }

    #[test]
    fn test_uri_as_keyword() {
        let store = RecordingStore::new();
        let node = compile(
            &store,
            "blocknode uri='page/title' edit=False",
            "Title{% endblocknode %}",
        )
        .unwrap();
        assert!(node.is_resolved());
        assert_eq!(node.render(&Context::new()).unwrap(), "Title");
    }

    #[test]
    fn test_two_positional_arguments_are_malformed() {
        let store = RecordingStore::new();
        let err = compile(&store, "blocknode 'a' False", "x{% endblocknode %}").unwrap_err();
        assert!(matches!(err, TemplateError::MalformedArguments { .. }));
        assert_eq!(err.to_string(), "Malformed arguments to blocknode tag");
        assert!(store.lookups().is_empty());
    }

    #[test]
    fn test_keyword_arguments_reach_the_node() {
        let store = RecordingStore::new();
        let node = compile(
            &store,
            "blocknode 'page/x' edit=False foo=1 bar=bar",
            "{foo}, {bar} and {edit}{% endblocknode %}",
        )
        .unwrap();
        let output = node.render(&Context::new().with("bar", json!(2))).unwrap();
        assert_eq!(output, "1, 2 and {edit}");
    }

    #[test]
    fn test_body_ignores_render_context() {
        let store = RecordingStore::new();
        let template = Engine::new()
            .with_library(&crate::library(store.clone()))
            .from_string("{% blocknode 'page/x' edit=False %}Hi {{ name }}!{% endblocknode %}")
            .unwrap();
        assert_eq!(store.lookups()[0].1, "Hi !");
        assert_eq!(
            template
                .render(&Context::new().with("name", "World"))
                .unwrap(),
            "Hi !"
        );
    }

    #[test]
    fn test_debug() {
        let store = RecordingStore::new();
        let node = compile(&store, "blocknode page_uri", "x{% endblocknode %}").unwrap();
        insta::assert_snapshot!(
            format!("{node:?}"),
            @r#"BlockNode { resolved: false, default: "x", nodelist: NodeList { len: 1 }, .. }"#
        );
    }
}
