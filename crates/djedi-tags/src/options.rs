use djedi_templates::is_truthy;
use djedi_templates::Map;
use djedi_templates::Value;

/// Render-time keyword arguments of a `blocknode`, split into the edit flag
/// and the values handed to the node as its format context.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeOptions {
    pub edit: bool,
    pub extra: Map<String, Value>,
}

impl NodeOptions {
    /// `edit` defaults to on and follows template truthiness; every other
    /// keyword passes through untouched.
    #[must_use]
    pub fn split(mut kwargs: Map<String, Value>) -> Self {
        let edit = kwargs.remove("edit").is_none_or(|value| is_truthy(&value));
        Self {
            edit,
            extra: kwargs,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn kwargs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_edit_defaults_on() {
        let options = NodeOptions::split(kwargs(json!({"foo": 1, "bar": 2})));
        assert!(options.edit);
        assert_eq!(Value::Object(options.extra), json!({"foo": 1, "bar": 2}));
    }

    #[test]
    fn test_edit_is_removed() {
        let options = NodeOptions::split(kwargs(json!({"edit": false, "foo": "x"})));
        assert!(!options.edit);
        assert!(!options.extra.contains_key("edit"));
        assert_eq!(options.extra.len(), 1);
    }

    #[test]
    fn test_edit_truthiness() {
        for (value, expected) in [
            (json!(""), false),
            (json!(0), false),
            (json!(null), false),
            (json!("yes"), true),
            (json!(1), true),
        ] {
            assert_eq!(NodeOptions::split(kwargs(json!({"edit": value}))).edit, expected);
        }
    }
}
