use serde_json::Map;
use serde_json::Value;

/// Substitute `{name}` placeholders from `context`.
///
/// `{{` and `}}` produce literal braces. Placeholders without a matching key
/// are left untouched so content authors can see what went missing.
pub(crate) fn format_placeholders(source: &str, context: &Map<String, Value>) -> String {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(idx) = rest.find(['{', '}']) {
        output.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if tail.starts_with("{{") {
            output.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            output.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            output.push('}');
            rest = &tail[1..];
        } else if let Some(close) = tail.find('}') {
            let name = &tail[1..close];
            match context.get(name) {
                Some(value) => output.push_str(&display(value)),
                None => output.push_str(&tail[..=close]),
            }
            rest = &tail[close + 1..];
        } else {
            output.push_str(tail);
            rest = "";
        }
    }

    output.push_str(rest);
    output
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
