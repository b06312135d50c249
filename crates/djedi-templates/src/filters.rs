use serde_json::Value;

use crate::error::TemplateError;
use crate::quotes::for_each_unquoted;
use crate::value::is_truthy;
use crate::value::render_value;

/// A filter implementation: the value being filtered and the resolved
/// argument, if the filter was given one.
pub type FilterFn = fn(Value, Option<Value>) -> Result<Value, TemplateError>;

/// Whether a filter takes an argument (`value|default:'x'`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterArity {
    NoArgument,
    Required,
}

#[derive(Clone, Copy, Debug)]
pub struct FilterSpec {
    pub func: FilterFn,
    pub arity: FilterArity,
}

/// Split a variable expression (the content between `{{ }}`) into segments
/// separated by `|`, respecting quoted strings.
pub(crate) fn split_variable_expression(content: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for_each_unquoted(
        content,
        |ch| ch == '|',
        false,
        |idx| {
            segments.push(&content[start..idx]);
            start = idx + 1;
            false
        },
    );

    segments.push(&content[start..]);
    segments
}

/// Split a single raw filter string (e.g. `default:'nothing'` or `lower`)
/// into its name and raw argument.
pub(crate) fn parse_filter(raw: &str) -> (&str, Option<&str>) {
    let trimmed = raw.trim();
    let mut colon_pos = None;

    for_each_unquoted(
        trimmed,
        |ch| ch == ':',
        false,
        |idx| {
            colon_pos = Some(idx);
            true
        },
    );

    match colon_pos {
        Some(pos) => {
            let arg = trimmed[pos + 1..].trim();
            (trimmed[..pos].trim(), (!arg.is_empty()).then_some(arg))
        }
        None => (trimmed, None),
    }
}

#[allow(clippy::unnecessary_wraps)]
pub(crate) fn default(value: Value, arg: Option<Value>) -> Result<Value, TemplateError> {
    if is_truthy(&value) {
        Ok(value)
    } else {
        Ok(arg.unwrap_or(Value::Null))
    }
}

#[allow(clippy::unnecessary_wraps, clippy::needless_pass_by_value)]
pub(crate) fn lower(value: Value, _arg: Option<Value>) -> Result<Value, TemplateError> {
    Ok(Value::String(render_value(&value).to_lowercase()))
}

#[allow(clippy::unnecessary_wraps, clippy::needless_pass_by_value)]
pub(crate) fn upper(value: Value, _arg: Option<Value>) -> Result<Value, TemplateError> {
    Ok(Value::String(render_value(&value).to_uppercase()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_split_segments() {
        assert_eq!(
            split_variable_expression("title|default:'a|b'|upper"),
            vec!["title", "default:'a|b'", "upper"]
        );
        assert_eq!(split_variable_expression("title"), vec!["title"]);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("lower"), ("lower", None));
        assert_eq!(parse_filter(" default : 'x:y' "), ("default", Some("'x:y'")));
        assert_eq!(parse_filter("default:"), ("default", None));
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default(json!(""), Some(json!("x"))).unwrap(), json!("x"));
        assert_eq!(default(json!("y"), Some(json!("x"))).unwrap(), json!("y"));
        assert_eq!(default(json!(0), Some(json!(5))).unwrap(), json!(5));
    }

    #[test]
    fn test_case_filters() {
        assert_eq!(lower(json!("HeLLo"), None).unwrap(), json!("hello"));
        assert_eq!(upper(json!("HeLLo"), None).unwrap(), json!("HELLO"));
        assert_eq!(upper(json!(true), None).unwrap(), json!("TRUE"));
    }
}
