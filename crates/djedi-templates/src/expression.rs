use serde_json::Number;
use serde_json::Value;

use crate::context::Context;
use crate::error::TemplateError;
use crate::filters::parse_filter;
use crate::filters::split_variable_expression;
use crate::filters::FilterArity;
use crate::filters::FilterFn;
use crate::library::Library;
use crate::quotes::unescape_string_literal;

/// The head of an expression: either a literal or a dotted lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum Variable {
    Literal(Value),
    Lookup(Vec<String>),
}

impl Variable {
    pub fn parse(token: &str) -> Result<Self, TemplateError> {
        let token = token.trim();

        if let Some(text) = unescape_string_literal(token) {
            return Ok(Variable::Literal(Value::String(text)));
        }

        match token {
            "True" => return Ok(Variable::Literal(Value::Bool(true))),
            "False" => return Ok(Variable::Literal(Value::Bool(false))),
            "None" => return Ok(Variable::Literal(Value::Null)),
            _ => {}
        }

        if let Some(number) = parse_number(token) {
            return Ok(Variable::Literal(Value::Number(number)));
        }

        if token.starts_with('_') || token.contains("._") {
            return Err(TemplateError::syntax(format!(
                "Variables and attributes may not begin with underscores: '{token}'"
            )));
        }

        let path: Vec<String> = token.split('.').map(String::from).collect();
        let valid = path.iter().all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
        });
        if !valid {
            return Err(TemplateError::syntax(format!(
                "Could not parse the remainder: '{token}'"
            )));
        }

        Ok(Variable::Lookup(path))
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Variable::Literal(_))
    }

    /// `None` when a lookup does not exist in `context`.
    #[must_use]
    pub fn resolve(&self, context: &Context) -> Option<Value> {
        match self {
            Variable::Literal(value) => Some(value.clone()),
            Variable::Lookup(path) => {
                let (first, rest) = path.split_first()?;
                let mut current = context.get(first)?;
                for segment in rest {
                    current = match current {
                        Value::Object(map) => map.get(segment)?,
                        Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                        _ => return None,
                    };
                }
                Some(current.clone())
            }
        }
    }
}

fn parse_number(token: &str) -> Option<Number> {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    if !digits.starts_with(|c: char| c.is_ascii_digit()) || token.ends_with('.') {
        return None;
    }
    if let Ok(int) = token.parse::<i64>() {
        return Some(Number::from(int));
    }
    token.parse::<f64>().ok().and_then(Number::from_f64)
}

#[derive(Clone, Debug)]
struct BoundFilter {
    func: FilterFn,
    arg: Option<Variable>,
}

/// A variable followed by a chain of filters, e.g. `title|default:'x'|upper`.
///
/// Compiled once, resolved against a context as often as needed.
#[derive(Clone, Debug)]
pub struct FilterExpression {
    token: String,
    var: Variable,
    filters: Vec<BoundFilter>,
}

impl FilterExpression {
    pub(crate) fn compile(token: &str, library: &Library) -> Result<Self, TemplateError> {
        let mut segments = split_variable_expression(token).into_iter();
        let head = segments.next().unwrap_or_default().trim();
        if head.is_empty() {
            return Err(TemplateError::syntax(format!(
                "Empty variable expression: '{token}'"
            )));
        }
        let var = Variable::parse(head)?;

        let mut filters = Vec::new();
        for segment in segments {
            let (name, raw_arg) = parse_filter(segment);
            if name.is_empty() {
                return Err(TemplateError::syntax(format!(
                    "Could not parse the remainder: '{token}'"
                )));
            }
            let spec = library
                .get_filter(name)
                .ok_or_else(|| TemplateError::syntax(format!("Invalid filter: '{name}'")))?;

            match (spec.arity, raw_arg) {
                (FilterArity::Required, None) => {
                    return Err(TemplateError::syntax(format!(
                        "{name} requires 2 arguments, 1 provided"
                    )));
                }
                (FilterArity::NoArgument, Some(_)) => {
                    return Err(TemplateError::syntax(format!(
                        "{name} requires 1 arguments, 2 provided"
                    )));
                }
                _ => {}
            }

            filters.push(BoundFilter {
                func: spec.func,
                arg: raw_arg.map(Variable::parse).transpose()?,
            });
        }

        Ok(Self {
            token: token.trim().to_string(),
            var,
            filters,
        })
    }

    /// The expression as written in the template.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// True when resolving needs no context: the variable and every filter
    /// argument are literals.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.var.is_literal()
            && self
                .filters
                .iter()
                .all(|filter| filter.arg.as_ref().is_none_or(Variable::is_literal))
    }

    /// Resolve against `context`. Missing variables become the empty string.
    pub fn resolve(&self, context: &Context) -> Result<Value, TemplateError> {
        let mut value = self.var.resolve(context).unwrap_or_else(|| {
            tracing::trace!(token = %self.token, "variable does not exist");
            Value::String(String::new())
        });

        for filter in &self.filters {
            let arg = filter
                .arg
                .as_ref()
                .map(|arg| arg.resolve(context).unwrap_or(Value::String(String::new())));
            value = (filter.func)(value, arg)?;
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn compile(token: &str) -> Result<FilterExpression, TemplateError> {
        FilterExpression::compile(token, &Library::builtins())
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            Variable::parse("'page/title'").unwrap(),
            Variable::Literal(json!("page/title"))
        );
        assert_eq!(
            Variable::parse(r#""it\"s""#).unwrap(),
            Variable::Literal(json!("it\"s"))
        );
    }

    #[test]
    fn test_keyword_literals() {
        assert_eq!(Variable::parse("True").unwrap(), Variable::Literal(json!(true)));
        assert_eq!(Variable::parse("False").unwrap(), Variable::Literal(json!(false)));
        assert_eq!(Variable::parse("None").unwrap(), Variable::Literal(json!(null)));
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(Variable::parse("42").unwrap(), Variable::Literal(json!(42)));
        assert_eq!(Variable::parse("-3").unwrap(), Variable::Literal(json!(-3)));
        assert_eq!(Variable::parse("1.5").unwrap(), Variable::Literal(json!(1.5)));
        assert!(!Variable::parse("nan").unwrap().is_literal());
    }

    #[test]
    fn test_lookups() {
        assert_eq!(
            Variable::parse("page.uri").unwrap(),
            Variable::Lookup(vec!["page".to_string(), "uri".to_string()])
        );
        assert!(!Variable::parse("page_uri").unwrap().is_literal());
    }

    #[test]
    fn test_invalid_lookups() {
        assert!(Variable::parse("_private").unwrap_err().is_syntax());
        assert!(Variable::parse("page._private").unwrap_err().is_syntax());
        assert!(Variable::parse("page..uri").unwrap_err().is_syntax());
        assert!(Variable::parse("'unterminated").unwrap_err().is_syntax());
        assert!(Variable::parse("1.").unwrap_err().is_syntax());
    }

    #[test]
    fn test_resolve_nested() {
        let context = Context::new().with("page", json!({"uris": ["a", "b"], "title": "T"}));
        let expr = compile("page.uris.1").unwrap();
        assert_eq!(expr.resolve(&context).unwrap(), json!("b"));
        let expr = compile("page.title").unwrap();
        assert_eq!(expr.resolve(&context).unwrap(), json!("T"));
    }

    #[test]
    fn test_missing_variable_is_empty_string() {
        let expr = compile("page.missing.deeper").unwrap();
        assert_eq!(expr.resolve(&Context::new()).unwrap(), json!(""));
    }

    #[test]
    fn test_filter_chain() {
        let context = Context::new().with("name", "");
        let expr = compile("name|default:'Anonymous'|upper").unwrap();
        assert_eq!(expr.resolve(&context).unwrap(), json!("ANONYMOUS"));
    }

    #[test]
    fn test_is_literal() {
        assert!(compile("'page/title'").unwrap().is_literal());
        assert!(compile("'Page'|lower").unwrap().is_literal());
        assert!(compile("'x'|default:'y'").unwrap().is_literal());
        assert!(!compile("page_uri").unwrap().is_literal());
        assert!(!compile("''|default:page_uri").unwrap().is_literal());
    }

    #[test]
    fn test_filter_errors() {
        assert!(compile("x|nope").unwrap_err().is_syntax());
        assert!(compile("x|default").unwrap_err().is_syntax());
        assert!(compile("x|lower:'a'").unwrap_err().is_syntax());
        assert!(compile("x|").unwrap_err().is_syntax());
        assert!(compile("").unwrap_err().is_syntax());
    }
}
