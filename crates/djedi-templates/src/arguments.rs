use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::context::Context;
use crate::error::TemplateError;
use crate::expression::FilterExpression;
use crate::parser::Parser;

/// The parameters a tag declares, in the order positional arguments bind.
///
/// The last `defaults` parameters are optional. `varkw` accepts extra
/// keyword arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    params: Vec<String>,
    defaults: usize,
    varkw: bool,
}

impl Signature {
    #[must_use]
    pub fn new(params: &[&str]) -> Self {
        Self {
            params: params.iter().map(|p| (*p).to_string()).collect(),
            defaults: 0,
            varkw: false,
        }
    }

    #[must_use]
    pub fn with_defaults(mut self, count: usize) -> Self {
        self.defaults = count.min(self.params.len());
        self
    }

    #[must_use]
    pub fn with_varkw(mut self) -> Self {
        self.varkw = true;
        self
    }

    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    fn optional_params(&self) -> &[String] {
        &self.params[self.params.len() - self.defaults..]
    }
}

/// Tag arguments bound to the signature but not yet resolved.
#[derive(Clone, Debug, Default)]
pub struct BoundArguments {
    pub args: Vec<FilterExpression>,
    pub kwargs: BTreeMap<String, FilterExpression>,
}

impl BoundArguments {
    /// Every expression paired with the parameter it bound to. Keyword
    /// arguments accepted through `varkw` keep their own name.
    pub fn named_expressions<'a>(
        &'a self,
        signature: &'a Signature,
    ) -> impl Iterator<Item = (&'a str, &'a FilterExpression)> {
        signature
            .params
            .iter()
            .map(String::as_str)
            .zip(&self.args)
            .chain(self.kwargs.iter().map(|(key, expr)| (key.as_str(), expr)))
    }

    /// Resolve the keyword arguments against `context`.
    pub fn resolve_kwargs(&self, context: &Context) -> Result<Map<String, Value>, TemplateError> {
        self.kwargs
            .iter()
            .map(|(key, expr)| Ok((key.clone(), expr.resolve(context)?)))
            .collect()
    }

    /// Resolve everything against `context`, naming positional arguments
    /// after the parameters they bound to.
    pub fn resolve(
        &self,
        signature: &Signature,
        context: &Context,
    ) -> Result<ResolvedArguments, TemplateError> {
        let named = self
            .named_expressions(signature)
            .map(|(name, expr)| Ok((name.to_string(), expr.resolve(context)?)))
            .collect::<Result<_, TemplateError>>()?;
        Ok(ResolvedArguments { named })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedArguments {
    named: Map<String, Value>,
}

impl ResolvedArguments {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }
}

/// Split a `name=value` bit. Names are word characters only, so quoted
/// strings containing `=` stay positional.
fn split_kwarg(bit: &str) -> Option<(&str, &str)> {
    let (name, value) = bit.split_once('=')?;
    let is_word = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    (is_word && !value.is_empty()).then_some((name, value))
}

/// Bind raw tag bits to `signature`, compiling each into a
/// [`FilterExpression`]. Every mismatch is a syntax error naming `tag`.
pub fn parse_bits(
    parser: &Parser<'_>,
    bits: &[String],
    signature: &Signature,
    tag: &str,
) -> Result<BoundArguments, TemplateError> {
    let mut bound = BoundArguments::default();
    let mut unhandled: Vec<&str> = signature.params.iter().map(String::as_str).collect();

    for bit in bits {
        if let Some((key, value)) = split_kwarg(bit) {
            let position = signature.params.iter().position(|param| param == key);
            if position.is_none() && !signature.varkw {
                return Err(TemplateError::syntax(format!(
                    "'{tag}' received unexpected keyword argument '{key}'"
                )));
            }
            if bound.kwargs.contains_key(key) || position.is_some_and(|pos| pos < bound.args.len()) {
                return Err(TemplateError::syntax(format!(
                    "'{tag}' received multiple values for keyword argument '{key}'"
                )));
            }
            bound
                .kwargs
                .insert(key.to_string(), parser.compile_filter(value)?);
            unhandled.retain(|param| *param != key);
        } else {
            if !bound.kwargs.is_empty() {
                return Err(TemplateError::syntax(format!(
                    "'{tag}' received some positional argument(s) after some keyword argument(s)"
                )));
            }
            let expr = parser.compile_filter(bit)?;
            if unhandled.is_empty() {
                return Err(TemplateError::syntax(format!(
                    "'{tag}' received too many positional arguments"
                )));
            }
            unhandled.remove(0);
            bound.args.push(expr);
        }
    }

    let optional = signature.optional_params();
    unhandled.retain(|param| !optional.iter().any(|opt| opt == param));
    if !unhandled.is_empty() {
        let missing = unhandled
            .iter()
            .map(|param| format!("'{param}'"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(TemplateError::syntax(format!(
            "'{tag}' did not receive value(s) for the argument(s): {missing}"
        )));
    }

    Ok(bound)
}
