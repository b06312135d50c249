use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::arguments::parse_bits;
use crate::arguments::ResolvedArguments;
use crate::arguments::Signature;
use crate::context::Context;
use crate::error::TemplateError;
use crate::filters;
use crate::filters::FilterArity;
use crate::filters::FilterFn;
use crate::filters::FilterSpec;
use crate::nodelist::TemplateNode;
use crate::parser::Parser;
use crate::tokens::TagToken;

/// Compile function of a tag: consumes whatever it needs from the parser and
/// returns the node that renders the tag.
pub type TagCompiler = dyn Fn(&mut Parser<'_>, &TagToken) -> Result<Box<dyn TemplateNode>, TemplateError>
    + Send
    + Sync;

/// Render step produced by a lazy tag at compile time.
pub type RenderFn = Box<dyn Fn(&Context) -> Result<String, TemplateError> + Send + Sync>;

/// Registered tags and filters.
#[derive(Clone, Default)]
pub struct Library {
    tags: FxHashMap<String, Arc<TagCompiler>>,
    filters: FxHashMap<String, FilterSpec>,
}

impl Library {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The filters every engine knows about.
    #[must_use]
    pub fn builtins() -> Self {
        let mut library = Self::new();
        library
            .filter("default", filters::default, FilterArity::Required)
            .filter("lower", filters::lower, FilterArity::NoArgument)
            .filter("upper", filters::upper, FilterArity::NoArgument);
        library
    }

    /// Register a tag with its own compile function.
    pub fn tag<F>(&mut self, name: &str, compile: F) -> &mut Self
    where
        F: Fn(&mut Parser<'_>, &TagToken) -> Result<Box<dyn TemplateNode>, TemplateError>
            + Send
            + Sync
            + 'static,
    {
        self.tags.insert(name.to_string(), Arc::new(compile));
        self
    }

    /// Register a lazy tag.
    ///
    /// The tag's arguments are bound to `signature` and resolved once, at
    /// compile time, against an empty context; `factory` receives them and
    /// returns the function that renders the tag. A variable therefore
    /// resolves to the empty string, and a variable given for one of the
    /// `literal` parameters is a syntax error.
    pub fn lazy_tag<F>(
        &mut self,
        name: &str,
        signature: Signature,
        literal: &[&str],
        factory: F,
    ) -> &mut Self
    where
        F: Fn(&ResolvedArguments) -> Result<RenderFn, TemplateError> + Send + Sync + 'static,
    {
        let tag_name = name.to_string();
        let literal: Vec<String> = literal.iter().map(|param| (*param).to_string()).collect();
        self.tag(name, move |parser, token| {
            let bits = token.split_contents();
            let bound = parse_bits(parser, bits.get(1..).unwrap_or_default(), &signature, &tag_name)?;

            let variable = bound
                .named_expressions(&signature)
                .find(|(param, expr)| literal.iter().any(|l| l == *param) && !expr.is_literal());
            if let Some((param, expr)) = variable {
                return Err(TemplateError::syntax(format!(
                    "'{tag_name}' tag on line {} requires a literal '{param}', got '{}'",
                    token.line(),
                    expr.token()
                )));
            }

            let resolved = bound.resolve(&signature, &Context::new())?;
            let render = factory(&resolved)?;
            Ok(Box::new(LazyNode { render }))
        })
    }

    pub fn filter(&mut self, name: &str, func: FilterFn, arity: FilterArity) -> &mut Self {
        self.filters
            .insert(name.to_string(), FilterSpec { func, arity });
        self
    }

    /// Add everything from `other`, replacing same-named entries.
    pub fn merge(&mut self, other: &Library) -> &mut Self {
        self.tags
            .extend(other.tags.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
        self.filters
            .extend(other.filters.iter().map(|(k, v)| (k.clone(), *v)));
        self
    }

    #[must_use]
    pub fn get_tag(&self, name: &str) -> Option<&Arc<TagCompiler>> {
        self.tags.get(name)
    }

    #[must_use]
    pub fn get_filter(&self, name: &str) -> Option<&FilterSpec> {
        self.filters.get(name)
    }

}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.tags.keys().collect();
        tags.sort();
        let mut filters: Vec<_> = self.filters.keys().collect();
        filters.sort();
        f.debug_struct("Library")
            .field("tags", &tags)
            .field("filters", &filters)
            .finish()
    }
}

struct LazyNode {
    render: RenderFn,
}

impl TemplateNode for LazyNode {
    fn render(&self, context: &Context) -> Result<String, TemplateError> {
        (self.render)(context)
    }
}
