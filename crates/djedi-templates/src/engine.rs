use crate::context::Context;
use crate::error::TemplateError;
use crate::lexer::Lexer;
use crate::library::Library;
use crate::nodelist::NodeList;
use crate::parser::Parser;

/// Compiles templates against a set of libraries.
#[derive(Clone, Debug)]
pub struct Engine {
    library: Library,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the builtin filters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            library: Library::builtins(),
        }
    }

    #[must_use]
    pub fn with_library(mut self, library: &Library) -> Self {
        self.library.merge(library);
        self
    }

    /// Compile `source`. Syntax errors abort compilation.
    pub fn from_string(&self, source: &str) -> Result<Template, TemplateError> {
        let tokens = Lexer::new(source).tokenize();
        let nodelist = Parser::new(tokens, &self.library).parse(&[])?;
        Ok(Template { nodelist })
    }
}

/// A compiled template. Safe to render from several threads at once.
#[derive(Debug)]
pub struct Template {
    nodelist: NodeList,
}

impl Template {
    pub fn render(&self, context: &Context) -> Result<String, TemplateError> {
        self.nodelist.render(context)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_plain_template() {
        let engine = Engine::new();
        let template = engine
            .from_string("<h1>{{ page.title|default:'Untitled'|upper }}</h1>")
            .unwrap();

        insta::assert_snapshot!(template.render(&Context::new()).unwrap(), @"<h1>UNTITLED</h1>");

        let context = Context::new().with("page", json!({"title": "Start"}));
        insta::assert_snapshot!(template.render(&context).unwrap(), @"<h1>START</h1>");
    }

    #[test]
    fn test_scalar_rendering() {
        let template = Engine::new()
            .from_string("{{ a }} {{ b }} {{ c }} {{ 3 }}")
            .unwrap();
        let context = Context::new()
            .with("a", json!(null))
            .with("b", json!(true))
            .with("c", json!(1.5));
        assert_eq!(template.render(&context).unwrap(), "None True 1.5 3");
    }

    #[test]
    fn test_syntax_error_aborts() {
        assert!(Engine::new().from_string("{{ x|unknown }}").unwrap_err().is_syntax());
    }

    #[test]
    fn test_template_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Template>();
        assert_send_sync::<Engine>();
    }
}
