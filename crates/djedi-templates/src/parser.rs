use crate::error::TemplateError;
use crate::expression::FilterExpression;
use crate::library::Library;
use crate::nodelist::NodeList;
use crate::nodelist::TextNode;
use crate::nodelist::VariableNode;
use crate::tokens::TagToken;
use crate::tokens::Token;

/// Builds a [`NodeList`] from tokens, handing `{% … %}` tokens to the compile
/// function the library registered for the tag.
///
/// Block tags call [`Parser::parse`] recursively with their closing tag names
/// to consume their body.
pub struct Parser<'lib> {
    tokens: Vec<Token>,
    current: usize,
    library: &'lib Library,
    command_stack: Vec<(String, usize)>,
}

impl<'lib> Parser<'lib> {
    #[must_use]
    pub fn new(tokens: Vec<Token>, library: &'lib Library) -> Self {
        Self {
            tokens,
            current: 0,
            library,
            command_stack: Vec::new(),
        }
    }

    /// Parse until a block tag named in `parse_until` (left unconsumed) or,
    /// with an empty `parse_until`, until the end of the stream.
    pub fn parse(&mut self, parse_until: &[&str]) -> Result<NodeList, TemplateError> {
        let mut nodelist = NodeList::default();

        while let Some(token) = self.peek().cloned() {
            match token {
                Token::Text { content, .. } => {
                    self.current += 1;
                    nodelist.push(Box::new(TextNode::new(content)));
                }
                Token::Comment { .. } => {
                    self.current += 1;
                }
                Token::Variable { content, line } => {
                    self.current += 1;
                    if content.is_empty() {
                        return Err(TemplateError::syntax(format!(
                            "Empty variable tag on line {line}"
                        )));
                    }
                    let expression = self.compile_filter(&content)?;
                    nodelist.push(Box::new(VariableNode::new(expression)));
                }
                Token::Error { content, line } => {
                    return Err(TemplateError::syntax(format!(
                        "Unclosed template construct on line {line}: '{content}'"
                    )));
                }
                Token::Block { content, line } => {
                    let tag = TagToken::new(content, line);
                    let Some(command) = tag.name() else {
                        return Err(TemplateError::syntax(format!(
                            "Empty block tag on line {line}"
                        )));
                    };

                    if parse_until.contains(&command) {
                        return Ok(nodelist);
                    }
                    self.current += 1;

                    let library = self.library;
                    let Some(compile) = library.get_tag(command) else {
                        return Err(self.invalid_block_tag(command, line, parse_until));
                    };

                    tracing::trace!(tag = command, line, "compiling tag");
                    self.command_stack.push((command.to_string(), line));
                    let node = compile(self, &tag)?;
                    self.command_stack.pop();
                    nodelist.push(node);
                }
            }
        }

        if !parse_until.is_empty() {
            return Err(self.unclosed_block_tag(parse_until));
        }

        Ok(nodelist)
    }

    /// Drop the token [`Parser::parse`] stopped at, normally the closing tag.
    pub fn delete_first_token(&mut self) {
        if self.current < self.tokens.len() {
            self.current += 1;
        }
    }

    /// Compile an expression such as `page.title|default:'x'` using the
    /// filters known to this parser.
    pub fn compile_filter(&self, token: &str) -> Result<FilterExpression, TemplateError> {
        FilterExpression::compile(token, self.library)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn invalid_block_tag(&self, command: &str, line: usize, parse_until: &[&str]) -> TemplateError {
        if parse_until.is_empty() {
            TemplateError::syntax(format!(
                "Invalid block tag on line {line}: '{command}'. Did you forget to register this tag?"
            ))
        } else {
            let expected = parse_until
                .iter()
                .map(|name| format!("'{name}'"))
                .collect::<Vec<_>>()
                .join(", ");
            let opener = self
                .command_stack
                .last()
                .map(|(name, _)| name.as_str())
                .unwrap_or_default();
            TemplateError::syntax(format!(
                "Invalid block tag on line {line}: '{command}', expected {expected} to close '{opener}'"
            ))
        }
    }

    fn unclosed_block_tag(&self, parse_until: &[&str]) -> TemplateError {
        let (command, line) = self
            .command_stack
            .last()
            .map_or(("", 0), |(name, line)| (name.as_str(), *line));
        TemplateError::syntax(format!(
            "Unclosed tag on line {line}: '{command}'. Looking for one of: {}.",
            parse_until.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::context::Context;
    use crate::lexer::Lexer;
    use crate::nodelist::TemplateNode;

    /// `{% upper %}…{% endupper %}` renders its body uppercased.
    struct UpperNode {
        nodelist: NodeList,
    }

    impl TemplateNode for UpperNode {
        fn render(&self, context: &Context) -> Result<String, TemplateError> {
            Ok(self.nodelist.render(context)?.to_uppercase())
        }
    }

    fn library() -> Library {
        let mut library = Library::builtins();
        library.tag("upper", |parser, _token| {
            let nodelist = parser.parse(&["endupper"])?;
            parser.delete_first_token();
            Ok(Box::new(UpperNode { nodelist }))
        });
        library
    }

    fn parse(source: &str) -> Result<NodeList, TemplateError> {
        let library = library();
        let mut parser = Parser::new(Lexer::new(source).tokenize(), &library);
        parser.parse(&[])
    }

    #[test]
    fn test_text_and_variables() {
        let nodelist = parse("Hello {{ name|default:'you' }}!{# ignored #}").unwrap();
        assert_eq!(nodelist.len(), 3);
        let context = Context::new().with("name", json!("World"));
        assert_eq!(nodelist.render(&context).unwrap(), "Hello World!");
        assert_eq!(nodelist.render(&Context::new()).unwrap(), "Hello you!");
    }

    #[test]
    fn test_block_tag_consumes_body() {
        let nodelist = parse("a{% upper %}b{{ x }}{% endupper %}c").unwrap();
        assert_eq!(nodelist.len(), 3);
        let context = Context::new().with("x", "y");
        assert_eq!(nodelist.render(&context).unwrap(), "aBYc");
    }

    #[test]
    fn test_nested_block_tags() {
        let nodelist = parse("{% upper %}{% upper %}a{% endupper %}b{% endupper %}").unwrap();
        assert_eq!(nodelist.render(&Context::new()).unwrap(), "AB");
    }

    #[test]
    fn test_unclosed_block_tag() {
        let err = parse("\n{% upper %}never closed").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unclosed tag on line 2: 'upper'. Looking for one of: endupper."
        );
    }

    #[test]
    fn test_unknown_tag() {
        let err = parse("{% nope %}").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("'nope'"));
    }

    #[test]
    fn test_unknown_tag_inside_block() {
        let err = parse("{% upper %}{% endblocknode %}").unwrap_err();
        assert!(err.to_string().contains("expected 'endupper' to close 'upper'"));
    }

    #[test]
    fn test_unclosed_construct() {
        let err = parse("text {{ name").unwrap_err();
        assert!(err.to_string().starts_with("Unclosed template construct on line 1"));
    }

    #[test]
    fn test_empty_constructs() {
        assert!(parse("{{ }}").unwrap_err().is_syntax());
        assert!(parse("{% %}").unwrap_err().is_syntax());
    }
}
