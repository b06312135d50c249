use crate::tokens::Token;

const BLOCK_TAG_START: &str = "{%";
const BLOCK_TAG_END: &str = "%}";
const VARIABLE_TAG_START: &str = "{{";
const VARIABLE_TAG_END: &str = "}}";
const COMMENT_TAG_START: &str = "{#";
const COMMENT_TAG_END: &str = "#}";

pub struct Lexer {
    source: String,
    start: usize,
    current: usize,
    line: usize,
}

impl Lexer {
    #[must_use]
    pub fn new(source: &str) -> Self {
        Lexer {
            source: String::from(source),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.start = self.current;
            let line = self.line;

            let token = match self.peek() {
                '{' => match self.peek_next() {
                    '%' => self.lex_django_construct(BLOCK_TAG_END, |content| Token::Block {
                        content,
                        line,
                    }),
                    '{' => self.lex_django_construct(VARIABLE_TAG_END, |content| {
                        Token::Variable { content, line }
                    }),
                    '#' => self.lex_django_construct(COMMENT_TAG_END, |content| {
                        Token::Comment { content, line }
                    }),
                    _ => self.lex_text(line),
                },
                _ => self.lex_text(line),
            };

            tokens.push(token);
        }

        tracing::trace!(count = tokens.len(), "tokenized template");
        tokens
    }

    fn lex_django_construct(
        &mut self,
        end: &str,
        token_fn: impl FnOnce(String) -> Token,
    ) -> Token {
        let line = self.line;
        self.consume_n(2);

        match self.consume_until(end) {
            Ok(text) => {
                self.consume_n(2);
                token_fn(text)
            }
            Err(err_text) => Token::Error {
                content: err_text,
                line,
            },
        }
    }

    fn lex_text(&mut self, line: usize) -> Token {
        // The first character is never a construct start, so always take it.
        self.consume();

        while !self.is_at_end() {
            let rest = &self.source[self.current..];
            if rest.starts_with(BLOCK_TAG_START)
                || rest.starts_with(VARIABLE_TAG_START)
                || rest.starts_with(COMMENT_TAG_START)
            {
                break;
            }
            self.consume();
        }

        Token::Text {
            content: self.source[self.start..self.current].to_string(),
            line,
        }
    }

    #[inline]
    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    #[inline]
    fn consume(&mut self) {
        if let Some(ch) = self.source[self.current..].chars().next() {
            if ch == '\n' {
                self.line += 1;
            }
            self.current += ch.len_utf8();
        }
    }

    fn consume_n(&mut self, count: usize) {
        for _ in 0..count {
            self.consume();
        }
    }

    fn consume_until(&mut self, delimiter: &str) -> Result<String, String> {
        let offset = self.current;

        while self.current < self.source.len() {
            if self.source[self.current..].starts_with(delimiter) {
                return Ok(self.source[offset..self.current].trim().to_string());
            }
            self.consume();
        }

        Err(self.source[self.start..self.current].trim().to_string())
    }
}
