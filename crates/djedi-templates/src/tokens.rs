use crate::quotes::split_on_whitespace;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Block { content: String, line: usize },
    Comment { content: String, line: usize },
    Error { content: String, line: usize },
    Text { content: String, line: usize },
    Variable { content: String, line: usize },
}

/// A `{% … %}` token handed to a tag's compile function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagToken {
    contents: String,
    line: usize,
}

impl TagToken {
    #[must_use]
    pub fn new(contents: impl Into<String>, line: usize) -> Self {
        Self {
            contents: contents.into(),
            line,
        }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The tag name, i.e. the first bit.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.contents.split_whitespace().next()
    }

    /// Split on whitespace, keeping quoted strings together. The first bit
    /// is the tag name.
    #[must_use]
    pub fn split_contents(&self) -> Vec<String> {
        split_on_whitespace(&self.contents)
    }
}
