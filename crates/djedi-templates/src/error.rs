use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template Syntax Error
    ///
    /// Raised while compiling a template. Common causes include:
    /// - Unknown tags or filters
    /// - Block tags without their closing tag
    /// - Tag arguments that do not match the tag's signature
    /// - Unterminated `{{`, `{%` or `{#` constructs
    #[error("{0}")]
    Syntax(String),

    /// A tag received arguments it cannot make sense of, e.g. two URIs.
    #[error("Malformed arguments to {tag} tag")]
    MalformedArguments { tag: String },

    /// Failure raised by a collaborator while rendering (content lookup,
    /// node rendering). Passed through untouched.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TemplateError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    pub fn other<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Other(err.into())
    }

    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_) | Self::MalformedArguments { .. })
    }
}
