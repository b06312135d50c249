use std::borrow::Cow;

use serde_json::Map;
use serde_json::Value;

use crate::error::ContentError;
use crate::format::format_placeholders;
use crate::plugins::Plugin;
use crate::uri::Uri;

/// A resolved content node.
///
/// Nodes are produced by a [`ContentStore`](crate::ContentStore) and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    uri: Uri,
    default: String,
    content: Option<String>,
}

impl Node {
    pub fn new(uri: Uri, default: impl Into<String>, content: Option<String>) -> Self {
        Self {
            uri,
            default: default.into(),
            content,
        }
    }

    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    #[must_use]
    pub fn default_text(&self) -> &str {
        &self.default
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Render the stored content, or the default when nothing is stored.
    ///
    /// Returns `None` when there is nothing to show.
    pub fn render(&self, context: &Map<String, Value>) -> Result<Option<String>, ContentError> {
        let source = self.content.as_deref().unwrap_or(&self.default);
        if source.is_empty() {
            return Ok(None);
        }

        let plugin = Plugin::for_uri(&self.uri)?;
        let source = if context.is_empty() {
            Cow::Borrowed(source)
        } else {
            Cow::Owned(format_placeholders(source, context))
        };

        Ok(Some(plugin.render(&source)))
    }
}
