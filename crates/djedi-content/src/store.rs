use dashmap::DashMap;

use crate::error::ContentError;
use crate::node::Node;
use crate::uri::Uri;
use crate::uri::UriDefaults;

/// Lookup of content nodes by URI.
///
/// Lookups must be idempotent; implementations may cache. Stores are shared
/// by every render of every compiled template, so they must be safe for
/// concurrent use.
pub trait ContentStore: Send + Sync {
    /// Resolve `uri` into a node that falls back to `default` when nothing
    /// is stored.
    fn get(&self, uri: &Uri, default: &str) -> Result<Node, ContentError>;

    fn get_key(&self, key: &str, default: &str) -> Result<Node, ContentError> {
        let uri: Uri = key.parse()?;
        self.get(&uri, default)
    }
}

/// In-memory store keyed by canonical URI.
#[derive(Debug, Default)]
pub struct MemoryStore {
    defaults: UriDefaults,
    nodes: DashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(defaults: UriDefaults) -> Self {
        Self {
            defaults,
            nodes: DashMap::new(),
        }
    }

    /// Store `content` for `key`, returning the fully qualified URI.
    pub fn set(&self, key: &str, content: impl Into<String>) -> Result<Uri, ContentError> {
        let uri = key.parse::<Uri>()?.with_defaults(&self.defaults);
        self.nodes.insert(uri.canonical().to_string(), content.into());
        Ok(uri)
    }

    pub fn remove(&self, key: &str) -> Result<Option<String>, ContentError> {
        let uri = key.parse::<Uri>()?.with_defaults(&self.defaults);
        Ok(self
            .nodes
            .remove(&uri.canonical().to_string())
            .map(|(_, content)| content))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn get(&self, uri: &Uri, default: &str) -> Result<Node, ContentError> {
        let uri = uri.with_defaults(&self.defaults);
        let content = self
            .nodes
            .get(&uri.canonical().to_string())
            .map(|entry| entry.value().clone());

        tracing::trace!(%uri, found = content.is_some(), "content lookup");
        Ok(Node::new(uri, default, content))
    }
}
