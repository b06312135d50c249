use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("Node URI '{0}' has an empty path")]
    EmptyPath(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Uri(#[from] UriError),

    #[error("No plugin for extension '{ext}' of node '{uri}'")]
    UnknownPlugin { ext: String, uri: String },

    /// Failure reported by a store backend.
    #[error("Content store error: {0}")]
    Store(String),
}
