//! Content nodes for djedi templates.
//!
//! A node is addressed by a [`Uri`], looked up through a [`ContentStore`] with
//! a default text, and rendered to markup by the [`Plugin`] its extension
//! selects.

mod error;
mod format;
mod node;
mod plugins;
mod store;
mod uri;

pub use error::ContentError;
pub use error::UriError;
pub use node::Node;
pub use plugins::Plugin;
pub use store::ContentStore;
pub use store::MemoryStore;
pub use uri::Uri;
pub use uri::UriDefaults;
