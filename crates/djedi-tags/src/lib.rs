//! Template tags that place djedi content nodes in a page.
//!
//! - `{% node key [default] [edit] %}` looks its node up once, when the
//!   template compiles. Its arguments must be literals.
//! - `{% blocknode uri [edit] [name=value ...] %}default{% endblocknode %}`
//!   takes its default text from the block body. A literal URI is looked up
//!   when the template compiles; a URI that needs the render context is
//!   looked up on every render. Extra keyword arguments are resolved per
//!   render and used to fill `{name}` placeholders in the node.
//!
//! With `edit` on (the default) output is wrapped in a
//! `<span data-i18n="...">` envelope naming the node's canonical URI.

mod blocknode;
mod dedent;
mod node_tag;
mod options;
mod render;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use djedi_content::ContentStore;
use djedi_templates::Engine;
use djedi_templates::Library;

pub use crate::blocknode::BlockNode;
pub use crate::dedent::dedent;
pub use crate::dedent::default_text;
pub use crate::options::NodeOptions;
pub use crate::render::render_node;

/// The `node` and `blocknode` tags, resolving nodes through `store`.
#[must_use]
pub fn library(store: Arc<dyn ContentStore>) -> Library {
    let mut library = Library::new();

    let node_store = Arc::clone(&store);
    library.lazy_tag(node_tag::TAG, node_tag::signature(), &["key"], move |args| {
        node_tag::compile(&node_store, args)
    });
    library.tag(blocknode::TAG, move |parser, token| {
        Ok(Box::new(BlockNode::compile(&store, parser, token)?))
    });

    library
}

/// An engine with the builtin filters and the djedi tags.
#[must_use]
pub fn engine(store: Arc<dyn ContentStore>) -> Engine {
    Engine::new().with_library(&library(store))
}
