//! A small Django-style template engine.
//!
//! This crate provides the host side of djedi's template tags:
//! - Lexing template source into text, variable, block and comment tokens
//! - Compiling tokens into a node list, handing block tokens to registered tags
//! - Filter expressions with literal/variable heads and `|filter:arg` chains
//! - Binding tag arguments to a declared [`Signature`]
//! - Lazy tags, resolved at compile time and rendered later
//!
//! ## Example
//!
//! ```ignore
//! use djedi_templates::{Context, Engine};
//!
//! let template = Engine::new().from_string("Hello {{ name|default:'you' }}")?;
//! let output = template.render(&Context::new().with("name", "World"))?;
//! ```

mod arguments;
mod context;
mod engine;
mod error;
mod expression;
mod filters;
mod lexer;
mod library;
mod nodelist;
mod parser;
mod quotes;
mod tokens;
mod value;

pub use arguments::parse_bits;
pub use arguments::BoundArguments;
pub use arguments::ResolvedArguments;
pub use arguments::Signature;
pub use context::Context;
pub use engine::Engine;
pub use engine::Template;
pub use error::TemplateError;
pub use expression::FilterExpression;
pub use filters::FilterArity;
pub use filters::FilterFn;
pub use filters::FilterSpec;
pub use lexer::Lexer;
pub use library::Library;
pub use library::RenderFn;
pub use library::TagCompiler;
pub use nodelist::NodeList;
pub use nodelist::TemplateNode;
pub use nodelist::TextNode;
pub use nodelist::VariableNode;
pub use parser::Parser;
pub use tokens::TagToken;
pub use tokens::Token;
pub use value::is_truthy;
pub use value::render_value;
pub use value::Map;
pub use value::Value;
