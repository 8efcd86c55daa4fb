//! Tree construction.

/// Token-driven tree builder with the incremental cascade.
pub mod builder;
/// Tokenizer and builder wired together.
pub mod document;

pub use builder::{LayoutHook, NoLayout, TreeBuilder};
pub use document::HTMLParser;
