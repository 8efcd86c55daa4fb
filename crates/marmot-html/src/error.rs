//! Tree-building errors.

use thiserror::Error;

/// Fatal errors raised while building the tree.
///
/// Tokenizing itself never fails; recoverable input problems are reported
/// with warnings instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An end tag did not name the element on top of the open-element stack.
    ///
    /// `open` is the tag name of the current element, or `None` when only the
    /// Document is open.
    #[error("end tag </{found}> does not match {}", describe_open(.open.as_deref()))]
    StructuralMismatch {
        /// Tag name of the element on top of the stack, if any.
        open: Option<String>,
        /// Tag name of the offending end tag.
        found: String,
    },
}

fn describe_open(open: Option<&str>) -> String {
    open.map_or_else(|| "the document (no open element)".to_string(), |name| format!("open element <{name}>"))
}
