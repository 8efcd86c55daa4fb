//! Style sheets, selectors and the incremental cascade for the Marmot pipeline.
//!
//! # Scope
//!
//! - **Style-block parsing**: qualified rules with comma-separated selector
//!   lists and `property: value` declarations. Comments are stripped and
//!   at-rules skipped.
//! - **Selectors**: `#id`, `.class` and tag names joined by whitespace.
//! - **Cascade**: specificity `[0, ids, classes, tags]`; a property keeps its
//!   first value unless a strictly more specific rule matches.
//!
//! # Not Implemented
//!
//! - Child, sibling, attribute and pseudo selectors
//! - Inheritance, `!important`, inline `style` attributes
//! - Value parsing (values stay raw strings)

/// Cascade application per element.
pub mod cascade;
/// Style-block parser.
pub mod parser;
/// Selector parsing and stack-based matching.
pub mod selector;

pub use cascade::apply_rules;
pub use parser::{CssRule, Declaration, parse_stylesheet};
pub use selector::{Selector, SelectorPart};
