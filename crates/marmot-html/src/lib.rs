//! HTML tokenizer and tree builder for the Marmot pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: a character-level state machine for tags, attributes
//!   (quoted, unquoted and valueless), self-closing tags and text. Input may
//!   arrive in fragments.
//! - **Tree builder**: an open-element stack with strict end-tag matching,
//!   text coalescing, `<style>` rule harvesting and per-element cascade.
//!
//! # Not Implemented
//!
//! - Comments, DOCTYPE, character references
//! - Raw text elements (`<style>` content is tokenized like any other text)
//! - Implied end tags and error recovery in tree construction

/// Tree-building errors.
pub mod error;
/// Tree construction.
pub mod parser;
/// HTML tokenizer.
pub mod tokenizer;

use marmot_dom::{DomTree, NodeId, NodeType};

pub use error::ParseError;
pub use parser::{HTMLParser, LayoutHook, NoLayout, TreeBuilder};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenSink, TokenizerState};

/// Parse a complete document.
///
/// # Errors
///
/// Returns [`ParseError::StructuralMismatch`] if an end tag does not close
/// the current element.
pub fn parse_html(html: &str) -> Result<DomTree, ParseError> {
    let mut parser = HTMLParser::new();
    parser.feed(html)?;
    Ok(parser.finish()?.into_tree())
}

/// Render the subtree at `id` as an indented outline, one node per line.
///
/// Elements show their attributes and, when the cascade set anything, their
/// computed style in braces.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

/// Print the subtree at `id` to stdout (see [`format_tree`]).
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_node(tree, id, indent, &mut out);
    print!("{out}");
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else { return };
    match &node.node_type {
        NodeType::Document => {
            out.push_str(&format!("{prefix}Document\n"));
        }
        NodeType::Element(data) => {
            let mut line = format!("{prefix}<{}", data.tag_name);
            for attr in &data.attributes {
                if attr.value.is_empty() {
                    line.push_str(&format!(" {}", attr.name));
                } else {
                    line.push_str(&format!(" {}=\"{}\"", attr.name, attr.value));
                }
            }
            line.push('>');
            if !data.computed_style.is_empty() {
                let style: Vec<String> = data
                    .computed_style
                    .iter()
                    .map(|(property, entry)| format!("{property}: {}", entry.value))
                    .collect();
                line.push_str(&format!(" {{ {} }}", style.join("; ")));
            }
            out.push_str(&line);
            out.push('\n');
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            out.push_str(&format!("{prefix}\"{display}\"\n"));
        }
    }
    for &child in tree.children(id) {
        write_node(tree, child, indent + 1, out);
    }
}
