//! High-level pipeline for the Marmot browser.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document loading**: fetch a page over HTTP/1.1, or read it from a
//!   file or string
//! - **Parsing**: tokenize and build the DOM with the incremental cascade
//! - **Layout order**: record the order elements reach the layout hook
//!
//! # Not Yet Implemented
//!
//! - Rendering (layout boxes, painting)
//! - External resources (`<link>` stylesheets, images, scripts)

/// Layout order recording.
pub mod layout;

pub use marmot_css as css;
pub use marmot_dom as dom;
pub use marmot_html as html;
pub use marmot_net as net;

pub use layout::LayoutRecorder;

use std::fs;
use std::io;
use std::path::Path;

use marmot_common::warning::clear_warnings;
use marmot_css::CssRule;
use marmot_dom::{DomTree, NodeId};
use marmot_html::{HTMLParser, HTMLTokenizer, ParseError, Token};
use marmot_net::{FetchError, Request, Response};
use thiserror::Error;

/// A fetched (or read) and parsed document.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Where the document came from: `host:port/path`, a file path, or
    /// `<string>`.
    pub source: String,

    /// The response the document came from, when it was fetched.
    pub response: Option<Response>,

    /// HTML source.
    pub html_source: String,

    /// Parsed DOM tree with computed styles.
    pub dom: DomTree,

    /// Rules from every closed `<style>` element, in document order.
    pub rules: Vec<CssRule>,

    /// Elements in the order the layout hook saw them.
    pub layout_order: Vec<NodeId>,
}

impl LoadedDocument {
    /// Tokens of the HTML source, for debugging.
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        HTMLTokenizer::tokenize(&self.html_source)
    }

    /// Text of every `<style>` element, in document order, separated by
    /// newlines.
    #[must_use]
    pub fn css_text(&self) -> String {
        let mut blocks = Vec::new();
        collect_style_text(&self.dom, self.dom.root(), &mut blocks);
        blocks.join("\n")
    }
}

fn collect_style_text(tree: &DomTree, id: NodeId, out: &mut Vec<String>) {
    if tree.tag_name(id) == Some("style") {
        if let Some(text) = tree.first_child(id).and_then(|child| tree.as_text(child)) {
            out.push(text.to_string());
        }
        return;
    }
    for &child in tree.children(id) {
        collect_style_text(tree, child, out);
    }
}

/// Why a document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The HTTP exchange failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    /// The HTML could not be parsed.
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
    /// A local file could not be read.
    #[error("failed to read '{path}': {source}")]
    File {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Fetch `request` and parse the response body as HTML.
///
/// Non-2xx responses are parsed like any other.
///
/// # Errors
///
/// [`LoadError::Fetch`] if the exchange fails, [`LoadError::Parse`] if the
/// body is not well nested.
pub fn load_document(request: &Request) -> Result<LoadedDocument, LoadError> {
    clear_warnings();
    let source = format!("{}:{}{}", request.host(), request.port(), request.path());
    log::debug!(target: "marmot.browser", "loading {source}");

    let response = request.fetch()?;
    log::debug!(
        target: "marmot.browser",
        "{source}: status {:?}, {} body bytes",
        response.status_code,
        response.body.len()
    );

    let mut doc = parse_document(&response.body)?;
    doc.source = source;
    doc.response = Some(response);
    Ok(doc)
}

/// Read the file at `path` and parse it as HTML.
///
/// # Errors
///
/// [`LoadError::File`] if the file cannot be read, [`LoadError::Parse`] if it
/// is not well nested.
pub fn load_file(path: &Path) -> Result<LoadedDocument, LoadError> {
    clear_warnings();
    let html = fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.display().to_string(),
        source,
    })?;
    let mut doc = parse_document(&html)?;
    doc.source = path.display().to_string();
    Ok(doc)
}

/// Parse an HTML string.
///
/// # Errors
///
/// [`LoadError::Parse`] if the markup is not well nested.
pub fn parse_html_string(html: &str) -> Result<LoadedDocument, LoadError> {
    clear_warnings();
    parse_document(html)
}

fn parse_document(html: &str) -> Result<LoadedDocument, LoadError> {
    let mut parser = HTMLParser::with_layout(LayoutRecorder::new());
    parser.feed(html)?;
    let (dom, rules, recorder) = parser.finish()?.into_parts();
    log::debug!(
        target: "marmot.browser",
        "parsed {} nodes, {} rules, {} elements laid out",
        dom.len(),
        rules.len(),
        recorder.order().len()
    );

    Ok(LoadedDocument {
        source: "<string>".to_string(),
        response: None,
        html_source: html.to_string(),
        dom,
        rules,
        layout_order: recorder.into_order(),
    })
}
