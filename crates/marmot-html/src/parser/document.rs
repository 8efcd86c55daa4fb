use marmot_css::CssRule;
use marmot_dom::DomTree;

use super::builder::{LayoutHook, NoLayout, TreeBuilder};
use crate::error::ParseError;
use crate::tokenizer::HTMLTokenizer;

/// Streaming HTML parser: a tokenizer feeding a [`TreeBuilder`].
///
/// ```
/// use marmot_html::HTMLParser;
///
/// let mut parser = HTMLParser::new();
/// parser.feed("<div><sp").unwrap();
/// parser.feed("an></span></div>").unwrap();
/// let tree = parser.finish().unwrap().into_tree();
/// assert_eq!(tree.len(), 3);
/// ```
pub struct HTMLParser<H = NoLayout> {
    tokenizer: HTMLTokenizer,
    builder: TreeBuilder<H>,
}

impl HTMLParser<NoLayout> {
    /// A parser without a layout hook.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(NoLayout)
    }
}

impl Default for HTMLParser<NoLayout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: LayoutHook> HTMLParser<H> {
    /// A parser that reports closed elements to `layout`.
    #[must_use]
    pub fn with_layout(layout: H) -> Self {
        Self {
            tokenizer: HTMLTokenizer::new(),
            builder: TreeBuilder::with_layout(layout),
        }
    }

    /// Parse the next fragment of the document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::StructuralMismatch`] on an end tag that does not
    /// close the current element. The parser must not be fed again after an
    /// error.
    pub fn feed(&mut self, html: &str) -> Result<(), ParseError> {
        self.tokenizer.feed(html, &mut self.builder)
    }

    /// Signal end of input and hand back the builder.
    ///
    /// # Errors
    ///
    /// Same as [`feed`](Self::feed).
    pub fn finish(mut self) -> Result<TreeBuilder<H>, ParseError> {
        self.tokenizer.finish(&mut self.builder)?;
        Ok(self.builder)
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        self.builder.tree()
    }

    /// Rules collected so far.
    #[must_use]
    pub fn rules(&self) -> &[CssRule] {
        self.builder.rules()
    }
}
