//! Helper functions for the HTML tokenizer.
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("switch to", "reconsume in")
//! - Character classes
//! - Token emission and delivery to the sink
//! - Attribute bookkeeping

use marmot_common::warning::warn_once;

use super::states::{HTMLTokenizer, TokenSink, TokenizerState};
use super::token::{Attribute, Token};
use crate::error::ParseError;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Transitions to a new state. The next character will be consumed by it.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// Transitions to a new state without consuming the current character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Character Classes
// =============================================================================

impl HTMLTokenizer {
    /// Tab, line feed, form feed and space.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }

    /// Characters that end an attribute name (besides `=` and end of input).
    pub(super) const fn ends_attribute_name(input_char: char) -> bool {
        Self::is_whitespace_char(input_char) || matches!(input_char, '/' | '>')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Add a character to the current text run.
    pub(super) fn emit_character(&mut self, c: char) {
        self.pending_text.push(c);
    }

    /// Add several characters to the current text run.
    pub(super) fn emit_str(&mut self, s: &str) {
        self.pending_text.push_str(s);
    }

    /// Close the current text run, if any, as a [`Token::Text`].
    pub(super) fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let data = std::mem::take(&mut self.pending_text);
            self.queue.push(Token::Text { data });
        }
    }

    /// "Emit the current token": queue the finished tag after any text that
    /// preceded it.
    pub(super) fn emit_current_tag(&mut self) {
        self.flush_text();
        self.current_attribute = None;
        if let Some(token) = self.current_token.take() {
            self.queue.push(token);
        }
    }

    /// Queue the end-of-input token. Nothing is emitted after it.
    pub(super) fn emit_end_of_input(&mut self) {
        self.flush_text();
        self.queue.push(Token::EndOfInput);
        self.at_eof = true;
    }

    /// End of input inside a tag: the tag is discarded.
    pub(super) fn drop_tag_at_end_of_input(&mut self) {
        if let Some(name) = self.current_token.as_ref().and_then(Token::tag_name) {
            self.warn(&format!("end of input inside tag <{name}>, tag dropped"));
        }
        self.current_token = None;
        self.current_attribute = None;
        self.emit_end_of_input();
    }

    /// Hand queued tokens to `sink` in order.
    pub(super) fn drain<S: TokenSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        for token in self.queue.drain(..) {
            sink.process_token(token)?;
        }
        Ok(())
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Start an attribute with an empty name and value. Any attribute still
    /// in progress is committed first.
    pub(super) fn start_new_attribute(&mut self) {
        self.commit_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
    }

    /// Move the attribute in progress onto the current tag.
    ///
    /// Attributes without a name are dropped. A repeated name overwrites the
    /// earlier value.
    pub(super) fn commit_attribute(&mut self) {
        let Some(attribute) = self.current_attribute.take() else {
            return;
        };
        if attribute.name.is_empty() {
            self.warn("attribute without a name dropped");
            return;
        }
        let name = attribute.name.clone();
        let is_new = self
            .current_token
            .as_mut()
            .is_none_or(|token| token.commit_attribute(attribute));
        if !is_new {
            self.warn(&format!("duplicate attribute '{name}', last value kept"));
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// Recoverable input problems are reported through the deduplicating
    /// warning channel; tokenizing continues.
    pub(super) fn warn(&self, message: &str) {
        warn_once("HTML Tokenizer", &format!("{message} (state {})", self.state));
    }
}
