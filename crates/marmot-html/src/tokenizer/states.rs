use strum_macros::Display;

use super::token::{Attribute, Token};
use crate::error::ParseError;

/// The tokenizer state machine. Every state consumes exactly one input
/// character (or end-of-input) per step, optionally asking for it to be
/// reconsumed in the next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Character data between tags.
    Data,
    /// After `<`.
    TagOpen,
    /// After `</`.
    EndTagOpen,
    /// Inside a start or end tag name.
    TagName,
    /// Whitespace before an attribute name.
    BeforeAttributeName,
    /// Inside an attribute name.
    AttributeName,
    /// After an attribute name, before `=` or the next attribute.
    AfterAttributeName,
    /// After `=`, before the value.
    BeforeAttributeValue,
    /// Inside `"..."`.
    DoubleQuotedAttributeValue,
    /// Inside `'...'`.
    SingleQuotedAttributeValue,
    /// Right after a closing quote.
    AfterQuotedAttributeValue,
    /// Inside an unquoted value.
    UnquotedAttributeValue,
    /// After `/` inside a tag.
    SelfClosingStartTag,
}

/// Receiver of tokens.
///
/// Returning an error stops the tokenizer; the error is handed back from
/// [`HTMLTokenizer::feed`] or [`HTMLTokenizer::finish`].
pub trait TokenSink {
    /// Handle one token.
    ///
    /// # Errors
    ///
    /// Any error aborts tokenizing.
    fn process_token(&mut self, token: Token) -> Result<(), ParseError>;
}

impl TokenSink for Vec<Token> {
    fn process_token(&mut self, token: Token) -> Result<(), ParseError> {
        self.push(token);
        Ok(())
    }
}

/// Incremental HTML tokenizer.
///
/// Feed it any number of string fragments with [`feed`](Self::feed), then
/// call [`finish`](Self::finish) once to flush the end-of-input token. The
/// machine state survives between fragments, so splitting the input at any
/// character boundary yields the same tags. Character data is delivered as
/// [`Token::Text`] runs; a run is cut at tag boundaries and at the end of
/// each fragment, so consumers should coalesce adjacent runs.
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) current_input_character: Option<char>,
    // Set by "reconsume in": the same character is stepped again in the new
    // state.
    pub(super) reconsume: bool,
    pub(super) current_token: Option<Token>,
    pub(super) current_attribute: Option<Attribute>,
    pub(super) pending_text: String,
    pub(super) queue: Vec<Token>,
    pub(super) at_eof: bool,
}

impl Default for HTMLTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HTMLTokenizer {
    /// Create a tokenizer in the data state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TokenizerState::Data,
            current_input_character: None,
            reconsume: false,
            current_token: None,
            current_attribute: None,
            pending_text: String::new(),
            queue: Vec::new(),
            at_eof: false,
        }
    }

    /// Current state, for diagnostics.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Whether the end-of-input token has been emitted.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.at_eof
    }

    /// Tokenize one fragment of input.
    ///
    /// Input fed after [`finish`](Self::finish) is ignored.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`. The tokenizer should not
    /// be used after an error.
    pub fn feed<S: TokenSink + ?Sized>(&mut self, input: &str, sink: &mut S) -> Result<(), ParseError> {
        if self.at_eof {
            if !input.is_empty() {
                self.warn("input after end of input ignored");
            }
            return Ok(());
        }
        for c in input.chars() {
            self.step(Some(c));
            self.drain(sink)?;
        }
        self.flush_text();
        self.drain(sink)
    }

    /// Signal end of input: emits any pending text and [`Token::EndOfInput`].
    /// A tag left open by the input is dropped.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`.
    pub fn finish<S: TokenSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        if self.at_eof {
            return Ok(());
        }
        self.step(None);
        self.drain(sink)
    }

    /// Tokenize a complete document into a vector. Text runs are only cut at
    /// tags.
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut tokenizer = Self::new();
        for c in input.chars() {
            tokenizer.step(Some(c));
        }
        tokenizer.step(None);
        tokenizer.queue
    }

    /// Run the machine on one input, following reconsume requests until the
    /// input has been consumed.
    fn step(&mut self, input: Option<char>) {
        self.current_input_character = input;
        loop {
            self.reconsume = false;
            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
                TokenizerState::DoubleQuotedAttributeValue => {
                    self.handle_quoted_attribute_value_state('"');
                }
                TokenizerState::SingleQuotedAttributeValue => {
                    self.handle_quoted_attribute_value_state('\'');
                }
                TokenizerState::AfterQuotedAttributeValue => {
                    self.handle_after_quoted_attribute_value_state();
                }
                TokenizerState::UnquotedAttributeValue => {
                    self.handle_unquoted_attribute_value_state();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            }
            if !self.reconsume {
                break;
            }
        }
    }

    fn handle_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            Some(c) => self.emit_character(c),
            None => self.emit_end_of_input(),
        }
    }

    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // A lone `<` is ordinary text.
            Some(_) => {
                self.warn("'<' not followed by a tag name, treated as text");
                self.emit_character('<');
                self.reconsume_in(TokenizerState::Data);
            }
            None => {
                self.emit_character('<');
                self.emit_end_of_input();
            }
        }
    }

    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            Some(_) => {
                self.warn("'</' not followed by a tag name, treated as text");
                self.emit_str("</");
                self.reconsume_in(TokenizerState::Data);
            }
            None => {
                self.emit_str("</");
                self.emit_end_of_input();
            }
        }
    }

    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.emit_current_tag();
                self.switch_to(TokenizerState::Data);
            }
            // The first character was a letter; digits may follow (`h1`).
            Some(c) if c.is_ascii_alphanumeric() => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c);
                }
            }
            Some(c) => {
                self.warn(&format!("unexpected {c:?} in tag name, dropped"));
            }
            None => self.drop_tag_at_end_of_input(),
        }
    }

    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => {
                self.warn("'=' before attribute name");
                self.start_new_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some(c) if !Self::ends_attribute_name(c) => {
                if let Some(attr) = self.current_attribute.as_mut() {
                    attr.name.push(c);
                }
            }
            // Whitespace, `/`, `>` or end of input.
            _ => self.reconsume_in(TokenizerState::AfterAttributeName),
        }
    }

    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            // `name = value` is allowed, so the attribute stays open.
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => {
                self.commit_attribute();
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.commit_attribute();
                self.emit_current_tag();
                self.switch_to(TokenizerState::Data);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
            None => self.drop_tag_at_end_of_input(),
        }
    }

    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::DoubleQuotedAttributeValue),
            Some('\'') => self.switch_to(TokenizerState::SingleQuotedAttributeValue),
            Some('>') => {
                self.warn("missing attribute value");
                self.commit_attribute();
                self.emit_current_tag();
                self.switch_to(TokenizerState::Data);
            }
            Some(_) => self.reconsume_in(TokenizerState::UnquotedAttributeValue),
            None => self.drop_tag_at_end_of_input(),
        }
    }

    fn handle_quoted_attribute_value_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.commit_attribute();
                self.switch_to(TokenizerState::AfterQuotedAttributeValue);
            }
            Some(c) => {
                if let Some(attr) = self.current_attribute.as_mut() {
                    attr.value.push(c);
                }
            }
            None => self.drop_tag_at_end_of_input(),
        }
    }

    fn handle_after_quoted_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.emit_current_tag();
                self.switch_to(TokenizerState::Data);
            }
            Some(_) => {
                self.warn("missing whitespace between attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
            None => self.drop_tag_at_end_of_input(),
        }
    }

    fn handle_unquoted_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.commit_attribute();
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => {
                self.commit_attribute();
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') => {
                self.commit_attribute();
                self.emit_current_tag();
                self.switch_to(TokenizerState::Data);
            }
            Some(c) => {
                if let Some(attr) = self.current_attribute.as_mut() {
                    attr.value.push(c);
                }
            }
            None => self.drop_tag_at_end_of_input(),
        }
    }

    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.emit_current_tag();
                self.switch_to(TokenizerState::Data);
            }
            Some(_) => {
                self.warn("'/' inside tag not followed by '>'");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
            None => self.drop_tag_at_end_of_input(),
        }
    }
}
