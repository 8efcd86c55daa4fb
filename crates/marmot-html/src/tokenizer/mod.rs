//! Streaming HTML tokenizer.
//!
//! A character-level state machine that can be fed input in arbitrary
//! fragments. Tokens go to a [`TokenSink`] as soon as they are complete.

/// Helper methods for state transitions and token emission.
pub mod helpers;
/// The tokenizer state machine.
pub mod states;
/// Token types produced by the tokenizer.
pub mod token;

pub use states::{HTMLTokenizer, TokenSink, TokenizerState};
pub use token::{Attribute, Token};
