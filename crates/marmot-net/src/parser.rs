//! Incremental HTTP/1.1 response parser.
//!
//! Bytes may arrive in any fragmentation. Each call to
//! [`ResponseParser::receive`] resumes where the previous one stopped.

use marmot_common::warning::warn_once;
use serde::Serialize;
use strum_macros::Display;

use crate::chunked::ChunkedBodyDecoder;
use crate::headers::Headers;
use crate::response::{Response, StatusLine};

/// Position within the response head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResponseParserState {
    /// Accumulating the status line.
    AwaitingStatusLine,
    /// Status line ended with `\r`, expecting `\n`.
    AwaitingStatusLineEnd,
    /// Start of a header line, or `\r` for the end of the head.
    AwaitingHeaderName,
    /// After `:`, skipping to the space before the value.
    AwaitingHeaderSpace,
    /// Accumulating a header value.
    AwaitingHeaderValue,
    /// Header value ended with `\r`, expecting `\n`.
    AwaitingHeaderLineEnd,
    /// Blank line started, expecting its `\n`.
    AwaitingHeaderBlockEnd,
    /// Head complete; bytes belong to the body.
    AwaitingBody,
}

/// How the body is delimited, as far as the parser can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum BodyFraming {
    /// The header block has not ended yet.
    Pending,
    /// `Transfer-Encoding: chunked`; a decoder is attached.
    Chunked,
    /// Any other framing. The body is discarded and the parser never
    /// completes.
    Unsupported,
}

/// Parses one response.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    state: ResponseParserState,
    status_line: Vec<u8>,
    status: Option<StatusLine>,
    header_name: Vec<u8>,
    header_value: Vec<u8>,
    headers: Headers,
    framing: BodyFraming,
    decoder: Option<ChunkedBodyDecoder>,
    // Body bytes seen with no decoder attached.
    discarded: usize,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    /// A parser waiting for the status line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ResponseParserState::AwaitingStatusLine,
            status_line: Vec::new(),
            status: None,
            header_name: Vec::new(),
            header_value: Vec::new(),
            headers: Headers::new(),
            framing: BodyFraming::Pending,
            decoder: None,
            discarded: 0,
        }
    }

    /// Feed the next fragment of the response.
    pub fn receive(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while let Some((&byte, tail)) = rest.split_first() {
            if self.state == ResponseParserState::AwaitingBody {
                self.receive_body(rest);
                return;
            }
            self.step(byte);
            rest = tail;
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ResponseParserState {
        self.state
    }

    /// Body framing detected at the end of the header block.
    #[must_use]
    pub const fn body_framing(&self) -> BodyFraming {
        self.framing
    }

    /// The split status line, available as soon as it has ended, whatever
    /// the body framing turns out to be.
    #[must_use]
    pub const fn status_line(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Status code from the status line, once it has been read and if it was
    /// well formed.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status.as_ref().and_then(|line| line.code)
    }

    /// Headers parsed so far.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Whether the body has been fully decoded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.decoder
            .as_ref()
            .is_some_and(ChunkedBodyDecoder::is_finished)
    }

    /// The response, once complete.
    #[must_use]
    pub fn response(&self) -> Option<Response> {
        if !self.is_complete() {
            return None;
        }
        let body = self
            .decoder
            .as_ref()
            .map(|decoder| String::from_utf8_lossy(decoder.content()).into_owned())
            .unwrap_or_default();
        Some(self.build_response(body))
    }

    /// Consume the parser and return the response, once complete.
    #[must_use]
    pub fn into_response(mut self) -> Option<Response> {
        if !self.is_complete() {
            return None;
        }
        let body = self
            .decoder
            .take()
            .map(|decoder| match String::from_utf8(decoder.into_content()) {
                Ok(text) => text,
                Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
            })
            .unwrap_or_default();
        Some(self.build_response(body))
    }

    fn build_response(&self, body: String) -> Response {
        let (status_code, status_text) = self
            .status
            .as_ref()
            .map(|line| (line.code, line.text.clone()))
            .unwrap_or_default();
        Response {
            status_code,
            status_text,
            headers: self.headers.clone(),
            body,
        }
    }

    fn step(&mut self, byte: u8) {
        match self.state {
            ResponseParserState::AwaitingStatusLine => {
                if byte == b'\r' {
                    let line = String::from_utf8_lossy(&self.status_line);
                    self.status = Some(StatusLine::parse(&line));
                    self.status_line.clear();
                    self.state = ResponseParserState::AwaitingStatusLineEnd;
                } else {
                    self.status_line.push(byte);
                }
            }
            ResponseParserState::AwaitingStatusLineEnd => {
                if byte == b'\n' {
                    self.state = ResponseParserState::AwaitingHeaderName;
                }
            }
            ResponseParserState::AwaitingHeaderName => match byte {
                b'\r' => {
                    self.end_header_block();
                    self.state = ResponseParserState::AwaitingHeaderBlockEnd;
                }
                b':' => self.state = ResponseParserState::AwaitingHeaderSpace,
                _ => self.header_name.push(byte),
            },
            ResponseParserState::AwaitingHeaderSpace => {
                if byte == b' ' {
                    self.state = ResponseParserState::AwaitingHeaderValue;
                }
            }
            ResponseParserState::AwaitingHeaderValue => {
                if byte == b'\r' {
                    self.commit_header();
                    self.state = ResponseParserState::AwaitingHeaderLineEnd;
                } else {
                    self.header_value.push(byte);
                }
            }
            ResponseParserState::AwaitingHeaderLineEnd => {
                if byte == b'\n' {
                    self.state = ResponseParserState::AwaitingHeaderName;
                }
            }
            ResponseParserState::AwaitingHeaderBlockEnd => {
                if byte == b'\n' {
                    self.state = ResponseParserState::AwaitingBody;
                }
            }
            ResponseParserState::AwaitingBody => self.receive_body(&[byte]),
        }
    }

    fn commit_header(&mut self) {
        let name = String::from_utf8_lossy(&self.header_name).into_owned();
        let value = String::from_utf8_lossy(&self.header_value).into_owned();
        self.header_name.clear();
        self.header_value.clear();
        if self.headers.insert(&name, &value).is_some() {
            log::debug!(target: "marmot.net", "header {name} repeated, last value kept");
        }
    }

    /// Decide the body framing. Runs once, when the blank line starts.
    fn end_header_block(&mut self) {
        if self.framing != BodyFraming::Pending {
            return;
        }
        if self.headers.is_chunked() {
            self.decoder = Some(ChunkedBodyDecoder::new());
            self.framing = BodyFraming::Chunked;
        } else {
            self.framing = BodyFraming::Unsupported;
            warn_once(
                "HTTP",
                "response body is not chunked; it will be ignored and the response never completes",
            );
        }
        log::debug!(
            target: "marmot.net",
            "header block ended: {} headers, framing {}",
            self.headers.len(),
            self.framing
        );
    }

    fn receive_body(&mut self, bytes: &[u8]) {
        match self.decoder.as_mut() {
            Some(decoder) => decoder.receive(bytes),
            None => self.discarded = self.discarded.saturating_add(bytes.len()),
        }
    }

    /// Body bytes dropped because no decoder was attached.
    #[must_use]
    pub const fn discarded_body_bytes(&self) -> usize {
        self.discarded
    }
}
