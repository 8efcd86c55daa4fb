//! Parsed HTTP responses.

use marmot_common::warning::warn_once;
use serde::Serialize;

use crate::headers::Headers;

/// A complete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Numeric status code; `None` when the status line was malformed.
    pub status_code: Option<u16>,
    /// Reason phrase after the code, e.g. `OK` or `Not Found`.
    pub status_text: String,
    /// Header fields in order.
    pub headers: Headers,
    /// Decoded body as text (invalid UTF-8 replaced).
    pub body: String,
}

impl Response {
    /// Whether the status line could not be split into protocol, code and
    /// text.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.status_code.is_none()
    }

    /// Whether the status code is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code.is_some_and(|code| (200..300).contains(&code))
    }
}

/// `HTTP/<version> <code> <text>` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Protocol token, e.g. `HTTP/1.1`.
    pub protocol: String,
    /// Numeric code, absent when malformed.
    pub code: Option<u16>,
    /// Reason phrase, empty when malformed.
    pub text: String,
}

impl StatusLine {
    /// Split a status line.
    ///
    /// The protocol must start with `HTTP/` and the code must be all ASCII
    /// digits that fit a `u16`. Anything else gives an absent code and empty
    /// text instead of an error. The text is everything after the second
    /// space, so multi-word phrases survive.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut parts = line.splitn(3, ' ');
        let protocol = parts.next().unwrap_or_default();
        let code = parts.next().unwrap_or_default();
        let text = parts.next().unwrap_or_default();

        let code = if protocol.starts_with("HTTP/")
            && !code.is_empty()
            && code.bytes().all(|b| b.is_ascii_digit())
        {
            code.parse::<u16>().ok()
        } else {
            None
        };

        match code {
            Some(code) => Self {
                protocol: protocol.to_string(),
                code: Some(code),
                text: text.to_string(),
            },
            None => {
                warn_once("HTTP", &format!("malformed status line {line:?}"));
                Self {
                    protocol: protocol.to_string(),
                    code: None,
                    text: String::new(),
                }
            }
        }
    }
}
