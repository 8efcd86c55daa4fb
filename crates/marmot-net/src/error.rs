//! Client errors.

use std::io;

use thiserror::Error;

/// Why an exchange produced no response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connecting, writing or reading failed.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    /// The peer closed the connection after a head whose body is not chunked.
    /// Such a response can never complete.
    #[error("response body is not chunked (status {})", describe_status(*.status_code))]
    UnsupportedBodyFraming {
        /// Status code of the stalled response, if it was well formed.
        status_code: Option<u16>,
    },
    /// The peer closed the connection before the response was complete.
    #[error("connection closed before the response was complete")]
    ConnectionClosed,
}

fn describe_status(code: Option<u16>) -> String {
    code.map_or_else(|| "malformed".to_string(), |code| code.to_string())
}
