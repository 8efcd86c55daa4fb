//! HTTP/1.1 plumbing for the Marmot pipeline.
//!
//! # Scope
//!
//! - **Requests**: a builder with defaults, form-urlencoded and JSON bodies,
//!   derived `Content-Length`, wire serialization.
//! - **Responses**: a byte-level state machine that accepts input in any
//!   fragmentation and decodes `Transfer-Encoding: chunked` bodies.
//! - **Client**: one blocking exchange over any `Read + Write` stream or a
//!   fresh TCP connection.
//! - **Fixture server**: answers every request with one chunked HTML
//!   document.
//!
//! # Not Implemented
//!
//! - `Content-Length` and close-delimited response bodies (the parser
//!   reports [`BodyFraming::Unsupported`] and never completes)
//! - Chunk trailers, keep-alive, redirects, TLS, timeouts

/// Chunked transfer coding.
pub mod chunked;
/// Blocking exchange.
pub mod client;
/// Client errors.
pub mod error;
/// Ordered header map.
pub mod headers;
/// Response parser.
pub mod parser;
/// Requests and their builder.
pub mod request;
/// Parsed responses and status lines.
pub mod response;
/// Fixture server.
pub mod server;

pub use chunked::{ChunkedBodyDecoder, ChunkedDecoderState, encode_chunked};
pub use error::FetchError;
pub use headers::Headers;
pub use parser::{BodyFraming, ResponseParser, ResponseParserState};
pub use request::{Request, RequestBuilder};
pub use response::{Response, StatusLine};
pub use server::{DEFAULT_DOCUMENT, DEFAULT_PORT, FixtureServer};
