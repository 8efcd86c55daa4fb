//! Chunked transfer coding.
//!
//! The decoder consumes `<hex-size>\r\n<data>\r\n` frames until a zero-size
//! chunk. It accepts input in any fragmentation, down to single bytes.
//! Trailers are not read; everything after the last-chunk size line is
//! ignored.

use marmot_common::warning::warn_once;
use strum_macros::Display;

/// Where the decoder is within the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChunkedDecoderState {
    /// Reading hex digits of a chunk size.
    AwaitingLength,
    /// Size line read up to `\r`, expecting `\n`.
    AwaitingLengthLineEnd,
    /// Copying chunk data.
    ReadingChunk,
    /// Chunk data done, expecting `\r`.
    AwaitingChunkLineEnd1,
    /// Expecting the `\n` that ends a chunk.
    AwaitingChunkLineEnd2,
}

/// Incremental decoder for a chunked message body.
#[derive(Debug, Clone)]
pub struct ChunkedBodyDecoder {
    state: ChunkedDecoderState,
    remaining: usize,
    // Inside a `;name=value` chunk extension, which is skipped.
    in_extension: bool,
    content: Vec<u8>,
    finished: bool,
}

impl Default for ChunkedBodyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedBodyDecoder {
    /// A decoder waiting for the first chunk size.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ChunkedDecoderState::AwaitingLength,
            remaining: 0,
            in_extension: false,
            content: Vec::new(),
            finished: false,
        }
    }

    /// Decode the next fragment. Input after the last chunk is ignored.
    pub fn receive(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while let Some((&byte, tail)) = rest.split_first() {
            if self.finished {
                return;
            }
            if self.state == ChunkedDecoderState::ReadingChunk {
                // Copy as much chunk data as this fragment holds in one go.
                let take = self.remaining.min(rest.len());
                self.content.extend_from_slice(&rest[..take]);
                self.remaining -= take;
                if self.remaining == 0 {
                    self.state = ChunkedDecoderState::AwaitingChunkLineEnd1;
                }
                rest = &rest[take..];
                continue;
            }
            self.receive_byte(byte);
            rest = tail;
        }
    }

    /// Decode a single byte.
    pub fn receive_byte(&mut self, byte: u8) {
        if self.finished {
            return;
        }
        match self.state {
            ChunkedDecoderState::AwaitingLength => match byte {
                b'\r' => {
                    self.in_extension = false;
                    if self.remaining == 0 {
                        log::debug!(
                            target: "marmot.net",
                            "last chunk, body is {} bytes",
                            self.content.len()
                        );
                        self.finished = true;
                    } else {
                        self.state = ChunkedDecoderState::AwaitingLengthLineEnd;
                    }
                }
                _ if self.in_extension => {}
                b';' => self.in_extension = true,
                _ => match hex_value(byte) {
                    Some(digit) => {
                        self.remaining = self
                            .remaining
                            .saturating_mul(16)
                            .saturating_add(usize::from(digit));
                    }
                    None => warn_once(
                        "HTTP",
                        &format!("skipping non-hex byte 0x{byte:02x} in chunk size line"),
                    ),
                },
            },
            ChunkedDecoderState::AwaitingLengthLineEnd => {
                if byte == b'\n' {
                    self.state = ChunkedDecoderState::ReadingChunk;
                }
            }
            ChunkedDecoderState::ReadingChunk => {
                self.content.push(byte);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = ChunkedDecoderState::AwaitingChunkLineEnd1;
                }
            }
            ChunkedDecoderState::AwaitingChunkLineEnd1 => {
                if byte == b'\r' {
                    self.state = ChunkedDecoderState::AwaitingChunkLineEnd2;
                }
            }
            ChunkedDecoderState::AwaitingChunkLineEnd2 => {
                if byte == b'\n' {
                    self.state = ChunkedDecoderState::AwaitingLength;
                }
            }
        }
    }

    /// Whether the zero-size last chunk has been read.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current frame state.
    #[must_use]
    pub const fn state(&self) -> ChunkedDecoderState {
        self.state
    }

    /// Bytes decoded so far.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Take the decoded bytes.
    #[must_use]
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Frame `body` as chunks of at most `chunk_size` bytes followed by the last
/// chunk. A `chunk_size` of zero is treated as one.
#[must_use]
pub fn encode_chunked(body: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 16);
    for chunk in body.chunks(chunk_size.max(1)) {
        out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}
