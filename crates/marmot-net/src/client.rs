//! Blocking request/response exchange.

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;

use crate::error::FetchError;
use crate::parser::{BodyFraming, ResponseParser};
use crate::request::Request;
use crate::response::Response;

const READ_BUFFER_SIZE: usize = 4096;

impl Request {
    /// Write this request to `stream` and read until the response is
    /// complete.
    ///
    /// # Errors
    ///
    /// [`FetchError::Transport`] on any I/O failure. If the peer closes the
    /// connection first, [`FetchError::UnsupportedBodyFraming`] when the body
    /// was not chunked, otherwise [`FetchError::ConnectionClosed`].
    pub fn send<S: Read + Write>(&self, stream: &mut S) -> Result<Response, FetchError> {
        stream.write_all(&self.to_bytes())?;
        stream.flush()?;
        log::debug!(
            target: "marmot.net",
            "sent {} {} ({} body bytes)",
            self.method(),
            self.path(),
            self.body_text().len()
        );

        let mut parser = ResponseParser::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            let n = match stream.read(&mut buf) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if n == 0 {
                return Err(closed_early(&parser));
            }
            log::debug!(target: "marmot.net", "received {n} bytes in state {}", parser.state());
            parser.receive(&buf[..n]);
            if parser.is_complete() {
                return parser.into_response().ok_or(FetchError::ConnectionClosed);
            }
        }
    }

    /// Connect to `host:port` over TCP and [`send`](Self::send) this request.
    ///
    /// # Errors
    ///
    /// As for [`send`](Self::send), plus [`FetchError::Transport`] when the
    /// connection cannot be opened.
    pub fn fetch(&self) -> Result<Response, FetchError> {
        log::debug!(target: "marmot.net", "connecting to {}:{}", self.host(), self.port());
        let mut stream = TcpStream::connect((self.host(), self.port()))?;
        self.send(&mut stream)
    }
}

fn closed_early(parser: &ResponseParser) -> FetchError {
    match parser.body_framing() {
        BodyFraming::Unsupported => FetchError::UnsupportedBodyFraming {
            status_code: parser.status_code(),
        },
        BodyFraming::Pending | BodyFraming::Chunked => FetchError::ConnectionClosed,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;

    /// Replays canned response bytes in fixed-size reads and records what
    /// was written.
    struct Scripted {
        input: Cursor<Vec<u8>>,
        read_size: usize,
        written: Vec<u8>,
    }

    impl Scripted {
        fn new(response: &[u8], read_size: usize) -> Self {
            Self {
                input: Cursor::new(response.to_vec()),
                read_size,
                written: Vec::new(),
            }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let limit = buf.len().min(self.read_size);
            self.input.read(&mut buf[..limit])
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_reads_fragmented_response() {
        let mut stream = Scripted::new(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nhi\r\n0\r\n\r\n",
            3,
        );
        let request = Request::builder("localhost").build();
        let response = request.send(&mut stream).unwrap();
        assert_eq!(response.status_code, Some(200));
        assert_eq!(response.body, "hi");
        assert_eq!(stream.written, request.to_bytes());
    }

    #[test]
    fn test_close_without_chunked_body() {
        let mut stream = Scripted::new(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi", 64);
        let err = Request::builder("localhost").build().send(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            FetchError::UnsupportedBodyFraming {
                status_code: Some(200)
            }
        ));
    }

    #[test]
    fn test_close_during_head() {
        let mut stream = Scripted::new(b"HTTP/1.1 200 OK\r\nTransfer-Enc", 64);
        let err = Request::builder("localhost").build().send(&mut stream).unwrap_err();
        assert!(matches!(err, FetchError::ConnectionClosed));
    }

    #[test]
    fn test_close_during_chunked_body() {
        let mut stream = Scripted::new(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nab",
            64,
        );
        let err = Request::builder("localhost").build().send(&mut stream).unwrap_err();
        assert!(matches!(err, FetchError::ConnectionClosed));
    }
}
