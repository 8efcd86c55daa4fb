//! Fixture HTTP server.
//!
//! Answers every request with one fixed HTML document using chunked framing,
//! which is the only body framing the client parser completes on.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;

use crate::chunked::encode_chunked;

/// Port the fixture server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8088;

/// Size of each chunk in fixture responses.
pub const RESPONSE_CHUNK_SIZE: usize = 256;

/// Document served when no file is given.
pub const DEFAULT_DOCUMENT: &str = r#"<html maaa=a >
<head>
    <style>
body div #myid {
    width: 100px;
    background-color: #ff5000;
}
body div img {
    width: 30px;
    background-color: #ff1111;
}
.note {
    color: green;
}
    </style>
</head>
<body>
    <div>
        <img id="myid"/>
        <img />
    </div>
    <p class="note">Hello from the fixture server</p>
</body>
</html>"#;

/// What the server read from one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRequest {
    /// Request method.
    pub method: String,
    /// Request target.
    pub path: String,
    /// Body, read up to `Content-Length` bytes.
    pub body: String,
}

/// Serves a fixed document over HTTP/1.1.
#[derive(Debug)]
pub struct FixtureServer {
    listener: TcpListener,
    document: Arc<str>,
}

impl FixtureServer {
    /// Bind to `addr`. Port 0 picks a free port.
    ///
    /// # Errors
    ///
    /// Fails if the address cannot be bound.
    pub fn bind<A: ToSocketAddrs>(addr: A, document: impl Into<Arc<str>>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self {
            listener,
            document: document.into(),
        })
    }

    /// Address the server is listening on.
    ///
    /// # Errors
    ///
    /// Fails if the socket address cannot be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and answer one connection on the calling thread.
    ///
    /// # Errors
    ///
    /// Fails on any I/O error with the connection.
    pub fn accept_one(&self) -> io::Result<ReceivedRequest> {
        let (stream, peer) = self.listener.accept()?;
        log::debug!(target: "marmot.server", "connection from {peer}");
        handle_connection(stream, &self.document)
    }

    /// Answer connections forever, one thread per connection.
    ///
    /// # Errors
    ///
    /// Returns only if accepting fails.
    pub fn serve(&self) -> io::Result<()> {
        for stream in self.listener.incoming() {
            let stream = stream?;
            let document = Arc::clone(&self.document);
            let _ = thread::spawn(move || {
                if let Err(err) = handle_connection(stream, &document) {
                    log::warn!(target: "marmot.server", "connection failed: {err}");
                }
            });
        }
        Ok(())
    }
}

fn handle_connection(mut stream: TcpStream, document: &str) -> io::Result<ReceivedRequest> {
    let request = read_request(&mut stream)?;
    log::info!(
        target: "marmot.server",
        "{} {} body: {:?}",
        request.method,
        request.path,
        request.body
    );

    stream.write_all(&response_bytes(document))?;
    stream.flush()?;
    Ok(request)
}

/// The full fixture response for `document`.
#[must_use]
pub fn response_bytes(document: &str) -> Vec<u8> {
    let mut out = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
    out.extend_from_slice(&encode_chunked(document.as_bytes(), RESPONSE_CHUNK_SIZE));
    out
}

fn read_request<R: Read>(stream: &mut R) -> io::Result<ReceivedRequest> {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = find_head_end(&data) {
            break pos;
        }
        let n = match stream.read(&mut buf) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if n == 0 {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "connection closed before the request head ended",
            ));
        }
        data.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8_lossy(&data[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = data.split_off(head_end + 4);
    while body.len() < content_length {
        let n = match stream.read(&mut buf) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    body.truncate(content_length);

    Ok(ReceivedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn find_head_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|window| window == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ResponseParser;

    #[test]
    fn test_read_request_with_body() {
        let raw = b"POST /form HTTP/1.1\r\nContent-Length: 7\r\n\r\na=1&b=2";
        let request = read_request(&mut &raw[..]).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/form");
        assert_eq!(request.body, "a=1&b=2");
    }

    #[test]
    fn test_read_request_without_head_end() {
        let raw = b"GET / HTTP/1.1\r\n";
        let err = read_request(&mut &raw[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_response_parses_back() {
        let mut parser = ResponseParser::new();
        parser.receive(&response_bytes(DEFAULT_DOCUMENT));
        let response = parser.into_response().unwrap();
        assert_eq!(response.status_code, Some(200));
        assert_eq!(response.headers.get("Content-Type"), Some("text/html"));
        assert_eq!(response.body, DEFAULT_DOCUMENT);
    }
}
