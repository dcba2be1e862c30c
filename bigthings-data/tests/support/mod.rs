//! Minimal canned HTTP server for exercising `HttpCatalogClient` end to end.

use std::{
    io::{BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

/// A request observed by [`CannedServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRequest {
    /// Request method such as `GET`.
    pub method: String,
    /// Path and query, exactly as sent.
    pub target: String,
    /// Request body decoded as UTF-8.
    pub body: String,
}

/// Serves one scripted response per connection, in order, then stops.
pub struct CannedServer {
    base_url: String,
    handle: Option<JoinHandle<Vec<ObservedRequest>>>,
}

impl CannedServer {
    /// Bind to an ephemeral port and answer with `responses` as
    /// `(status, body)` pairs.
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let port = listener.local_addr().expect("listener address").port();
        let handle = thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| {
                    let (stream, _) = listener.accept().expect("accept connection");
                    serve(stream, status, &body)
                })
                .collect()
        });
        Self {
            base_url: format!("http://127.0.0.1:{port}/bigthings/"),
            handle: Some(handle),
        }
    }

    /// Base URL pointing at the server's catalog script.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait for every scripted response to be served and return the requests.
    pub fn finish(mut self) -> Vec<ObservedRequest> {
        self.handle
            .take()
            .expect("server handle present")
            .join()
            .expect("server thread should not panic")
    }
}

fn serve(stream: TcpStream, status: u16, body: &str) -> ObservedRequest {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let target = parts.next().unwrap_or_default().to_owned();

    let mut content_length = 0_usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).expect("read header");
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("numeric content length");
            }
        }
    }
    let mut request_body = vec![0; content_length];
    reader
        .read_exact(&mut request_body)
        .expect("read request body");

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .expect("write response");
    stream.flush().expect("flush response");

    ObservedRequest {
        method,
        target,
        body: String::from_utf8(request_body).expect("utf-8 request body"),
    }
}
