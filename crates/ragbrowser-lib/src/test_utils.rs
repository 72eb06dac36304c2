//! Test utilities for exercising the HTTP client without the real upstream.
//!
//! [`StubServer`] is a tiny in-process HTTP/1.1 server bound to a loopback
//! port. It answers one connection per scripted [`StubReply`], in order, and
//! records each request line and headers so tests can assert on what was
//! sent.
//!
//! # Usage
//!
//! ```ignore
//! use ragbrowser_lib::test_utils::{sample_results_json, StubServer};
//!
//! let server = StubServer::json(200, sample_results_json().to_string());
//! // point a ClientConfig at server.base_url() and make a request
//! let request = server.next_request().expect("request captured");
//! assert_eq!(request.path(), "/search");
//! ```

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use reqwest::Url;
use serde_json::{json, Value};

/// How long [`StubServer::next_request`] waits for a captured request.
const CAPTURE_WAIT: Duration = Duration::from_secs(2);

/// Scripted answer for one incoming connection.
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Respond with `status` and a JSON body.
    Json { status: u16, body: String },
    /// Read the request, then hold the connection open without answering.
    Stall(Duration),
}

/// Request line and headers as received by the stub.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    /// Path plus query string, exactly as sent.
    pub target: String,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    /// Decoded query string.
    pub fn query_pairs(&self) -> BTreeMap<String, String> {
        let url =
            Url::parse(&format!("http://stub{}", self.target)).expect("captured target parses");
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// In-process upstream stub.
pub struct StubServer {
    base_url: String,
    requests: Receiver<CapturedRequest>,
}

impl StubServer {
    /// Start serving `replies`, one connection each.
    pub fn start(replies: Vec<StubReply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback port");
        let addr = listener.local_addr().expect("listener has an address");
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || serve(listener, replies, tx));

        Self {
            base_url: format!("http://{}", addr),
            requests: rx,
        }
    }

    /// Serve a single JSON response.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::start(vec![StubReply::Json {
            status,
            body: body.into(),
        }])
    }

    /// A base URL nothing listens on, for connection-refused tests.
    pub fn unreachable_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback port");
        let addr = listener.local_addr().expect("listener has an address");
        drop(listener);
        format!("http://{}", addr)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Next captured request, or `None` if nothing arrived in time.
    pub fn next_request(&self) -> Option<CapturedRequest> {
        self.requests.recv_timeout(CAPTURE_WAIT).ok()
    }
}

fn serve(listener: TcpListener, replies: Vec<StubReply>, tx: Sender<CapturedRequest>) {
    for reply in replies {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let Some(request) = read_request(&stream) else {
            continue;
        };
        let _ = tx.send(request);

        match reply {
            StubReply::Json { status, body } => write_json(stream, status, &body),
            StubReply::Stall(hold) => {
                thread::sleep(hold);
                drop(stream);
            }
        }
    }
}

fn read_request(stream: &TcpStream) -> Option<CapturedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    Some(CapturedRequest {
        method,
        target,
        headers,
    })
}

fn write_json(mut stream: TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
        len = body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Two upstream records in the shape the standby API returns.
///
/// The first has both `text` and `markdown`; the second has a 6000-character
/// markdown body to exercise truncation.
pub fn sample_results_json() -> Value {
    json!([
        {
            "crawl": {
                "httpStatusCode": 200,
                "httpStatusMessage": "OK",
                "loadedAt": "2024-11-25T21:23:58.336Z",
                "uniqueKey": "example-1",
                "requestStatus": "handled"
            },
            "metadata": {
                "title": "Example Domain",
                "url": "https://www.example.com/",
                "languageCode": "en"
            },
            "query": "https://www.example.com",
            "text": "Example Domain This domain is for use in illustrative examples in documents.",
            "markdown": "# Example Domain\n\nThis domain is for use in illustrative examples in documents."
        },
        {
            "crawl": {
                "httpStatusCode": 200,
                "requestStatus": "handled"
            },
            "searchResult": {
                "title": "Long page",
                "url": "https://www.example.org/long"
            },
            "metadata": {
                "title": "Long page",
                "url": "https://www.example.org/long"
            },
            "markdown": "A".repeat(6000)
        }
    ])
}
