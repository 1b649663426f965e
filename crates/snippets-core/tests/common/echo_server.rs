//! Minimal HTTP/1.1 server for integration tests.
//!
//! Accepts POSTed JSON and answers `200` with `{"data": <request body>}`.
//! Can be told to fail the first N requests with a given status to exercise
//! retry behavior, or to fail every request.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct EchoServerOptions {
    /// Fail this many requests (counted across all connections) before
    /// starting to answer normally. `u32::MAX` fails every request.
    pub fail_first: u32,
    /// Status line used for failed requests.
    pub fail_status: &'static str,
}

impl Default for EchoServerOptions {
    fn default() -> Self {
        Self {
            fail_first: 0,
            fail_status: "503 Service Unavailable",
        }
    }
}

/// Starts a server in a background thread. Returns the base URL (e.g.
/// "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start() -> String {
    start_with_options(EchoServerOptions::default())
}

pub fn start_with_options(opts: EchoServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let served = Arc::new(AtomicU32::new(0));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let served = Arc::clone(&served);
            thread::spawn(move || handle(stream, opts, &served));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: std::net::TcpStream, opts: EchoServerOptions, served: &AtomicU32) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let Some(body) = read_request_body(&mut stream) else {
        return;
    };

    let n = served.fetch_add(1, Ordering::SeqCst);
    if n < opts.fail_first {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            opts.fail_status
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let payload = format!("{{\"data\": {}}}", String::from_utf8_lossy(&body));
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Reads headers plus a Content-Length body. Returns None on malformed input.
fn read_request_body(stream: &mut std::net::TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let headers = std::str::from_utf8(&buf[..header_end]).ok()?;
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Some(buf[body_start..body_start + content_length].to_vec())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
