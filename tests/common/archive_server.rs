//! Minimal HTTP/1.1 stand-in for the RDA archive, for integration tests.
//!
//! Handles the form login POST (issuing a session cookie) and cookie-gated
//! file GETs with Content-Length and Last-Modified headers. Serves a fixed
//! set of files; everything else is 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

const SESSION_COOKIE: &str = "rdasession=ok";

#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub body: Vec<u8>,
    /// IMF-fixdate for the Last-Modified header; omitted when None.
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ArchiveServerOptions {
    /// Status returned by the login endpoint (200 = success).
    pub login_status: u16,
    /// If true, file GETs without the session cookie get 403.
    pub require_cookie: bool,
}

impl Default for ArchiveServerOptions {
    fn default() -> Self {
        Self {
            login_status: 200,
            require_cookie: true,
        }
    }
}

/// Start the server on an ephemeral port, serving `files` keyed by request
/// path. Returns the base URL without a trailing slash, e.g.
/// `http://127.0.0.1:12345`. Runs until the process exits.
pub fn start(files: HashMap<String, ArchiveFile>, opts: ArchiveServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files = Arc::new(files);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            thread::spawn(move || handle(stream, &files, opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(
    mut stream: std::net::TcpStream,
    files: &HashMap<String, ArchiveFile>,
    opts: ArchiveServerOptions,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let (method, path, headers) = parse_request(&request);

    if method.eq_ignore_ascii_case("POST") && path == "/cgi-bin/login" {
        if opts.login_status == 200 {
            let body = b"Authentication successful";
            let response = format!(
                "HTTP/1.1 200 OK\r\nSet-Cookie: {}; Path=/\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                SESSION_COOKIE,
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        } else {
            let body = b"Access denied";
            let response = format!(
                "HTTP/1.1 {} Forbidden\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                opts.login_status,
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        if opts.require_cookie {
            let has_cookie = headers
                .get("cookie")
                .map(|v| v.contains(SESSION_COOKIE))
                .unwrap_or(false);
            if !has_cookie {
                let _ = stream.write_all(
                    b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                );
                return;
            }
        }
        match files.get(path) {
            Some(file) => {
                let last_modified = file
                    .last_modified
                    .as_ref()
                    .map(|lm| format!("Last-Modified: {}\r\n", lm))
                    .unwrap_or_default();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
                    file.body.len(),
                    last_modified
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.write_all(&file.body);
            }
            None => {
                let _ = stream.write_all(
                    b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                );
            }
        }
        return;
    }

    let _ = stream
        .write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
}

/// Read headers (and any Content-Length body) into one string.
fn read_request(stream: &mut std::net::TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(_) => return None,
        };
        data.extend_from_slice(&buf[..n]);
        if let Some(header_end) = find_header_end(&data) {
            let headers = String::from_utf8_lossy(&data[..header_end]);
            let mut content_length = 0usize;
            for line in headers.lines() {
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    if data.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&data).into_owned())
    }
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Returns (method, path, lowercased header map).
fn parse_request(request: &str) -> (&str, &str, HashMap<String, String>) {
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    let mut headers = HashMap::new();
    for line in lines {
        if line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }
    (method, path, headers)
}
