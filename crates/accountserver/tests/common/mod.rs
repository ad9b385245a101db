//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use accountserver::config::{Config, ConnectionProfile};
use backend::{params, Params};

/// A one-shot account server stub.
///
/// Accepts a single connection, records the request body and answers with
/// the configured response body.
pub struct StubServer {
    pub url: String,
    requests: mpsc::Receiver<String>,
}

impl StubServer {
    /// Start a stub that answers every request with `body`.
    pub fn respond(body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/auth", listener.local_addr().unwrap());
        let body = body.to_string();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let request = read_request_body(&mut stream);
                let _ = tx.send(request);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self { url, requests: rx }
    }

    /// The body of the request the stub received, if any arrived.
    pub fn received(&self) -> Option<String> {
        self.requests.recv_timeout(Duration::from_secs(5)).ok()
    }

    /// Whether a request arrived within a short grace period.
    pub fn was_called(&self) -> bool {
        self.requests
            .recv_timeout(Duration::from_millis(200))
            .is_ok()
    }
}

fn read_request_body(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return String::new(),
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some((head, rest)) = text.split_once("\r\n\r\n") {
            let len = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if rest.len() >= len {
                return rest[..len].to_string();
            }
        }
    }
}

/// A configuration with a single profile pinning `url` and `path_template`.
pub fn config_with_profile(url: &str, path_template: &str) -> Config {
    Config {
        connections: vec![ConnectionProfile::new(params([
            ("type", "accountserver"),
            ("label", "Test"),
            ("url", url),
            ("path_template", path_template),
        ]))],
        ..Config::default()
    }
}

/// Session parameters for `username` against `url` and `path_template`.
pub fn session(username: &str, password: &str, url: &str, path_template: &str) -> Params {
    params([
        ("type", "accountserver"),
        ("username", username),
        ("password", password),
        ("url", url),
        ("path_template", path_template),
    ])
}
