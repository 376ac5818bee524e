// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Shared helpers for integration tests: a one-shot HTTP server standing in
//! for the workflow service, and a runner for the compiled binary.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

/// Request as seen by the mock server.
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

/// Serves exactly one canned response.
pub struct MockServer {
    pub url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl MockServer {
    pub fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let body = body.into();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_one(stream, status, &body)
        });

        Self { url, handle }
    }

    /// Wait for the served request.
    pub fn request(self) -> CapturedRequest {
        self.handle.join().unwrap()
    }
}

fn handle_one(mut stream: TcpStream, status: u16, body: &str) -> CapturedRequest {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name == "content-length" {
                content_length = value.parse().unwrap();
            } else if name == "transfer-encoding" && value.eq_ignore_ascii_case("chunked") {
                chunked = true;
            }
        }
    }

    let request_body = if chunked {
        read_chunked(&mut reader)
    } else {
        let mut buf = vec![0; content_length];
        reader.read_exact(&mut buf).unwrap();
        buf
    };

    let response = format!(
        "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();

    CapturedRequest {
        method,
        path,
        body: request_body,
    }
}

fn read_chunked(reader: &mut impl BufRead) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).unwrap();
        let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
        let mut chunk = vec![0; size + 2];
        reader.read_exact(&mut chunk).unwrap();
        if size == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..size]);
    }
    body
}

/// URL of a local port with nothing listening on it.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Write a small white PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]))
        .save(path)
        .unwrap();
}

/// Run the binary against `api_url` with a deterministic environment.
pub fn run_bridge(api_url: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docscan-bridge"))
        .args(args)
        .env("ROBOFLOW_API_URL", api_url)
        .env("ROBOFLOW_API_KEY", "test-key")
        .env("ROBOFLOW_WORKSPACE", "test-space")
        .env("ROBOFLOW_WORKFLOW_ID", "detect")
        .env("DOCSCAN_FONT", "/nonexistent/font.ttf")
        .output()
        .unwrap()
}

/// Stdout as a single JSON value, asserting it is exactly one line.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1, "stdout: {stdout}");
    serde_json::from_str(stdout.trim_end()).unwrap()
}
