//! Shared test infrastructure for integration tests.

#![allow(dead_code)]

use serde_json::json;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// A request captured by [`one_shot_server`].
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Serve exactly one HTTP request with `status` and `reply`, returning the
/// base URL and a handle yielding the captured request.
pub fn one_shot_server(status: u16, reply: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }

        let find = |name: &str| {
            headers
                .iter()
                .find(|(k, _): &&(String, String)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        };
        let mut body = Vec::new();
        if let Some(len) = find("content-length") {
            let len: usize = len.parse().expect("content-length");
            body.resize(len, 0);
            reader.read_exact(&mut body).expect("read body");
        } else if find("transfer-encoding").is_some_and(|v| v.contains("chunked")) {
            loop {
                let mut size_line = String::new();
                reader.read_line(&mut size_line).expect("chunk size");
                let size = usize::from_str_radix(size_line.trim(), 16).expect("chunk size hex");
                let mut chunk = vec![0; size + 2];
                reader.read_exact(&mut chunk).expect("chunk");
                if size == 0 {
                    break;
                }
                body.extend_from_slice(&chunk[..size]);
            }
        }

        let reason = if (200..300).contains(&status) { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len(),
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush response");

        CapturedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body,
        }
    });
    (format!("http://{addr}/v1"), handle)
}

/// Workspace with one downloaded exercise and an isolated config dir.
pub struct Sandbox {
    _tmp: TempDir,
    pub config_home: PathBuf,
    pub workspace: PathBuf,
    pub exercise: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = fs::canonicalize(tmp.path()).expect("canonicalize tempdir");
        let config_home = base.join("config");
        let workspace = base.join("workspace");
        let exercise = workspace.join("rust").join("bob");
        fs::create_dir_all(&config_home).expect("create config home");
        fs::create_dir_all(exercise.join("src")).expect("create exercise");
        Sandbox {
            _tmp: tmp,
            config_home,
            workspace,
            exercise,
        }
    }

    pub fn write_metadata(&self, is_requester: bool, auto_approve: bool) {
        let metadata = json!({
            "id": "abc123",
            "exercise": "bob",
            "track": "rust",
            "url": "https://exercism.com/tracks/rust/exercises/bob",
            "handle": "alice",
            "is_requester": is_requester,
            "auto_approve": auto_approve,
        });
        let path = self.exercise.join(".exercism").join("metadata.json");
        fs::create_dir_all(path.parent().expect("metadata parent")).expect("create .exercism");
        fs::write(path, metadata.to_string()).expect("write metadata");
    }

    pub fn write_file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.exercise.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write file");
        path
    }
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
