//! Shared LSP client for integration tests.
//!
//! Spawns the server binary and talks JSON-RPC to it over stdio, recording
//! every notification the server sends along the way.

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, RwLock};

/// Id used for requests that only exist to drain pending notifications.
const FLUSH_ID: i64 = 900;

/// A notification received from the server.
#[derive(Debug, Clone)]
pub(crate) struct CapturedNotification {
    pub method: String,
    pub params: Value,
}

/// LSP test client for communicating with the server binary.
pub(crate) struct LspClient {
    process: Child,
    notifications: Arc<RwLock<Vec<CapturedNotification>>>,
    reader: BufReader<std::process::ChildStdout>,
}

impl LspClient {
    /// Spawn the xref-lsp binary.
    pub(crate) fn spawn() -> Self {
        let mut process = Command::new(env!("CARGO_BIN_EXE_xref-lsp"))
            .env("RUST_LOG", "off")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn xref-lsp binary");

        let stdout = process.stdout.take().expect("Failed to capture stdout");

        Self {
            process,
            notifications: Arc::new(RwLock::new(Vec::new())),
            reader: BufReader::new(stdout),
        }
    }

    /// Notifications captured so far, in arrival order.
    pub(crate) fn notifications(&self) -> Vec<CapturedNotification> {
        self.notifications
            .read()
            .expect("Failed to acquire read lock")
            .clone()
    }

    /// `window/logMessage` notifications with the given message type.
    pub(crate) fn log_messages(&self, message_type: u64) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.method == "window/logMessage")
            .filter(|n| n.params["type"] == json!(message_type))
            .filter_map(|n| n.params["message"].as_str().map(String::from))
            .collect()
    }

    /// Round-trips a cheap request so that notifications sent before it are
    /// captured.
    pub(crate) fn flush_notifications(&mut self) {
        let _ = self.edefinition(FLUSH_ID, "file:///nonexistent/flush.go", 0, 0);
    }

    /// Send a JSON-RPC message to the server.
    pub(crate) fn send(&mut self, message: &Value) {
        let body = serde_json::to_string(message).unwrap();
        let header = format!("Content-Length: {}\r\n\r\n", body.len());

        let stdin = self.process.stdin.as_mut().expect("stdin not captured");
        stdin.write_all(header.as_bytes()).unwrap();
        stdin.write_all(body.as_bytes()).unwrap();
        stdin.flush().unwrap();
    }

    /// Read messages until the response with `expected_id` arrives.
    ///
    /// Server requests (such as `workspace/configuration`) are answered with
    /// `null` so the server never blocks on the test client.
    pub(crate) fn read_response(&mut self, expected_id: i64) -> Value {
        loop {
            let message = self.read_message();

            match (message.get("id"), message.get("method")) {
                (None, Some(method)) => {
                    let notification = CapturedNotification {
                        method: method.as_str().unwrap_or_default().to_string(),
                        params: message.get("params").cloned().unwrap_or(Value::Null),
                    };
                    self.notifications
                        .write()
                        .expect("Failed to acquire write lock")
                        .push(notification);
                }
                (Some(id), Some(_)) => {
                    let reply = json!({"jsonrpc": "2.0", "id": id, "result": null});
                    self.send(&reply);
                }
                (Some(id), None) if *id == json!(expected_id) => return message,
                _ => {}
            }
        }
    }

    fn read_message(&mut self) -> Value {
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            let bytes_read = self
                .reader
                .read_line(&mut line)
                .expect("Failed to read header");
            assert!(bytes_read != 0, "Server closed connection unexpectedly");

            if line == "\r\n" || line == "\n" {
                break;
            }

            if let Some(value) = line.to_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().expect("Invalid content length");
            }
        }

        let mut body = vec![0u8; content_length];
        self.reader
            .read_exact(&mut body)
            .expect("Failed to read body");

        serde_json::from_slice(&body).unwrap_or_else(|e| {
            panic!("Invalid JSON: {e} in: {:?}", String::from_utf8_lossy(&body))
        })
    }

    /// Initialize the session with one workspace folder.
    pub(crate) fn initialize(&mut self, folder_uri: &str, folder_name: &str) -> Value {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "processId": null,
                "capabilities": {
                    "workspace": {
                        "workspaceFolders": true
                    }
                },
                "rootUri": folder_uri,
                "workspaceFolders": [{"uri": folder_uri, "name": folder_name}]
            }
        }));

        let response = self.read_response(1);

        self.send(&json!({
            "jsonrpc": "2.0",
            "method": "initialized",
            "params": {}
        }));

        response
    }

    /// Notify the server about added and removed folders, given as
    /// `(uri, name)` pairs.
    pub(crate) fn change_folders(&mut self, added: &[(&str, &str)], removed: &[(&str, &str)]) {
        let folders = |pairs: &[(&str, &str)]| -> Vec<Value> {
            pairs
                .iter()
                .map(|(uri, name)| json!({"uri": uri, "name": name}))
                .collect()
        };

        self.send(&json!({
            "jsonrpc": "2.0",
            "method": "workspace/didChangeWorkspaceFolders",
            "params": {
                "event": {
                    "added": folders(added),
                    "removed": folders(removed)
                }
            }
        }));
    }

    /// Request a cross-repository definition.
    pub(crate) fn edefinition(&mut self, id: i64, uri: &str, line: u32, character: u32) -> Value {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "textDocument/edefinition",
            "params": {
                "textDocument": {"uri": uri},
                "position": {"line": line, "character": character}
            }
        }));

        self.read_response(id)
    }

    /// Send the shutdown request.
    pub(crate) fn shutdown(&mut self) -> Value {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": 999,
            "method": "shutdown"
        }));

        self.read_response(999)
    }
}

impl Drop for LspClient {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
