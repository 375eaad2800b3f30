//! Common test utilities for zabbixctl-client integration tests
//!
//! This module provides a mock Zabbix API built on `wiremock` and helpers for
//! inspecting what the client sent, so tests run without a real server.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zabbixctl_client::{AuthState, CallObserver, ClientBuilder, ZabbixClient};

pub const TOKEN: &str = "0424bd59b807674191e7d77572075f33";

/// Mock Zabbix API endpoint
///
/// Mocks are matched on the JSON-RPC `method` member of the request body.
pub struct MockZabbix {
    server: MockServer,
}

impl MockZabbix {
    /// Start a mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Start a mock server answering the version probe and the login
    pub async fn with_version(version: &str) -> Self {
        let mock = Self::start().await;
        mock.mount_version(version).await;
        mock.mount_login(TOKEN).await;
        mock
    }

    /// Server address as given to the client builder
    pub fn address(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Answer `apiinfo.version`, expecting exactly one probe
    pub async fn mount_version(&self, version: &str) {
        Mock::given(method("POST"))
            .and(path("/api_jsonrpc.php"))
            .and(body_partial_json(json!({"method": "apiinfo.version"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_response(1, json!(version))))
            .expect(1)
            .named("apiinfo.version")
            .mount(&self.server)
            .await;
    }

    /// Answer `user.login` with `token`
    pub async fn mount_login(&self, token: &str) {
        self.mount_result("user.login", json!(token)).await;
    }

    /// Answer `method` with a successful result
    pub async fn mount_result(&self, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path("/api_jsonrpc.php"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_response(1, result)))
            .named(rpc_method)
            .mount(&self.server)
            .await;
    }

    /// Answer `method` with a JSON-RPC error object
    pub async fn mount_error(&self, rpc_method: &str, code: i32, message: &str) {
        Mock::given(method("POST"))
            .and(path("/api_jsonrpc.php"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(mock_error_response(1, code, message)),
            )
            .named(rpc_method)
            .mount(&self.server)
            .await;
    }

    /// Answer `method` with a raw body
    pub async fn mount_raw(&self, rpc_method: &str, body: &str) {
        self.mount_status(rpc_method, 200, body).await;
    }

    /// Answer `method` with an HTTP status and a raw body
    pub async fn mount_status(&self, rpc_method: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/api_jsonrpc.php"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(ResponseTemplate::new(status).set_body_string(body.to_string()))
            .named(rpc_method)
            .mount(&self.server)
            .await;
    }

    /// Every request received for `method`, in arrival order
    pub async fn requests_for(&self, rpc_method: &str) -> Vec<Captured> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|request| {
                let body: Value = serde_json::from_slice(&request.body).ok()?;
                if body["method"] != rpc_method {
                    return None;
                }
                let header = |name: &str| {
                    request
                        .headers
                        .get(name)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string)
                };
                Some(Captured {
                    authorization: header("authorization"),
                    content_type: header("content-type"),
                    user_agent: header("user-agent"),
                    body,
                })
            })
            .collect()
    }

    /// Builder pointed at this server with test credentials
    pub fn builder(&self) -> ClientBuilder {
        ClientBuilder::new(self.address()).credentials("Admin", "zabbix")
    }

    /// Connect without a session file
    pub async fn connect(&self) -> ZabbixClient {
        self.builder().connect().await.unwrap()
    }
}

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct Captured {
    pub body: Value,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
}

/// Observer keeping every event as a line of text
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl CallObserver for RecordingObserver {
    fn on_request(&self, _id: i64, method: &str, params: &[String]) {
        self.push(format!("request {}", method));
        for param in params {
            self.push(format!("param {}", param));
        }
    }

    fn on_response(&self, _id: i64, method: &str, status: &str) {
        self.push(format!("response {} {}", method, status));
    }

    fn on_body(&self, _id: i64, method: &str, body: &str) {
        self.push(format!("body {} {}", method, body));
    }

    fn on_auth_state(&self, from: AuthState, to: AuthState) {
        self.push(format!("state {} -> {}", from, to));
    }
}

/// Helper to create a mock JSON-RPC response
pub fn mock_response(id: i64, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id
    })
}

/// Helper to create a mock JSON-RPC error response
pub fn mock_error_response(id: i64, code: i32, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "error": {
            "code": code,
            "message": message,
            "data": "Invalid parameter \"/1\": unexpected parameter \"foo\"."
        },
        "id": id
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_response_format() {
        let response = mock_response(1, json!({"value": 42})).to_string();
        assert!(response.contains("\"jsonrpc\":\"2.0\""));
        assert!(response.contains("\"id\":1"));
        assert!(response.contains("\"result\""));
    }

    #[test]
    fn test_mock_error_response_format() {
        let response = mock_error_response(1, -32602, "Invalid params").to_string();
        assert!(response.contains("\"error\""));
        assert!(response.contains("-32602"));
        assert!(response.contains("Invalid params"));
    }
}
