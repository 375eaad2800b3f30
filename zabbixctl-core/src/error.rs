//! Error types for zabbixctl
//!
//! This module defines two error types:
//!
//! - **Error**: Application-level errors returned by every fallible operation
//!   (uses thiserror)
//! - **ApiErrorData**: The `error` object a Zabbix server embeds in a JSON-RPC
//!   response
//!
//! # Error Taxonomy
//!
//! - `Config`: missing credential, bad insecure flag, unreadable config file
//! - `Version`: version fetch failure or unparseable version/constraint
//! - `Authentication`: login failed (wraps the underlying cause)
//! - `Session`: session file could not be opened, inspected, read or written
//! - `Transport` / `Serialization`: request never got a usable HTTP answer
//! - `Decode`: the body could not be decoded into the expected shape
//! - `Api`: the server answered with a JSON-RPC `error` object
//! - `Membership`: a user group update failed (wraps the underlying cause)
//!
//! Nothing here is retried. Construction-time failures (`Config`, `Version`,
//! `Authentication`, `Session`) are expected to be fatal for the process.
//!
//! # Examples
//!
//! ```rust
//! use zabbixctl_core::{ApiErrorData, Error};
//!
//! let error = Error::Api {
//!     method: "host.get".into(),
//!     error: ApiErrorData::new(-32602, "Invalid params."),
//! };
//! assert!(error.to_string().contains("host.get"));
//! assert!(error.to_string().contains("Invalid params."));
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using zabbixctl's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for zabbixctl operations
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Version negotiation failed
    ///
    /// Raised when the server version can't be fetched or when either the
    /// version string or a constraint expression can't be parsed.
    #[error("version error: {0}")]
    Version(String),

    /// Login failed for the given user
    #[error("can't authorize user '{username}' on server {server}")]
    Authentication {
        username: String,
        server: String,
        #[source]
        source: Box<Error>,
    },

    /// Session file I/O failed
    #[error("session file '{}': {message}", path.display())]
    Session { path: PathBuf, message: String },

    /// HTTP request failed before a response body was obtained
    #[error("http request to zabbix api failed ({method}): {message}")]
    Transport { method: String, message: String },

    /// Request envelope or parameters could not be encoded
    #[error("can't encode request to JSON: {0}")]
    Serialization(String),

    /// Response body could not be decoded
    #[error("can't decode response of {method}: {message}")]
    Decode { method: String, message: String },

    /// The server returned a JSON-RPC error object
    #[error("zabbix returned error while working with api method {method}: {error}")]
    Api { method: String, error: ApiErrorData },

    /// Updating the membership of a user group failed
    #[error("can't update usergroup {group}")]
    Membership {
        group: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Server-provided error object, if this is a protocol error
    pub fn api_error(&self) -> Option<&ApiErrorData> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Render the error followed by every cause in its source chain
    ///
    /// Produces `outer: inner: innermost`, the form printed by the binary.
    pub fn chain(&self) -> String {
        render_chain(self)
    }
}

/// Render any error followed by its sources as `outer: inner: innermost`
pub fn render_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// JSON-RPC error object as sent by the Zabbix server
///
/// Zabbix puts the human-readable detail into `data` (usually a string such
/// as `"No permissions to referred object or it does not exist!"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorData {
    /// Numeric error code (`-32602` invalid params, `-32500` application error, ...)
    pub code: i32,

    /// Short error message
    pub message: String,

    /// Additional detail supplied by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ApiErrorData {
    /// Create a new error object without detail
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new error object with detail
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl std::fmt::Display for ApiErrorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        match &self.data {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => {
                write!(f, " {}", detail)
            }
            Some(serde_json::Value::Null) | None => Ok(()),
            Some(serde_json::Value::String(_)) => Ok(()),
            Some(other) => write!(f, " {}", other),
        }
    }
}

impl std::error::Error for ApiErrorData {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_display_includes_code_and_message() {
        let error = ApiErrorData::new(-32602, "Invalid params");
        assert_eq!(error.to_string(), "[-32602] Invalid params");
    }

    #[test]
    fn test_api_error_display_includes_string_detail() {
        let error = ApiErrorData::with_data(
            -32500,
            "Application error.",
            json!("No permissions to referred object or it does not exist!"),
        );
        let display = error.to_string();
        assert!(display.starts_with("[-32500] Application error."));
        assert!(display.contains("No permissions"));
    }

    #[test]
    fn test_api_error_deserialize_without_data() {
        let error: ApiErrorData =
            serde_json::from_value(json!({"code": -32602, "message": "Invalid params"})).unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.data.is_none());
    }

    #[test]
    fn test_protocol_error_names_method() {
        let error = Error::Api {
            method: "trigger.get".to_string(),
            error: ApiErrorData::new(-32602, "Invalid params"),
        };
        let display = error.to_string();
        assert!(display.contains("trigger.get"));
        assert!(display.contains("Invalid params"));
        assert_eq!(error.api_error().map(|e| e.code), Some(-32602));
    }

    #[test]
    fn test_chain_walks_sources() {
        let error = Error::Authentication {
            username: "admin".to_string(),
            server: "https://zabbix.local".to_string(),
            source: Box::new(Error::Api {
                method: "user.login".to_string(),
                error: ApiErrorData::new(-32602, "Login name or password is incorrect."),
            }),
        };

        let chain = error.chain();
        assert!(chain.starts_with("can't authorize user 'admin'"));
        assert!(chain.contains("user.login"));
        assert!(chain.contains("Login name or password is incorrect."));
    }

    #[test]
    fn test_render_chain_accepts_foreign_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(render_chain(&io), "refused");

        let nested = Error::Membership {
            group: "ops".to_string(),
            source: Box::new(Error::Config("bad".to_string())),
        };
        assert_eq!(
            render_chain(&nested),
            "can't update usergroup ops: configuration error: bad"
        );
    }

    #[test]
    fn test_session_error_display_has_path() {
        let error = Error::Session {
            path: PathBuf::from("/tmp/zabbixctl.session"),
            message: "can't open session file: permission denied".to_string(),
        };
        assert!(error.to_string().contains("/tmp/zabbixctl.session"));
    }
}
