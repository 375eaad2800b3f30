//! JSON-RPC 2.0 types as spoken by the Zabbix API
//!
//! Every call is a `POST` of one [`ApiRequest`] to `api_jsonrpc.php`; every
//! answer is one response object carrying either a `result` or an `error`.
//!
//! # Authentication in the envelope
//!
//! Servers older than 6.4 expect the session token inline as the `auth`
//! member of the request. Newer servers take it from an
//! `Authorization: Bearer` header instead, in which case `auth` is omitted
//! from the body entirely.
//!
//! # Response Shapes
//!
//! The shape of `result` depends on the method: a string for
//! `apiinfo.version` and `user.login`, an array for most `*.get` methods, a
//! mapping keyed by entity id for `*.get` with `preservekeys`, and an object
//! of id lists for mutating methods. [`ApiResponse`] is generic over it;
//! [`RawResponse`] is the shape-agnostic fallback used by the codec.

use crate::error::ApiErrorData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Protocol version marker sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Always `"2.0"`
    pub jsonrpc: String,

    /// API method name, e.g. `trigger.get`
    pub method: String,

    /// Method parameters (an object or, for `*.delete`, an array of ids)
    pub params: serde_json::Value,

    /// Request identifier, unique per client
    pub id: i64,

    /// Session token in legacy auth mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

impl ApiRequest {
    /// Create a new request without inline authentication
    pub fn new(method: impl Into<String>, params: serde_json::Value, id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
            auth: None,
        }
    }

    /// Embed the session token in the body (legacy auth mode)
    pub fn with_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(token.into());
        self
    }
}

/// JSON-RPC response envelope with a method-specific result type
///
/// `result` is absent both when the server reported an error and when the
/// codec downgraded an empty-array result to "no data".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub jsonrpc: String,

    pub result: Option<T>,

    #[serde(default)]
    pub error: Option<ApiErrorData>,

    #[serde(default)]
    pub id: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Response carrying no data and no error
    pub fn empty(id: Option<i64>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: None,
            id,
        }
    }

    /// Error embedded by the server, if any
    pub fn error(&self) -> Option<&ApiErrorData> {
        self.error.as_ref()
    }

    /// Split into the result, or the server error when one is present
    pub fn into_result(self) -> std::result::Result<Option<T>, ApiErrorData> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result),
        }
    }
}

/// Shape-agnostic response used to inspect bodies that failed typed decoding
pub type RawResponse = ApiResponse<serde_json::Value>;

/// Request parameters: string keys to arbitrary JSON values
///
/// The facade merges its defaults with caller-supplied parameters through
/// [`Params::merge`]; keys supplied by the caller win.
///
/// # Examples
///
/// ```rust
/// use zabbixctl_core::Params;
/// use serde_json::json;
///
/// let defaults = Params::new().with("sortorder", "DESC").with("limit", 10);
/// let merged = defaults.merge(Params::new().with("limit", 50));
///
/// assert_eq!(merged.get("sortorder"), Some(&json!("DESC")));
/// assert_eq!(merged.get("limit"), Some(&json!(50)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, serde_json::Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    /// Overlay `overrides` on top of `self`
    pub fn merge(mut self, overrides: Params) -> Self {
        self.0.extend(overrides.0);
        self
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Params {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
