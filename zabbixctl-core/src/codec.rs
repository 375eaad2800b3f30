//! Codec for Zabbix JSON-RPC message serialization and deserialization
//!
//! # Empty Results
//!
//! Zabbix answers "no matches" with `"result": []` regardless of the shape
//! the method normally returns. For methods whose result is a mapping (for
//! example `trigger.get` with `preservekeys`), the typed decode of such an
//! answer fails. [`decode_response`] therefore falls back to a shape-agnostic
//! decode, and downgrades the failure to an empty response only when the raw
//! `result` is an empty array. Every other decode failure is returned as-is,
//! including non-empty results of the wrong shape.
//!
//! # Parameter Dumps
//!
//! [`describe_params`] renders request parameters for debug logging with the
//! `password` key masked at any depth.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use zabbixctl_core::codec;
//!
//! let body = br#"{"jsonrpc":"2.0","result":[],"id":1}"#;
//! let response = codec::decode_response::<BTreeMap<String, String>>(body).unwrap();
//! assert!(response.result.is_none());
//! assert!(response.error().is_none());
//! ```

use crate::error::{Error, Result};
use crate::types::{ApiRequest, ApiResponse, RawResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Replacement shown instead of password values
pub const MASKED_VALUE: &str = "**********";

/// Encode any serializable message to JSON bytes
///
/// # Errors
///
/// Returns `Error::Serialization` if the message cannot be serialized.
pub fn encode<T: Serialize + ?Sized>(msg: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a request envelope
pub fn encode_request(req: &ApiRequest) -> Result<Vec<u8>> {
    encode(req)
}

/// Convert caller parameters into the `params` member of an envelope
///
/// # Errors
///
/// Returns `Error::Serialization` if the parameters can't be represented as
/// JSON (for example a map with non-string keys).
pub fn params_value<P: Serialize + ?Sized>(params: &P) -> Result<serde_json::Value> {
    serde_json::to_value(params).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a response body into a method-specific response shape
///
/// On typed decode failure the body is decoded again as a [`RawResponse`];
/// when that succeeds and its `result` is an empty array, an empty response
/// (no result, no error) is returned. Otherwise the original error is
/// returned unchanged.
///
/// The returned error carries the serde message only; the caller adds the
/// method name.
pub fn decode_response<T: DeserializeOwned>(
    body: &[u8],
) -> std::result::Result<ApiResponse<T>, serde_json::Error> {
    match serde_json::from_slice::<ApiResponse<T>>(body) {
        Ok(response) => Ok(response),
        Err(original) => {
            let raw: RawResponse = match serde_json::from_slice(body) {
                Ok(raw) => raw,
                Err(_) => return Err(original),
            };

            match &raw.result {
                Some(serde_json::Value::Array(items)) if items.is_empty() => {
                    Ok(ApiResponse::empty(raw.id))
                }
                _ => Err(original),
            }
        }
    }
}

/// Render parameters as `key: value` lines for debug logging
///
/// Object members are listed one per line, nested objects with a dotted key
/// prefix; top-level arrays are listed one element per line. Values under a
/// `password` key are masked.
pub fn describe_params(params: &serde_json::Value) -> Vec<String> {
    let mut lines = Vec::new();
    match params {
        serde_json::Value::Object(map) => describe_object(map, "", &mut lines),
        serde_json::Value::Array(items) => {
            for item in items {
                lines.push(render_value(item));
            }
        }
        serde_json::Value::Null => {}
        other => lines.push(render_value(other)),
    }
    lines
}

fn describe_object(
    map: &serde_json::Map<String, serde_json::Value>,
    prefix: &str,
    lines: &mut Vec<String>,
) {
    for (key, value) in map {
        if let serde_json::Value::Object(nested) = value {
            describe_object(nested, &format!("{}{}.", prefix, key), lines);
            continue;
        }

        if key == "password" {
            lines.push(format!("{}{}: {}", prefix, key, MASKED_VALUE));
        } else {
            lines.push(format!("{}{}: {}", prefix, key, render_value(value)));
        }
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pretty-print a response body for trace output
///
/// Bodies that aren't JSON are returned as lossy UTF-8 text.
pub fn pretty_body(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned()),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
