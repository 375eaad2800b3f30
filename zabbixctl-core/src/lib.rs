//! Core Zabbix JSON-RPC types, codec and version negotiation for zabbixctl
//!
//! This crate provides the transport-independent half of the client:
//!
//! - **Types**: request/response envelopes, the server error object, `Params`
//! - **Codec**: encoding, decoding with empty-result tolerance, parameter dumps
//! - **Version**: API version parsing, constraint checks, protocol profiles
//! - **Error handling**: the error taxonomy shared by every crate
//! - **Logging**: `tracing` subscriber setup for the command-line tool
//!
//! The `zabbixctl-client` crate builds the HTTPS transport, session handling
//! and the typed endpoint facade on top of it.
//!
//! # Example
//!
//! ```rust
//! use zabbixctl_core::{codec, ApiRequest};
//!
//! let request = ApiRequest::new("apiinfo.version", serde_json::json!({}), 1);
//! let bytes = codec::encode_request(&request).unwrap();
//! assert!(String::from_utf8(bytes).unwrap().contains("apiinfo.version"));
//! ```

pub mod codec;
pub mod error;
pub mod logging;
pub mod types;
pub mod version;

pub use error::{render_chain, ApiErrorData, Error, Result};
pub use logging::{init_logging, LogConfig};
pub use types::{ApiRequest, ApiResponse, Params, RawResponse, JSONRPC_VERSION};
pub use version::{ApiVersion, AuthMode, ProtocolProfile};
