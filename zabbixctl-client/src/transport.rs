//! HTTPS call engine
//!
//! Frames a JSON-RPC request, attaches credentials the way the negotiated
//! protocol profile asks for, posts it to `api_jsonrpc.php` and decodes the
//! answer.
//!
//! # Call Sequence
//!
//! 1. **Id**: allocate a fresh request id
//! 2. **Encode**: build and serialize the envelope
//! 3. **Authenticate**: bearer header or inline `auth`, never both
//! 4. **Send**: `POST` with `Content-Type: application/json-rpc`
//! 5. **Decode**: typed decode, tolerating an empty-array result
//! 6. **Check**: surface an embedded server error as `Error::Api`
//!
//! Nothing is retried and no timeout is added on top of the HTTP client's
//! defaults.

use crate::observer::CallObserver;
use crate::request::RequestIds;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use zabbixctl_core::{codec, render_chain, ApiRequest, AuthMode, Error, Result};

/// User agent sent with every request
pub const USER_AGENT: &str = "zabbixctl";

/// Content type expected by the Zabbix API
pub const JSON_RPC_CONTENT_TYPE: &str = "application/json-rpc";

/// Path of the JSON-RPC endpoint below the server address
pub const API_PATH: &str = "/api_jsonrpc.php";

/// Credentials attached to a single call
#[derive(Clone, Copy)]
pub enum Credential<'a> {
    /// Version probe and login
    Anonymous,
    /// Authenticated call
    Session { token: &'a str, mode: AuthMode },
}

/// JSON-RPC over HTTPS transport
pub struct Transport {
    http: reqwest::Client,
    api_url: String,
    ids: RequestIds,
    observer: Arc<dyn CallObserver>,
    trace_bodies: bool,
}

impl Transport {
    /// Create a transport posting to `api_url`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the HTTP client can't be built.
    pub fn new(
        api_url: impl Into<String>,
        insecure: bool,
        observer: Arc<dyn CallObserver>,
        trace_bodies: bool,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(|e| Error::Config(format!("can't create http client: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.into(),
            ids: RequestIds::new(),
            observer,
            trace_bodies,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub(crate) fn observer(&self) -> &dyn CallObserver {
        self.observer.as_ref()
    }

    /// Issue one call and decode its result
    ///
    /// Returns `Ok(None)` when the server sent no result, which includes the
    /// empty-array result of a mapping-shaped method.
    ///
    /// # Errors
    ///
    /// - `Error::Serialization` if params or envelope can't be encoded
    /// - `Error::Transport` if the request fails or the body can't be read
    /// - `Error::Decode` if the body doesn't match the expected shape; the
    ///   HTTP status is included when it wasn't 2xx
    /// - `Error::Api` if the server returned an error object
    pub async fn call<P, T>(
        &self,
        method: &str,
        params: &P,
        credential: Credential<'_>,
    ) -> Result<Option<T>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let id = self.ids.next_id();
        let params = codec::params_value(params)?;
        self.observer
            .on_request(id, method, &codec::describe_params(&params));

        let mut request = ApiRequest::new(method, params, id);
        let mut bearer = None;
        match credential {
            Credential::Anonymous => {}
            Credential::Session {
                token,
                mode: AuthMode::Legacy,
            } => request = request.with_auth(token),
            Credential::Session {
                token,
                mode: AuthMode::Bearer,
            } => bearer = Some(token),
        }

        let body = codec::encode_request(&request)?;

        let mut builder = self
            .http
            .post(&self.api_url)
            .header(CONTENT_TYPE, JSON_RPC_CONTENT_TYPE)
            .body(body);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| Error::Transport {
            method: method.to_string(),
            message: render_chain(&e),
        })?;

        let status = response.status();
        self.observer.on_response(id, method, &status.to_string());

        let bytes = response.bytes().await.map_err(|e| Error::Transport {
            method: method.to_string(),
            message: format!("can't read zabbix api response body: {}", render_chain(&e)),
        })?;

        if self.trace_bodies {
            self.observer
                .on_body(id, method, &codec::pretty_body(&bytes));
        }

        let decoded = codec::decode_response::<T>(&bytes).map_err(|e| Error::Decode {
            method: method.to_string(),
            message: if status.is_success() {
                e.to_string()
            } else {
                format!("http status {}: {}", status, e)
            },
        })?;

        decoded.into_result().map_err(|error| Error::Api {
            method: method.to_string(),
            error,
        })
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("api_url", &self.api_url)
            .field("last_id", &self.ids.last_id())
            .field("trace_bodies", &self.trace_bodies)
            .finish()
    }
}
