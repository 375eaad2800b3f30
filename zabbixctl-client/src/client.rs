//! Authenticated Zabbix API client
//!
//! `ZabbixClient` is what [`ClientBuilder::connect`](crate::ClientBuilder::connect)
//! returns once the server version is known and a session token is active.
//! It carries the negotiated [`ProtocolProfile`], so every call attaches the
//! token the same way without re-checking the version.
//!
//! # Cloning
//!
//! `ZabbixClient` is cheaply cloneable using `Arc` internally. All clones
//! share the same transport, request id counter and session token.
//!
//! # Thread Safety
//!
//! The client is `Send + Sync`; request ids stay distinct when clones are
//! used from several tasks at once.

use crate::auth::Authenticated;
use crate::session::SessionStore;
use crate::transport::{Credential, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use zabbixctl_core::{ApiVersion, ProtocolProfile, Result};

struct Inner {
    transport: Transport,
    base_url: String,
    version: ApiVersion,
    profile: ProtocolProfile,
    token: String,
    restored: bool,
    session: Option<SessionStore>,
}

/// Zabbix JSON-RPC client holding an active session
#[derive(Clone)]
pub struct ZabbixClient {
    inner: Arc<Inner>,
}

impl ZabbixClient {
    /// Start configuring a client for `address`
    pub fn builder(address: impl Into<String>) -> crate::ClientBuilder {
        crate::ClientBuilder::new(address)
    }

    pub(crate) fn from_parts(
        transport: Transport,
        base_url: String,
        authenticated: Authenticated,
        session: Option<SessionStore>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                base_url,
                version: authenticated.version,
                profile: authenticated.profile,
                token: authenticated.token,
                restored: authenticated.restored,
                session,
            }),
        }
    }

    /// Version reported by `apiinfo.version`
    pub fn api_version(&self) -> &ApiVersion {
        &self.inner.version
    }

    /// Protocol behaviour derived from the version
    pub fn profile(&self) -> ProtocolProfile {
        self.inner.profile
    }

    /// Server address without the API path, e.g. `https://zabbix.local`
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Full URL of the JSON-RPC endpoint
    pub fn api_url(&self) -> &str {
        self.inner.transport.api_url()
    }

    /// Session file in use, if any
    pub fn session(&self) -> Option<&SessionStore> {
        self.inner.session.as_ref()
    }

    /// Whether the token was reused from the session file
    pub fn session_restored(&self) -> bool {
        self.inner.restored
    }

    /// Make an authenticated call
    ///
    /// Returns `Ok(None)` when the server sent no result, including the empty
    /// array answer to a mapping-shaped query.
    pub async fn call<P, T>(&self, method: &str, params: &P) -> Result<Option<T>>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let credential = Credential::Session {
            token: &self.inner.token,
            mode: self.inner.profile.auth_mode,
        };
        self.inner.transport.call(method, params, credential).await
    }

    /// Make an authenticated call, mapping a missing result to `T::default()`
    pub async fn request<P, T>(&self, method: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        Ok(self.call(method, params).await?.unwrap_or_default())
    }

    pub(crate) fn progress(&self, message: &str) {
        self.inner.transport.observer().on_progress(message);
    }

    /// Graph page for a single item
    pub fn graph_url(&self, item_id: &str) -> String {
        self.history_url(&[item_id], "showgraph", "0")
    }

    /// Combined graph for several items
    pub fn normal_graph_url<S: AsRef<str>>(&self, item_ids: &[S]) -> String {
        self.history_url(item_ids, "batchgraph", "0")
    }

    /// Stacked graph for several items
    pub fn stacked_graph_url<S: AsRef<str>>(&self, item_ids: &[S]) -> String {
        self.history_url(item_ids, "batchgraph", "1")
    }

    fn history_url<S: AsRef<str>>(&self, item_ids: &[S], action: &str, graph_type: &str) -> String {
        history_url(&self.inner.base_url, item_ids, action, graph_type)
    }
}

impl std::fmt::Debug for ZabbixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZabbixClient")
            .field("base_url", &self.inner.base_url)
            .field("version", &self.inner.version.as_str())
            .field("profile", &self.inner.profile)
            .field("session", &self.inner.session)
            .finish()
    }
}

fn history_url<S: AsRef<str>>(base_url: &str, item_ids: &[S], action: &str, graph_type: &str) -> String {
    let items = item_ids
        .iter()
        .map(|id| format!("itemids%5B%5D={}", id.as_ref()))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}/history.php?action={}&graphtype={}&{}",
        base_url, action, graph_type, items
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_url_single_item() {
        assert_eq!(
            history_url("https://zabbix.local", &["23296"], "showgraph", "0"),
            "https://zabbix.local/history.php?action=showgraph&graphtype=0&itemids%5B%5D=23296"
        );
    }

    #[test]
    fn test_history_url_several_items() {
        let url = history_url("https://zabbix.local", &["1", "2"], "batchgraph", "1");
        assert_eq!(
            url,
            "https://zabbix.local/history.php?action=batchgraph&graphtype=1&itemids%5B%5D=1&itemids%5B%5D=2"
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ZabbixClient>();
    }
}
