//! Client builder for configuring credentials, TLS and sessions
//!
//! The `ClientBuilder` provides a fluent API for configuring client behavior
//! before connecting. It allows you to:
//! - Set the credentials used when no fresh session is available
//! - Skip TLS certificate verification for self-signed servers
//! - Reuse a session token across runs through a session file
//! - Replace the default `tracing` observer
//!
//! # Examples
//!
//! ```rust,no_run
//! use zabbixctl_client::ClientBuilder;
//!
//! # async fn example() -> zabbixctl_core::Result<()> {
//! let client = ClientBuilder::new("zabbix.example.com")
//!     .credentials("Admin", "zabbix")
//!     .session_file("/home/me/.cache/zabbixctl.session")
//!     .connect()
//!     .await?;
//!
//! println!("server runs api {}", client.api_version());
//! # Ok(())
//! # }
//! ```

use crate::auth::{AuthFlow, Credentials};
use crate::client::ZabbixClient;
use crate::observer::{CallObserver, TracingObserver};
use crate::session::{SessionStore, SESSION_TTL};
use crate::transport::{Transport, API_PATH};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use zabbixctl_core::{Error, Result};

/// Builder for configuring and creating a ZabbixClient
pub struct ClientBuilder {
    address: String,
    username: String,
    password: Option<String>,
    insecure: bool,
    session_file: Option<PathBuf>,
    session_ttl: Duration,
    observer: Arc<dyn CallObserver>,
    trace_bodies: bool,
}

impl ClientBuilder {
    /// Create a new client builder for a server address
    ///
    /// The address may omit the scheme, `https://` is assumed.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            username: String::new(),
            password: None,
            insecure: false,
            session_file: None,
            session_ttl: SESSION_TTL,
            observer: Arc::new(TracingObserver),
            trace_bodies: false,
        }
    }

    /// Set user name and password
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = Some(password.into());
        self
    }

    /// Accept invalid TLS certificates
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Persist the session token in `path`
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Override how long a session file stays usable (840 seconds by default)
    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Replace the default `tracing` observer
    pub fn observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Report pretty-printed response bodies to the observer
    pub fn trace_bodies(mut self, enabled: bool) -> Self {
        self.trace_bodies = enabled;
        self
    }

    /// Negotiate the version, authenticate and build the client
    ///
    /// # Errors
    ///
    /// - `Error::Config` if no password was given or the HTTP client fails
    /// - any error of [`AuthFlow::run`]
    pub async fn connect(self) -> Result<ZabbixClient> {
        let password = self.password.ok_or_else(|| {
            Error::Config(format!(
                "no password configured for user '{}'",
                self.username
            ))
        })?;
        let credentials = Credentials::new(self.username, password);

        let base_url = normalize_address(&self.address);
        let api_url = format!("{}{}", base_url, API_PATH);

        self.observer
            .on_progress(&format!("tls insecure = {}", self.insecure));

        let transport = Transport::new(api_url, self.insecure, self.observer, self.trace_bodies)?;

        let session = self
            .session_file
            .map(|path| SessionStore::new(path).with_ttl(self.session_ttl));

        let authenticated =
            AuthFlow::new(&transport, &base_url, &credentials, session.as_ref())
                .run()
                .await?;

        Ok(ZabbixClient::from_parts(
            transport,
            base_url,
            authenticated,
            session,
        ))
    }
}

/// Default the scheme to `https://` and drop one trailing slash
pub fn normalize_address(address: &str) -> String {
    let address = address.trim();
    let with_scheme = if address.contains("://") {
        address.to_string()
    } else {
        format!("https://{}", address)
    };
    match with_scheme.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => with_scheme,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_address("zabbix.local"), "https://zabbix.local");
        assert_eq!(
            normalize_address("zabbix.local/zabbix/"),
            "https://zabbix.local/zabbix"
        );
    }

    #[test]
    fn test_normalize_keeps_explicit_scheme() {
        assert_eq!(normalize_address("http://10.0.0.1:8080/"), "http://10.0.0.1:8080");
        assert_eq!(normalize_address("https://zabbix.local"), "https://zabbix.local");
    }

    #[test]
    fn test_normalize_strips_one_slash_only() {
        assert_eq!(normalize_address("https://zabbix.local//"), "https://zabbix.local/");
    }

    #[tokio::test]
    async fn test_connect_without_password_is_config_error() {
        let err = ClientBuilder::new("127.0.0.1:1")
            .connect()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
