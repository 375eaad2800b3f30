//! Authentication flow
//!
//! Client construction walks a small state machine:
//!
//! ```text
//! Uninitialized -> VersionKnown -> SessionRestored -> Authenticated
//!                              \-> SessionMissing  -> Authenticated
//! ```
//!
//! # States
//!
//! - **Uninitialized**: nothing is known about the server
//! - **VersionKnown**: `apiinfo.version` answered and the protocol profile is
//!   fixed
//! - **SessionRestored**: a fresh token was read from the session file, no
//!   login is needed
//! - **SessionMissing**: no session file configured, or the file was stale or
//!   empty
//! - **Authenticated**: a token is active; when a session file is configured
//!   it has been rewritten, which restarts its TTL window
//!
//! Every failure aborts the flow. There is no anonymous fallback and no
//! default version.

use crate::session::SessionStore;
use crate::transport::{Credential, Transport};
use std::fmt;
use zabbixctl_core::{ApiVersion, Error, Params, ProtocolProfile, Result};

/// Method returning the server API version
pub const VERSION_METHOD: &str = "apiinfo.version";

/// Method exchanging credentials for a session token
pub const LOGIN_METHOD: &str = "user.login";

/// Position of the authentication flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Uninitialized,
    VersionKnown,
    SessionRestored,
    SessionMissing,
    Authenticated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthState::Uninitialized => "uninitialized",
            AuthState::VersionKnown => "version-known",
            AuthState::SessionRestored => "session-restored",
            AuthState::SessionMissing => "session-missing",
            AuthState::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

/// User name and password for `user.login`
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"**********")
            .finish()
    }
}

/// Outcome of a completed flow
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub version: ApiVersion,
    pub profile: ProtocolProfile,
    pub token: String,
    /// Whether the token came from the session file rather than a login
    pub restored: bool,
}

/// Ask the server for its API version
///
/// # Errors
///
/// Returns `Error::Version` when the call fails, the server sends no version
/// or the version can't be parsed.
pub async fn fetch_version(transport: &Transport) -> Result<ApiVersion> {
    let raw: Option<String> = transport
        .call(VERSION_METHOD, &Params::new(), Credential::Anonymous)
        .await
        .map_err(|e| Error::Version(format!("can't get zabbix api version: {}", e.chain())))?;

    let raw = raw.ok_or_else(|| {
        Error::Version("can't get zabbix api version: empty result".to_string())
    })?;

    ApiVersion::parse(raw)
}

/// Exchange credentials for a session token
///
/// The user name travels under the key chosen by the protocol profile.
///
/// # Errors
///
/// Propagates call errors; an empty token is reported as `Error::Decode`.
pub async fn login(
    transport: &Transport,
    profile: &ProtocolProfile,
    credentials: &Credentials,
) -> Result<String> {
    let params = Params::new()
        .with("password", credentials.password.as_str())
        .with(profile.login_user_key, credentials.username.as_str());

    let token: Option<String> = transport
        .call(LOGIN_METHOD, &params, Credential::Anonymous)
        .await?;

    match token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::Decode {
            method: LOGIN_METHOD.to_string(),
            message: "server returned no session token".to_string(),
        }),
    }
}

/// Drives a transport from `Uninitialized` to `Authenticated`
pub struct AuthFlow<'a> {
    transport: &'a Transport,
    server: &'a str,
    credentials: &'a Credentials,
    session: Option<&'a SessionStore>,
    state: AuthState,
}

impl<'a> AuthFlow<'a> {
    /// `server` is the base address used in error messages
    pub fn new(
        transport: &'a Transport,
        server: &'a str,
        credentials: &'a Credentials,
        session: Option<&'a SessionStore>,
    ) -> Self {
        Self {
            transport,
            server,
            credentials,
            session,
            state: AuthState::Uninitialized,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Run the flow to completion
    ///
    /// # Errors
    ///
    /// - `Error::Version` if the version can't be fetched or parsed
    /// - `Error::Session` if the session file can't be read or written
    /// - `Error::Authentication` wrapping the cause when login fails
    pub async fn run(mut self) -> Result<Authenticated> {
        let version = fetch_version(self.transport).await?;
        let profile = ProtocolProfile::for_version(&version)?;
        self.transport
            .observer()
            .on_progress(&format!("zabbix api version {}", version));
        self.advance(AuthState::VersionKnown);

        let restored = match self.session {
            Some(store) => {
                self.transport.observer().on_progress("reading session file");
                store.restore()?
            }
            None => {
                self.transport
                    .observer()
                    .on_progress("session feature is not used");
                None
            }
        };

        let (token, was_restored) = match restored {
            Some(token) => {
                self.advance(AuthState::SessionRestored);
                self.transport
                    .observer()
                    .on_progress("using session instead of authorization");
                (token, true)
            }
            None => {
                self.advance(AuthState::SessionMissing);
                let token = login(self.transport, &profile, self.credentials)
                    .await
                    .map_err(|e| Error::Authentication {
                        username: self.credentials.username.clone(),
                        server: self.server.to_string(),
                        source: Box::new(e),
                    })?;
                (token, false)
            }
        };

        self.advance(AuthState::Authenticated);

        if let Some(store) = self.session {
            self.transport
                .observer()
                .on_progress("rewriting session file");
            store.persist(&token)?;
        }

        Ok(Authenticated {
            version,
            profile,
            token,
            restored: was_restored,
        })
    }

    fn advance(&mut self, to: AuthState) {
        let from = self.state;
        self.state = to;
        self.transport.observer().on_auth_state(from, to);
    }
}
