//! Call observation hooks
//!
//! The transport and the authentication flow report what they do through a
//! [`CallObserver`] handed to them at construction, instead of writing to a
//! process-wide logger. The default [`TracingObserver`] turns every hook into
//! a `tracing` event; tests install their own observer to capture records.
//!
//! All hooks have empty default bodies, so an observer only implements what
//! it cares about.

use crate::auth::AuthState;

/// Receiver of transport and authentication events
pub trait CallObserver: Send + Sync {
    /// A request is about to be sent
    ///
    /// `params` is the redacted parameter dump, one `key: value` per entry.
    fn on_request(&self, _id: i64, _method: &str, _params: &[String]) {}

    /// An HTTP response arrived (`status` is the status line, e.g. `200 OK`)
    fn on_response(&self, _id: i64, _method: &str, _status: &str) {}

    /// Pretty-printed response body, only when body tracing is enabled
    fn on_body(&self, _id: i64, _method: &str, _body: &str) {}

    /// The authentication flow moved from one state to another
    fn on_auth_state(&self, _from: AuthState, _to: AuthState) {}

    /// Free-form progress message
    fn on_progress(&self, _message: &str) {}
}

/// Observer that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_request(&self, id: i64, method: &str, params: &[String]) {
        tracing::debug!(id, method, "~> {}", method);
        for param in params {
            tracing::debug!(id, "** {}", param);
        }
    }

    fn on_response(&self, id: i64, method: &str, status: &str) {
        tracing::debug!(id, method, "<~ {}", status);
    }

    fn on_body(&self, id: i64, method: &str, body: &str) {
        tracing::trace!(id, method, "<~ {}", body);
    }

    fn on_auth_state(&self, from: AuthState, to: AuthState) {
        tracing::debug!(from = %from, to = %to, "auth state changed");
    }

    fn on_progress(&self, message: &str) {
        tracing::debug!("* {}", message);
    }
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CallObserver for NoopObserver {}
