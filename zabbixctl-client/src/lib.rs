//! Zabbix JSON-RPC client over HTTPS
//!
//! This crate turns the wire types of `zabbixctl-core` into a working,
//! authenticated client for the Zabbix API.
//!
//! # Core Features
//!
//! - **Version Negotiation**: one `apiinfo.version` probe fixes the protocol
//!   profile for the lifetime of the client
//! - **Session Reuse**: the token is kept in a file and reused for 840 seconds
//! - **Auth Modes**: bearer header on 6.4+, inline `auth` member below
//! - **Typed Facade**: triggers, hosts, items, maintenances, users and more,
//!   decoded into typed records
//! - **Observability**: every call is reported to a pluggable
//!   [`CallObserver`], `tracing` by default
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use zabbixctl_client::ZabbixClient;
//! use zabbixctl_core::Params;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ZabbixClient::builder("https://zabbix.example.com")
//!         .credentials("Admin", "zabbix")
//!         .session_file("/tmp/zabbixctl.session")
//!         .connect()
//!         .await?;
//!
//!     for trigger in client.get_triggers(Params::new()).await? {
//!         println!("{} {}", trigger.priority, trigger.description);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod auth;
mod client;
mod client_builder;
mod observer;
pub mod records;
mod request;
mod session;
mod transport;

pub use api::{members_with, members_without, ACKNOWLEDGE_ACTION, ACKNOWLEDGE_MESSAGE};
pub use auth::{
    fetch_version, login, AuthFlow, AuthState, Authenticated, Credentials, LOGIN_METHOD,
    VERSION_METHOD,
};
pub use client::ZabbixClient;
pub use client_builder::{normalize_address, ClientBuilder};
pub use observer::{CallObserver, NoopObserver, TracingObserver};
pub use records::{
    History, Host, HostGroup, HostIds, HostRef, HttpStep, HttpTest, Item, ItemType, LastEvent,
    Maintenance, MaintenanceIds, Severity, TimePeriod, Trigger, TriggerFunction, TriggerValue,
    User, UserGroup,
};
pub use request::RequestIds;
pub use session::{SessionStore, SESSION_TTL};
pub use transport::{Credential, Transport, API_PATH, JSON_RPC_CONTENT_TYPE, USER_AGENT};
