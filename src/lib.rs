//! zabbixctl - command-line client for the Zabbix JSON-RPC API
//!
//! This is the main convenience crate that re-exports the zabbixctl
//! sub-crates and adds configuration file loading for the command-line tool.
//!
//! # Architecture
//!
//! zabbixctl is organized into modular crates:
//!
//! - **zabbixctl-core**: wire types, codec, version negotiation, errors,
//!   logging setup
//! - **zabbixctl-client**: HTTPS transport, session file, authentication flow
//!   and the typed endpoint facade
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use zabbixctl::config::{default_config_path, Config};
//! use zabbixctl::core::Params;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let path = default_config_path().ok_or("no home directory")?;
//!     let client = Config::load(&path)?.client_builder()?.connect().await?;
//!
//!     let hosts = client.get_hosts(Params::new()).await?;
//!     println!("{} hosts", hosts.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;

// Re-export the sub-crates so everything is reachable through `zabbixctl::`
pub use zabbixctl_client as client;
pub use zabbixctl_core as core;

// Convenience re-exports of the most commonly used types
pub use config::Config;
pub use zabbixctl_client::{ClientBuilder, ZabbixClient};
pub use zabbixctl_core::{Error, Params, Result};
