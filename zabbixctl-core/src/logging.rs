//! Logging configuration and initialization
//!
//! zabbixctl logs through `tracing`. The binary installs a `tracing-subscriber`
//! formatter on stderr, so stdout stays reserved for command output.
//!
//! # Verbosity
//!
//! | verbosity | level   | what is shown                                      |
//! |-----------|---------|----------------------------------------------------|
//! | 0         | `warn`  | warnings and errors only                           |
//! | 1         | `debug` | methods, redacted params, HTTP status, auth steps  |
//! | 2+        | `trace` | everything above plus pretty-printed bodies        |
//!
//! `RUST_LOG`, when set, overrides the level derived from verbosity.
//!
//! # Usage Pattern
//!
//! ```rust,no_run
//! use zabbixctl_core::LogConfig;
//!
//! let config = LogConfig::new(2);
//! zabbixctl_core::init_logging(&config).expect("Failed to init logging");
//! assert!(config.trace_bodies());
//! ```

use tracing_subscriber::EnvFilter;

/// Logging configuration for the command-line tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Number of `-v` flags given
    pub verbosity: u8,

    /// Include file and line in each record
    pub with_location: bool,
}

impl LogConfig {
    pub fn new(verbosity: u8) -> Self {
        Self {
            verbosity,
            with_location: verbosity > 0,
        }
    }

    /// Level directive for the given verbosity
    pub fn level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Whether full response bodies should be traced
    pub fn trace_bodies(&self) -> bool {
        self.verbosity >= 2
    }
}

/// Install the global `tracing` subscriber
///
/// Call this once at startup, before building the client.
///
/// # Errors
///
/// Fails if the filter directive is invalid or a global subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.is_empty() => EnvFilter::try_new(directive)?,
        _ => EnvFilter::try_new(config.level())?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(config.with_location)
        .with_line_number(config.with_location)
        .try_init()?;

    tracing::debug!(verbosity = config.verbosity, level = config.level(), "logging initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_by_verbosity() {
        assert_eq!(LogConfig::new(0).level(), "warn");
        assert_eq!(LogConfig::new(1).level(), "debug");
        assert_eq!(LogConfig::new(2).level(), "trace");
        assert_eq!(LogConfig::new(7).level(), "trace");
    }

    #[test]
    fn test_trace_bodies_only_at_max_verbosity() {
        assert!(!LogConfig::new(0).trace_bodies());
        assert!(!LogConfig::new(1).trace_bodies());
        assert!(LogConfig::new(2).trace_bodies());
    }

    #[test]
    fn test_default_is_quiet() {
        let config = LogConfig::default();
        assert_eq!(config.verbosity, 0);
        assert!(!config.with_location);
    }
}
