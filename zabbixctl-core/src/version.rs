//! Server version negotiation
//!
//! The client fetches the server's API version once (`apiinfo.version`) and
//! derives a [`ProtocolProfile`] from it. The profile captures every
//! version-dependent behaviour of the protocol so the call path never has to
//! re-evaluate constraints:
//!
//! | server version | login user key | auth transmission |
//! |----------------|----------------|-------------------|
//! | `< 5.4`        | `user`         | inline `auth`     |
//! | `>= 5.4, < 6.4`| `username`     | inline `auth`     |
//! | `>= 6.4`       | `username`     | bearer header     |
//!
//! Parse failures are hard errors; no default version is ever assumed.
//!
//! # Examples
//!
//! ```rust
//! use zabbixctl_core::{ApiVersion, AuthMode, ProtocolProfile};
//!
//! let version = ApiVersion::parse("6.4.0").unwrap();
//! assert!(version.satisfies(">=5.4").unwrap());
//!
//! let profile = ProtocolProfile::for_version(&version).unwrap();
//! assert_eq!(profile.login_user_key, "username");
//! assert_eq!(profile.auth_mode, AuthMode::Bearer);
//! ```

use crate::error::{Error, Result};
use semver::{Version, VersionReq};
use std::fmt;

/// First version accepting `username` instead of `user` in `user.login`
pub const USERNAME_LOGIN_CONSTRAINT: &str = ">=5.4";

/// First version accepting `Authorization: Bearer`
pub const BEARER_AUTH_CONSTRAINT: &str = ">=6.4";

/// API version reported by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion {
    raw: String,
    parsed: Version,
}

impl ApiVersion {
    /// Parse a version string as returned by `apiinfo.version`
    ///
    /// Versions with fewer than three numeric components (`"6.4"`) are padded
    /// with zeros.
    ///
    /// # Errors
    ///
    /// Returns `Error::Version` if the string is not a semantic version.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let normalized = pad_components(raw.trim());
        let parsed = Version::parse(&normalized)
            .map_err(|e| Error::Version(format!("error parsing apiVersion '{}': {}", raw, e)))?;
        Ok(Self { raw, parsed })
    }

    /// Version string exactly as reported by the server
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check the version against a range expression such as `>=6.4`
    ///
    /// # Errors
    ///
    /// Returns `Error::Version` if the constraint can't be parsed.
    pub fn satisfies(&self, constraint: &str) -> Result<bool> {
        let req = VersionReq::parse(constraint).map_err(|e| {
            Error::Version(format!(
                "error setting version constraint '{}': {}",
                constraint, e
            ))
        })?;
        Ok(req.matches(&self.parsed))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn pad_components(version: &str) -> String {
    let core_end = version.find(|c: char| c == '-' || c == '+').unwrap_or(version.len());
    let (core, rest) = version.split_at(core_end);
    let components = core.split('.').count();
    if components >= 3 || core.is_empty() {
        return version.to_string();
    }
    let mut padded = core.to_string();
    for _ in components..3 {
        padded.push_str(".0");
    }
    padded.push_str(rest);
    padded
}

/// How the session token travels with authenticated calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `auth` member of the JSON-RPC body
    Legacy,
    /// `Authorization: Bearer <token>` header
    Bearer,
}

/// Version-dependent protocol behaviour, derived once per client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolProfile {
    /// Parameter name carrying the user name in `user.login`
    pub login_user_key: &'static str,
    /// Auth transmission mode for authenticated calls
    pub auth_mode: AuthMode,
}

impl ProtocolProfile {
    /// Derive the profile from the negotiated server version
    ///
    /// # Errors
    ///
    /// Propagates constraint evaluation errors.
    pub fn for_version(version: &ApiVersion) -> Result<Self> {
        let login_user_key = if version.satisfies(USERNAME_LOGIN_CONSTRAINT)? {
            "username"
        } else {
            "user"
        };

        let auth_mode = if version.satisfies(BEARER_AUTH_CONSTRAINT)? {
            AuthMode::Bearer
        } else {
            AuthMode::Legacy
        };

        Ok(Self {
            login_user_key,
            auth_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        let version = ApiVersion::parse("6.4.12").unwrap();
        assert_eq!(version.as_str(), "6.4.12");
        assert_eq!(version.to_string(), "6.4.12");
    }

    #[test]
    fn test_parse_pads_short_versions() {
        let version = ApiVersion::parse("5.4").unwrap();
        assert!(version.satisfies(">=5.4").unwrap());
        assert!(!version.satisfies(">=6.4").unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let result = ApiVersion::parse("not-a-version");
        assert!(matches!(result, Err(Error::Version(_))));
    }

    #[test]
    fn test_satisfies_rejects_bad_constraint() {
        let version = ApiVersion::parse("6.0.0").unwrap();
        let result = version.satisfies(">>6");
        assert!(matches!(result, Err(Error::Version(_))));
    }

    #[test]
    fn test_satisfies_is_deterministic() {
        let version = ApiVersion::parse("6.2.3").unwrap();
        let first = version.satisfies(">=6.0, <6.4").unwrap();
        for _ in 0..10 {
            assert_eq!(version.satisfies(">=6.0, <6.4").unwrap(), first);
        }
        assert!(first);
    }

    #[test]
    fn test_profile_legacy_server() {
        let profile = ProtocolProfile::for_version(&ApiVersion::parse("5.0.30").unwrap()).unwrap();
        assert_eq!(profile.login_user_key, "user");
        assert_eq!(profile.auth_mode, AuthMode::Legacy);
    }

    #[test]
    fn test_profile_between_5_4_and_6_4() {
        let profile = ProtocolProfile::for_version(&ApiVersion::parse("6.0.21").unwrap()).unwrap();
        assert_eq!(profile.login_user_key, "username");
        assert_eq!(profile.auth_mode, AuthMode::Legacy);
    }

    #[test]
    fn test_profile_bearer_server() {
        for raw in ["6.4.0", "7.0.5", "7.2.0"] {
            let profile = ProtocolProfile::for_version(&ApiVersion::parse(raw).unwrap()).unwrap();
            assert_eq!(profile.login_user_key, "username", "version {}", raw);
            assert_eq!(profile.auth_mode, AuthMode::Bearer, "version {}", raw);
        }
    }

    #[test]
    fn test_profile_boundaries() {
        let below = ProtocolProfile::for_version(&ApiVersion::parse("5.3.9").unwrap()).unwrap();
        let at = ProtocolProfile::for_version(&ApiVersion::parse("5.4.0").unwrap()).unwrap();
        assert_eq!(below.login_user_key, "user");
        assert_eq!(at.login_user_key, "username");

        let below = ProtocolProfile::for_version(&ApiVersion::parse("6.3.9").unwrap()).unwrap();
        let at = ProtocolProfile::for_version(&ApiVersion::parse("6.4.0").unwrap()).unwrap();
        assert_eq!(below.auth_mode, AuthMode::Legacy);
        assert_eq!(at.auth_mode, AuthMode::Bearer);
    }
}
