//! Configuration file loading
//!
//! The command-line tool reads a TOML file, by default
//! `~/.config/zabbixctl.conf`:
//!
//! ```toml
//! [server]
//! address  = "https://zabbix.local"
//! username = "admin"
//! password = "password"
//! insecure = "false"
//!
//! [session]
//! path = "~/.cache/zabbixctl.session"
//! ```
//!
//! The `ZABBIXCTL_USERPASS` environment variable overrides the configured
//! password. A leading `~/` in the session path is expanded to the home
//! directory, and an empty session path disables session reuse.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use zabbixctl_client::ClientBuilder;
use zabbixctl_core::{Error, Result};

/// Environment variable overriding `server.password`
pub const PASSWORD_ENV: &str = "ZABBIXCTL_USERPASS";

/// Loaded configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// `[server]` section
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub insecure: InsecureFlag,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("insecure", &self.insecure)
            .finish_non_exhaustive()
    }
}

/// `[session]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub path: String,
}

/// `insecure` as written in the file, a string or a TOML boolean
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InsecureFlag {
    Flag(bool),
    Text(String),
}

impl Default for InsecureFlag {
    fn default() -> Self {
        InsecureFlag::Flag(false)
    }
}

impl InsecureFlag {
    /// # Errors
    ///
    /// Returns `Error::Config` for text that isn't a boolean.
    pub fn value(&self) -> Result<bool> {
        match self {
            InsecureFlag::Flag(flag) => Ok(*flag),
            InsecureFlag::Text(text) => parse_bool_flag(text).ok_or_else(|| {
                Error::Config(format!(
                    "can't parse insecure config flag, expected boolean, got '{}'",
                    text
                ))
            }),
        }
    }
}

/// Boolean text as accepted in the config file, case-insensitive
///
/// `1`, `t` and `true` are true; `0`, `f` and `false` are false.
pub fn parse_bool_flag(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// `~/.config/zabbixctl.conf`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("zabbixctl.conf"))
}

/// Replace a leading `~/` with `home`
fn expand_home(path: &str, home: Option<&Path>) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => home.map(|home| home.join(rest)).ok_or_else(|| {
            Error::Config(format!("can't expand '{}': home directory unknown", path))
        }),
        None => Ok(PathBuf::from(path)),
    }
}

impl Config {
    /// Load `path`, applying the password override from the environment
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file can't be read or parsed, or no
    /// password is available.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("can't read config '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(
            &text,
            &path.display().to_string(),
            std::env::var(PASSWORD_ENV).ok(),
            dirs::home_dir().as_deref(),
        )?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration text
    ///
    /// `source` names the origin in error messages; `env_password` wins over
    /// the configured password when present.
    pub fn from_toml_str(
        text: &str,
        source: &str,
        env_password: Option<String>,
        home: Option<&Path>,
    ) -> Result<Self> {
        let mut config: Config = toml::from_str(text)
            .map_err(|e| Error::Config(format!("can't parse config '{}': {}", source, e)))?;

        if config.server.address.is_empty() {
            return Err(Error::Config(format!(
                "server.address is required in {}",
                source
            )));
        }
        if config.server.username.is_empty() {
            return Err(Error::Config(format!(
                "server.username is required in {}",
                source
            )));
        }

        if config.session.path.starts_with("~/") {
            config.session.path = expand_home(&config.session.path, home)?
                .display()
                .to_string();
        }

        match env_password {
            Some(password) => config.server.password = password,
            None if config.server.password.is_empty() => {
                return Err(Error::Config(format!(
                    "zabbix user password not found in {} or env variable {}",
                    source, PASSWORD_ENV
                )));
            }
            None => {}
        }

        config.server.insecure.value()?;
        Ok(config)
    }

    /// Session file, `None` when session reuse is disabled
    pub fn session_path(&self) -> Option<PathBuf> {
        if self.session.path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.session.path))
        }
    }

    /// Client builder configured from this file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `insecure` is not a boolean.
    pub fn client_builder(&self) -> Result<ClientBuilder> {
        let mut builder = ClientBuilder::new(&self.server.address)
            .credentials(&self.server.username, &self.server.password)
            .insecure(self.server.insecure.value()?);
        if let Some(path) = self.session_path() {
            builder = builder.session_file(path);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = r#"
[server]
address  = "https://zabbix.local"
username = "admin"
password = "password"
insecure = "false"

[session]
path = "~/.cache/zabbixctl.session"
"#;

    fn parse(text: &str, env: Option<&str>) -> Result<Config> {
        Config::from_toml_str(
            text,
            "test.conf",
            env.map(str::to_string),
            Some(Path::new("/home/admin")),
        )
    }

    #[test]
    fn test_full_config() {
        let config = parse(FULL, None).unwrap();
        assert_eq!(config.server.address, "https://zabbix.local");
        assert_eq!(config.server.username, "admin");
        assert_eq!(config.server.password, "password");
        assert!(!config.server.insecure.value().unwrap());
        assert_eq!(
            config.session_path(),
            Some(PathBuf::from("/home/admin/.cache/zabbixctl.session"))
        );
    }

    #[test]
    fn test_env_password_overrides_file() {
        let config = parse(FULL, Some("from-env")).unwrap();
        assert_eq!(config.server.password, "from-env");
    }

    #[test]
    fn test_env_password_alone_is_enough() {
        let text = "[server]\naddress = \"zabbix.local\"\nusername = \"admin\"\n";
        let config = parse(text, Some("from-env")).unwrap();
        assert_eq!(config.server.password, "from-env");
        assert_eq!(config.session_path(), None);
    }

    #[test]
    fn test_missing_password_names_both_sources() {
        let text = "[server]\naddress = \"zabbix.local\"\nusername = \"admin\"\n";
        let err = parse(text, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let message = err.to_string();
        assert!(message.contains("test.conf"));
        assert!(message.contains(PASSWORD_ENV));
    }

    #[test]
    fn test_missing_address_is_rejected() {
        let text = "[server]\nusername = \"admin\"\npassword = \"x\"\n";
        assert!(matches!(parse(text, None), Err(Error::Config(_))));
    }

    #[test]
    fn test_insecure_accepts_bool_text_and_toml_bool() {
        for (raw, expected) in [("\"TRUE\"", true), ("\"t\"", true), ("\"0\"", false), ("true", true)] {
            let text = format!(
                "[server]\naddress = \"a\"\nusername = \"u\"\npassword = \"p\"\ninsecure = {}\n",
                raw
            );
            let config = parse(&text, None).unwrap();
            assert_eq!(config.server.insecure.value().unwrap(), expected, "{}", raw);
        }
    }

    #[test]
    fn test_insecure_rejects_garbage() {
        let text = "[server]\naddress = \"a\"\nusername = \"u\"\npassword = \"p\"\ninsecure = \"maybe\"\n";
        let err = parse(text, None).unwrap_err();
        assert!(err.to_string().contains("'maybe'"));
    }

    #[test]
    fn test_parse_bool_flag() {
        assert_eq!(parse_bool_flag("True"), Some(true));
        assert_eq!(parse_bool_flag("F"), Some(false));
        assert_eq!(parse_bool_flag("yes"), None);
        assert_eq!(parse_bool_flag(""), None);
    }

    #[test]
    fn test_absolute_session_path_is_kept() {
        let text = "[server]\naddress = \"a\"\nusername = \"u\"\npassword = \"p\"\n[session]\npath = \"/var/tmp/s\"\n";
        let config = parse(text, None).unwrap();
        assert_eq!(config.session_path(), Some(PathBuf::from("/var/tmp/s")));
    }

    #[test]
    fn test_tilde_without_home_is_config_error() {
        let err = Config::from_toml_str(FULL, "test.conf", None, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = parse(FULL, Some("s3cret")).unwrap();
        assert!(!format!("{:?}", config).contains("s3cret"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zabbixctl.conf");
        std::fs::write(
            &path,
            "[server]\naddress = \"zabbix.local\"\nusername = \"admin\"\npassword = \"p\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.username, "admin");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.conf")).unwrap_err();
        assert!(err.to_string().contains("can't read config"));
    }
}
