//! Session token persistence
//!
//! The session token is kept in a single file holding nothing but the raw
//! token. The file's modification time is the only expiry signal: a token is
//! reused while the file is younger than the TTL, and the file is rewritten
//! after every successful construction so that each run renews the window.
//!
//! The server's default session lifetime is 900 seconds; the store keeps a
//! 60 second margin, giving an effective TTL of 840 seconds.
//!
//! No locking is performed. Two concurrent invocations sharing a session file
//! race, and the last writer wins.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use zabbixctl_core::{Error, Result};

/// Effective session lifetime: 900 seconds minus a 60 second margin
pub const SESSION_TTL: Duration = Duration::from_secs(900 - 60);

/// File-backed session token store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store for the given path with the default TTL
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: SESSION_TTL,
        }
    }

    /// Override the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read the stored token if the file is fresh
    ///
    /// The file is created (owner read/write only) when missing, so a first
    /// run never fails. Returns `None` when the file is older than the TTL or
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::Session` if the file can't be opened, inspected or
    /// read.
    pub fn restore(&self) -> Result<Option<String>> {
        let mut file = self
            .open_options(false)
            .read(true)
            .open(&self.path)
            .map_err(|e| self.error("can't open session file", e))?;

        let modified = file
            .metadata()
            .and_then(|meta| meta.modified())
            .map_err(|e| self.error("can't stat session file", e))?;

        // A modification time in the future counts as fresh.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age >= self.ttl {
            return Ok(None);
        }

        let mut token = String::new();
        file.read_to_string(&mut token)
            .map_err(|e| self.error("can't read session file", e))?;

        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token))
        }
    }

    /// Overwrite the file with `token`, refreshing its modification time
    ///
    /// # Errors
    ///
    /// Returns `Error::Session` if the file can't be written.
    pub fn persist(&self, token: &str) -> Result<()> {
        let mut file = self
            .open_options(true)
            .open(&self.path)
            .map_err(|e| self.error("can't write session file", e))?;

        restrict_permissions(&file).map_err(|e| self.error("can't restrict session file", e))?;

        file.write_all(token.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| self.error("can't write session file", e))
    }

    fn open_options(&self, truncate: bool) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(truncate);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options
    }

    fn error(&self, context: &str, err: std::io::Error) -> Error {
        Error::Session {
            path: self.path.clone(),
            message: format!("{}: {}", context, err),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn age_file(path: &Path, by: Duration) {
        let file = OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[test]
    fn test_restore_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zabbixctl.session");
        let store = SessionStore::new(&path);

        assert_eq!(store.restore().unwrap(), None);
        assert!(path.exists());
    }

    #[test]
    fn test_persist_then_restore_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session"));

        for token in ["0424bd59b807674191e7d77572075f33", "token with spaces\n", "ü"] {
            store.persist(token).unwrap();
            assert_eq!(store.restore().unwrap().as_deref(), Some(token));
        }
    }

    #[test]
    fn test_persist_overwrites_longer_token() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session"));

        store.persist("a-much-longer-previous-token").unwrap();
        store.persist("short").unwrap();
        assert_eq!(store.restore().unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn test_restore_ignores_stale_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        let store = SessionStore::new(&path);

        store.persist("stale-token").unwrap();
        age_file(&path, SESSION_TTL + Duration::from_secs(1));

        assert_eq!(store.restore().unwrap(), None);
    }

    #[test]
    fn test_restore_keeps_recent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        let store = SessionStore::new(&path);

        store.persist("recent-token").unwrap();
        age_file(&path, Duration::from_secs(10));

        assert_eq!(store.restore().unwrap().as_deref(), Some("recent-token"));
    }

    #[test]
    fn test_zero_ttl_is_always_stale() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session")).with_ttl(Duration::ZERO);

        store.persist("token").unwrap();
        assert_eq!(store.restore().unwrap(), None);
    }

    #[test]
    fn test_empty_file_is_not_a_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "").unwrap();

        assert_eq!(SessionStore::new(&path).restore().unwrap(), None);
    }

    #[test]
    fn test_restore_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("missing").join("session"));

        let err = store.restore().unwrap_err();
        assert!(matches!(err, Error::Session { .. }));
        assert!(err.to_string().contains("can't open session file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_persist_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        SessionStore::new(&path).persist("token").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
