//! Session cache: the issued cookie persisted for later runs.
//!
//! Stored in ${GATEHOUSE_HOME}/session.json with restricted permissions
//! (0600). Token values are never printed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use gatehouse_auth::cookie::TokenCookie;
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// One cached login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    /// Origin the session was established against.
    pub origin: String,
    /// The session cookie as the browser would store it.
    pub cookie: TokenCookie,
    /// When the session was stored, in milliseconds since epoch.
    pub created_at_ms: u64,
}

impl StoredSession {
    /// Creates a session record stamped with the current time.
    pub fn new(origin: &str, cookie: TokenCookie) -> Self {
        let created_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            origin: origin.to_string(),
            cookie,
            created_at_ms,
        }
    }
}

/// Load/store/clear for the session cache file.
pub struct SessionCache;

impl SessionCache {
    /// Returns the path to the session cache file.
    pub fn cache_path() -> PathBuf {
        paths::session_path()
    }

    /// Loads the cached session.
    /// Returns None if the file doesn't exist.
    pub fn load() -> Result<Option<StoredSession>> {
        let path = Self::cache_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;

        let session = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", path.display()))?;
        Ok(Some(session))
    }

    /// Saves the session to disk with restricted permissions (0600).
    pub fn store(session: &StoredSession) -> Result<()> {
        let path = Self::cache_path();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Removes the cached session. Returns whether one existed.
    pub fn clear() -> Result<bool> {
        let path = Self::cache_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(true)
    }
}
