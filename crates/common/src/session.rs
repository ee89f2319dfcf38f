//! Bearer token persistence
//!
//! Tokens are kept per service in `session.json` so a login survives between
//! invocations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Token held for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    /// Profile or email the token was obtained with
    pub profile: String,
    pub obtained_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    tokens: BTreeMap<String, StoredToken>,
}

/// File-backed token store
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(store: &Path) -> Self {
        Self {
            path: store.join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, service: &str) -> Result<Option<StoredToken>> {
        Ok(self.read()?.tokens.remove(service))
    }

    /// Non-empty token for a service, if any
    pub fn token(&self, service: &str) -> Result<Option<String>> {
        Ok(self
            .get(service)?
            .map(|t| t.token)
            .filter(|t| !t.is_empty()))
    }

    pub fn set(&self, service: &str, token: &str, profile: &str) -> Result<StoredToken> {
        let stored = StoredToken {
            token: token.to_string(),
            profile: profile.to_string(),
            obtained_at: Utc::now(),
        };
        let mut file = self.read()?;
        file.tokens.insert(service.to_string(), stored.clone());
        self.write(&file)?;
        debug!(service, path = %self.path.display(), "Stored token");
        Ok(stored)
    }

    /// Remove the token for a service. Returns whether one was held.
    pub fn clear(&self, service: &str) -> Result<bool> {
        let mut file = self.read()?;
        let removed = file.tokens.remove(service).is_some();
        if removed {
            self.write(&file)?;
            debug!(service, "Cleared token");
        }
        Ok(removed)
    }

    fn read(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, file: &SessionFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(file)?;
        let mut out = open_private(&self.path)?;
        out.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Open for writing, creating the file owner-only (0600) on unix
#[cfg(unix)]
fn open_private(path: &Path) -> Result<std::fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<std::fs::File> {
    Ok(std::fs::File::create(path)?)
}
