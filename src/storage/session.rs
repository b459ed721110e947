//! File-backed session cache
//!
//! Holds the bearer token, refresh token and identity of the logged-in user
//! in a YAML file in the platform data directory. On Unix the file is
//! created readable by its owner only.

use super::repository::SessionRepository;
use crate::error::{HelpdeskError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const SESSION_FILE: &str = "session.yaml";

/// Credentials and identity of the logged-in user
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.has_token())
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    /// Avatar letter: first character of the username, or `-`
    pub fn initial(&self) -> char {
        self.username
            .as_deref()
            .and_then(|u| u.chars().next())
            .map_or('-', |c| c.to_uppercase().next().unwrap_or(c))
    }

    /// Name used in greetings
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.username.as_deref())
            .unwrap_or("Guest")
    }
}

/// Session repository stored as a YAML file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// `<data dir>/helpdesk/session.yaml`
    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "helpdesk")
            .map(|dirs| dirs.data_dir().join(SESSION_FILE))
            .ok_or_else(|| HelpdeskError::Config("Cannot determine the data directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_private(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl SessionRepository for FileSessionStore {
    fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Session::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    fn save(&self, session: &Session) -> Result<()> {
        debug!(path = %self.path.display(), "saving session");
        let content = serde_yaml::to_string(session)?;
        self.write_private(&content)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
