//! Configuration for helpdesk-client
//!
//! Settings are layered: built-in defaults, then an optional YAML file in
//! the platform configuration directory, then `HELPDESK_*` environment
//! variables (nested keys separated by `__`, e.g. `HELPDESK_API__BASE_URL`).

use crate::api::{ApiConfig, TokenResolver, DEFAULT_BASE_URL};
use crate::error::{HelpdeskError, Result};
use config::{Environment, File, FileFormat};
use directories::ProjectDirs;
use reqwest::Url;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const CONFIG_FILE: &str = "config.yaml";
const ENV_PREFIX: &str = "HELPDESK";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
}

/// Connection settings for the help desk API
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Request timeout in seconds; 0 disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_version() -> String {
    crate::api::config::API_VERSION.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
            username: None,
            password: None,
            headers: BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("timeout_secs", &self.timeout_secs)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers)
            .finish()
    }
}

impl Config {
    /// `<config dir>/helpdesk/config.yaml`, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "helpdesk").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load configuration from `path` (or the default location) and the
    /// environment; a missing file is not an error
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        let file = path.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "reading configuration");
            builder = builder.add_source(
                File::from(file)
                    .format(FileFormat::Yaml)
                    .required(path.is_some()),
            );
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when it cannot be read
    pub fn load_or_default() -> Self {
        Self::load(None).unwrap_or_else(|e| {
            tracing::warn!("Using default configuration: {e}");
            Self::default()
        })
    }

    /// Replace the base URL, e.g. from a command-line flag
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        self
    }

    /// Check that the base URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| HelpdeskError::InvalidUrl(format!("{}: {e}", self.api.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HelpdeskError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.api.base_url
            )));
        }
        Ok(())
    }

    /// Build the client configuration, authenticating with `token`
    pub fn api_config(&self, token: Option<Arc<dyn TokenResolver>>) -> Result<ApiConfig> {
        self.validate()?;

        let mut config = ApiConfig::new(&self.api.base_url);
        config.version.clone_from(&self.api.version);
        config.headers.clone_from(&self.api.headers);
        if self.api.timeout_secs > 0 {
            config = config.with_timeout(Duration::from_secs(self.api.timeout_secs));
        }
        if let (Some(username), Some(password)) = (&self.api.username, &self.api.password) {
            config = config.with_basic_auth(username, SecretString::from(password.clone()));
        }
        if let Some(resolver) = token {
            config = config.with_token_resolver(resolver);
        }
        Ok(config)
    }
}
