//! Error types for helpdesk-client
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! [`HelpdeskError`] distinguishes API failures (non-2xx responses) from
//! transport failures, local I/O and user input problems so the CLI can
//! print a useful message and suggestions for each.

use crate::api::ApiError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HelpdeskError>;

/// Main error type for helpdesk-client
#[derive(Error, Debug)]
pub enum HelpdeskError {
    /// The API answered with a non-success status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request was cancelled before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// No session token is stored
    #[error("Not logged in")]
    NotAuthenticated,

    /// The stored role does not allow the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    #[error("Setting not found: {key}")]
    SettingNotFound { key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid search pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Prompt failed: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error("{0}")]
    Custom(String),
}

impl HelpdeskError {
    /// Create a custom error from any displayable message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the error means the stored credentials are missing or rejected
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::NotAuthenticated) || self.status() == Some(401)
    }

    /// Whether retrying the same command later could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Cancelled => true,
            Self::Api(err) => err.status >= 500,
            _ => false,
        }
    }

    /// Whether the error comes from local configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::ConfigLoad(_) | Self::InvalidUrl(_)
        )
    }

    /// Message shown to the user on the terminal
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => match err.status {
                401 => "Your session is not valid. Please log in again.".to_string(),
                403 => "You are not allowed to do that.".to_string(),
                _ => err.to_string(),
            },
            Self::NotAuthenticated => "You are not logged in.".to_string(),
            Self::Network(err) if err.is_timeout() => {
                "The help desk server did not answer in time.".to_string()
            },
            Self::Network(err) if err.is_connect() => {
                "Could not connect to the help desk server.".to_string()
            },
            _ => self.to_string(),
        }
    }

    /// Hints on how to fix the problem
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotAuthenticated => vec!["Run 'helpdesk login' to sign in".to_string()],
            Self::Api(err) if err.status == 401 => vec![
                "Run 'helpdesk refresh' to renew your session".to_string(),
                "Or run 'helpdesk login' to sign in again".to_string(),
            ],
            Self::PermissionDenied(_) => {
                vec!["Ask an administrator to run this command".to_string()]
            },
            Self::Network(_) => vec![
                "Check your network connection".to_string(),
                "Check the API URL with 'helpdesk config show'".to_string(),
            ],
            Self::TicketNotFound { .. } => {
                vec!["Run 'helpdesk tickets list' to see available tickets".to_string()]
            },
            Self::SettingNotFound { .. } => {
                vec!["Run 'helpdesk settings list' to see available settings".to_string()]
            },
            Self::InvalidUrl(_) | Self::Config(_) | Self::ConfigLoad(_) => vec![
                "Set HELPDESK_API_URL or pass --api-url".to_string(),
                "Run 'helpdesk config path' to locate the configuration file".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}
