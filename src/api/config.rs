//! Connection settings shared by every API call

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default API base URL when none is configured
pub const DEFAULT_BASE_URL: &str = "https://api.example.com/v1";

/// API version the models were written against
pub const API_VERSION: &str = "1.0.0";

/// Supplies the bearer token for each request
///
/// The resolver is consulted on every call, so a token stored after login
/// is picked up by the next request without rebuilding the client.
pub trait TokenResolver: Send + Sync {
    fn resolve(&self) -> Option<SecretString>;
}

/// A resolver that always returns the same token
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl TokenResolver for StaticToken {
    fn resolve(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

/// Rewrites a path parameter before it is placed in the URL
pub type PathEncoder = fn(&str) -> String;

/// Client configuration: base URL, credentials and extra headers
#[derive(Clone)]
pub struct ApiConfig {
    pub base: String,
    pub version: String,
    pub token: Option<Arc<dyn TokenResolver>>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub headers: BTreeMap<String, String>,
    pub encode_path: Option<PathEncoder>,
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base", &self.base)
            .field("version", &self.version)
            .field("token", &self.token.as_ref().map(|_| "<resolver>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Create a configuration pointing at `base`
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            version: API_VERSION.to_string(),
            token: None,
            username: None,
            password: None,
            headers: BTreeMap::new(),
            encode_path: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_token_resolver(mut self, resolver: Arc<dyn TokenResolver>) -> Self {
        self.token = Some(resolver);
        self
    }

    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_token_resolver(Arc::new(StaticToken::new(token)))
    }

    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = Some(username.into());
        self.password = Some(password);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn with_path_encoder(mut self, encoder: PathEncoder) -> Self {
        self.encode_path = Some(encoder);
        self
    }

    /// The bearer token for the next request; empty tokens count as absent
    pub fn resolve_token(&self) -> Option<SecretString> {
        self.token
            .as_ref()
            .and_then(|resolver| resolver.resolve())
            .filter(|token| !token.expose_secret().is_empty())
    }

    /// Basic credentials, when both halves are configured
    pub fn basic_credentials(&self) -> Option<(&str, &SecretString)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password)),
            _ => None,
        }
    }
}
