use super::cancel::CancelableRequest;
use super::config::ApiConfig;
use super::error::ApiError;
use super::request::{build_url, decode_body, decode_error_body, ApiRequestOptions, JSON_MEDIA_TYPE};
use super::services::{AuthService, TicketsService};
use crate::error::Result;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client for the help desk API
///
/// Cheap to clone: the underlying connection pool and configuration are
/// shared between clones.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Authentication, user and settings endpoints
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    /// Ticket endpoints
    pub const fn tickets(&self) -> TicketsService<'_> {
        TicketsService::new(self)
    }

    /// Start a request and hand back a cancelable future for its result
    pub fn send<T>(&self, options: ApiRequestOptions) -> CancelableRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        CancelableRequest::new(async move { client.execute(options).await })
    }

    /// Like [`send`](Self::send) with `body` encoded as JSON
    pub fn send_json<B, T>(&self, options: ApiRequestOptions, body: &B) -> CancelableRequest<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        match serde_json::to_value(body) {
            Ok(value) => self.send(options.json(value)),
            Err(e) => CancelableRequest::failed(e.into()),
        }
    }

    /// Issue the request and decode the response
    pub async fn execute<T: DeserializeOwned>(&self, options: ApiRequestOptions) -> Result<T> {
        let url = build_url(&self.config, &options)?;
        debug!(method = %options.method, %url, "sending request");

        let mut request = self
            .http
            .request(options.method.clone(), url.clone())
            .header(ACCEPT, JSON_MEDIA_TYPE);

        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(token) = self.config.resolve_token() {
            request = request.bearer_auth(token.expose_secret());
        } else if let Some((username, password)) = self.config.basic_credentials() {
            request = request.basic_auth(username, Some(password.expose_secret()));
        }

        if let Some(body) = &options.body {
            request = request
                .header(CONTENT_TYPE, options.media_type.unwrap_or(JSON_MEDIA_TYPE))
                .body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = decode_error_body(content_type.as_deref(), &bytes);
            warn!(%url, status = status.as_u16(), "request failed");
            return Err(ApiError::new(
                url.as_str(),
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                body,
            )
            .into());
        }

        debug!(%url, status = status.as_u16(), bytes = bytes.len(), "request succeeded");
        let value = decode_body(status.as_u16(), content_type.as_deref(), &bytes)?;
        Ok(serde_json::from_value(value)?)
    }
}
