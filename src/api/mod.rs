//! Typed client for the help desk REST API
//!
//! [`ApiClient`] turns an [`ApiRequestOptions`] into an HTTP call: the path
//! template is filled in, query parameters appended, the bearer token from
//! the configured [`TokenResolver`] attached and the JSON response decoded.
//! Non-success statuses surface as [`ApiError`].
//!
//! ```rust,ignore
//! use helpdesk_client::api::{ApiClient, ApiConfig, TicketStatusFilter};
//!
//! let client = ApiClient::new(ApiConfig::new("https://helpdesk.example.org/v1").with_token(token))?;
//! let open = client.tickets().list(Some(TicketStatusFilter::Open)).await?;
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod request;
pub mod services;

pub use cancel::{CancelHandle, CancelableRequest};
pub use client::ApiClient;
pub use config::{ApiConfig, StaticToken, TokenResolver, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use models::*;
pub use request::ApiRequestOptions;
pub use services::{AuthService, TicketsService};
