//! helpdesk-client - typed client and terminal front end for a facility help desk
//!
//! This crate wraps the help desk REST API and the view logic of its web
//! front end:
//! - An async API client with pluggable bearer-token resolution and
//!   cancellable requests
//! - Typed models for tickets, replies, users, settings and auth payloads
//! - A session cache persisted between invocations
//! - Dashboard filtering, display rules and form validation
//! - The `helpdesk` command-line interface

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::cast_precision_loss)]

//! # Example
//!
//! ```rust,ignore
//! use helpdesk_client::api::{ApiClient, ApiConfig, TicketStatusFilter};
//! use helpdesk_client::core::TicketFilter;
//!
//! let client = ApiClient::new(ApiConfig::new("https://helpdesk.example.org/v1").with_token(token))?;
//! let open = client.tickets().list(Some(TicketStatusFilter::Open)).await?;
//! let mine = TicketFilter::new().search(Some("heater"), false)?.apply(open.tickets);
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod interactive;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{HelpdeskError, Result};
