//! Command handlers
//!
//! Each submodule implements one command group. Handlers receive a
//! [`HandlerContext`] with the loaded configuration, the session store and
//! an API client authenticated from that store.

pub mod auth;
pub mod common;
pub mod config;
pub mod export;
pub mod settings;
pub mod tickets;
pub mod users;

pub use common::HandlerContext;
