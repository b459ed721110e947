//! Typed wrappers, one method per REST endpoint

mod auth;
mod tickets;

pub use auth::AuthService;
pub use tickets::TicketsService;
