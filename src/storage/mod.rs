//! Local persistence of the user's session
//!
//! The API is the source of truth for tickets, users and settings; the only
//! state this crate keeps on disk is the session cache used to authenticate
//! requests and to greet the user.

pub mod repository;
pub mod session;

pub use repository::{InMemorySessionStore, SessionRepository, SessionTokens};
pub use session::{FileSessionStore, Session};
