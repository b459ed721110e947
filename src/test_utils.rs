//! Test utilities for helpdesk-client
//!
//! Common fixtures shared by the unit tests.

#![cfg(test)]

use crate::api::{Reply, Ticket};
use crate::storage::{FileSessionStore, Session, SessionRepository};
use tempfile::TempDir;

/// Test fixture holding a session file in a temporary directory
pub struct TestSession {
    pub temp_dir: TempDir,
    pub store: FileSessionStore,
}

impl TestSession {
    /// Create an empty session store
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileSessionStore::new(temp_dir.path().join("session.yaml"));
        Self { temp_dir, store }
    }

    /// Create a store holding a logged-in session with the given role
    pub fn logged_in(role: &str) -> Self {
        let fixture = Self::new();
        fixture
            .store
            .save(&create_test_session(role))
            .expect("Failed to save session");
        fixture
    }
}

/// A logged-in session for user `u1`
pub fn create_test_session(role: &str) -> Session {
    Session {
        token: Some("test-token".to_string()),
        refresh_token: Some("test-refresh".to_string()),
        user_id: Some("u1".to_string()),
        username: Some("maria".to_string()),
        name: Some("Maria Lopez".to_string()),
        role: Some(role.to_string()),
    }
}

/// An open ticket with only the required fields set
pub fn create_test_ticket(id: &str, title: &str, created_at: &str) -> Ticket {
    Ticket {
        ticket_id: id.to_string(),
        title: title.to_string(),
        status: "open".to_string(),
        created_at: created_at.to_string(),
        description: None,
        category: None,
        facility: None,
        priority: None,
        ticket_number: None,
        created_by: None,
        created_by_name: None,
        updated_at: None,
        solution_reply_id: None,
        ai_feedback: None,
        ai_request_in_progress: None,
        replies: None,
    }
}

pub fn create_test_reply(id: &str, message: &str, author: Option<&str>) -> Reply {
    Reply {
        reply_id: id.to_string(),
        message: message.to_string(),
        author: author.map(str::to_string),
        author_name: None,
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() {
        let fixture = TestSession::logged_in("admin");
        let session = fixture.store.load().unwrap();
        assert!(session.is_admin());
        assert!(fixture.store.path().starts_with(fixture.temp_dir.path()));

        let mut ticket = create_test_ticket("t1", "Leak", "");
        ticket.replies = Some(vec![create_test_reply("r1", "On it", Some("u2"))]);
        assert_eq!(ticket.replies().len(), 1);
    }
}
