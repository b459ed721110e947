//! Presentation rules for tickets
//!
//! These mirror what a help desk user sees on the dashboard: status badges,
//! author names with a `(You)` marker, and placeholder text for missing
//! fields.

use super::time::format_timestamp;
use crate::api::Ticket;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

const UNKNOWN: &str = "UNKNOWN";
const NO_DESCRIPTION: &str = "No description";
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Colour class of a ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    Active,
    Closed,
    Pending,
}

impl StatusBadge {
    /// Classify a raw status string; an empty status counts as active
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "" | "open" | "active" => Self::Active,
            "closed" => Self::Closed,
            _ => Self::Pending,
        }
    }

    /// Text shown in the badge
    pub fn label(status: &str) -> String {
        let status = status.trim();
        if status.is_empty() {
            "ACTIVE".to_string()
        } else {
            status.to_uppercase()
        }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// Resolves ticket authors to display names
///
/// Names are memoised per `(author id, reported name)` so a long list only
/// formats each distinct author once.
#[derive(Debug, Default)]
pub struct AuthorNames {
    current_user_id: Option<String>,
    cache: HashMap<(String, Option<String>), String>,
}

impl AuthorNames {
    pub fn new(current_user_id: Option<String>) -> Self {
        Self {
            current_user_id,
            cache: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, author_id: Option<&str>, author_name: Option<&str>) -> String {
        let Some(id) = author_id.filter(|id| !id.is_empty()) else {
            return UNKNOWN_AUTHOR.to_string();
        };

        let key = (id.to_string(), author_name.map(str::to_string));
        if let Some(name) = self.cache.get(&key) {
            return name.clone();
        }

        let base = author_name.filter(|n| !n.is_empty()).unwrap_or(id);
        let name = if self.current_user_id.as_deref() == Some(id) {
            format!("{base} (You)")
        } else {
            base.to_string()
        };
        self.cache.insert(key, name.clone());
        name
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Flattened ticket row used by list output and exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRow {
    pub id: String,
    pub number: String,
    pub title: String,
    pub status: String,
    pub badge: StatusBadge,
    pub facility: String,
    pub category: String,
    pub author: String,
    pub created: String,
    pub description: String,
}

impl TicketRow {
    /// Column names, in field order
    pub const HEADERS: [&'static str; 10] = [
        "id",
        "number",
        "title",
        "status",
        "badge",
        "facility",
        "category",
        "author",
        "created",
        "description",
    ];

    pub fn new(ticket: &Ticket, authors: &mut AuthorNames) -> Self {
        Self {
            id: ticket.ticket_id.clone(),
            number: or_unknown(ticket.ticket_number.as_deref()),
            title: ticket.title.clone(),
            status: StatusBadge::label(&ticket.status),
            badge: StatusBadge::from_status(&ticket.status),
            facility: upper_or_unknown(ticket.facility.as_deref()),
            category: upper_or_unknown(ticket.category.as_deref()),
            author: authors.resolve(
                ticket.created_by.as_deref(),
                ticket.created_by_name.as_deref(),
            ),
            created: format_timestamp(&ticket.created_at),
            description: ticket
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(NO_DESCRIPTION)
                .to_string(),
        }
    }
}

fn or_unknown(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn upper_or_unknown(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| UNKNOWN.to_string(), str::to_uppercase)
}
