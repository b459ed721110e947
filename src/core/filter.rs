use super::time::parse_timestamp;
use crate::api::Ticket;
use crate::error::{HelpdeskError, Result};
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;
use std::str::FromStr;

/// Order of the dashboard list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "newest" | "new" | "desc" => Ok(Self::Newest),
            "oldest" | "old" | "asc" => Ok(Self::Oldest),
            other => Err(HelpdeskError::InvalidInput(format!(
                "Invalid sort order: {other}. Must be one of: newest, oldest"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
enum SearchPattern {
    Text(String),
    Regex(Regex),
}

impl SearchPattern {
    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::Text(needle) => haystack.to_lowercase().contains(needle),
            Self::Regex(regex) => regex.is_match(haystack),
        }
    }
}

/// Client-side filtering of a ticket tab
///
/// The status tab is applied by the server; search, category, facility,
/// ordering and limit are applied here.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    search: Option<SearchPattern>,
    category: Option<String>,
    facility: Option<String>,
    sort: SortOrder,
    limit: Option<usize>,
}

impl TicketFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Match title, description or ticket number against `query`
    ///
    /// Plain queries are case-insensitive substrings; with `regex` the query
    /// is compiled as a case-insensitive regular expression.
    pub fn search(mut self, query: Option<&str>, regex: bool) -> Result<Self> {
        self.search = match query.map(str::trim).filter(|q| !q.is_empty()) {
            None => None,
            Some(q) if regex => Some(SearchPattern::Regex(
                RegexBuilder::new(q).case_insensitive(true).build()?,
            )),
            Some(q) => Some(SearchPattern::Text(q.to_lowercase())),
        };
        Ok(self)
    }

    #[must_use]
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn facility(mut self, facility: Option<String>) -> Self {
        self.facility = facility.filter(|f| !f.trim().is_empty());
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Apply all filters to a list of tickets
    pub fn apply(&self, tickets: Vec<Ticket>) -> Vec<Ticket> {
        let mut filtered: Vec<Ticket> = tickets
            .into_iter()
            .filter(|ticket| self.matches(ticket))
            .collect();

        // Unparseable timestamps sort as oldest
        // Equal timestamps keep server order
        match self.sort {
            SortOrder::Newest => {
                filtered.sort_by_cached_key(|ticket| Reverse(parse_timestamp(&ticket.created_at)));
            },
            SortOrder::Oldest => {
                filtered.sort_by_cached_key(|ticket| parse_timestamp(&ticket.created_at));
            },
        }

        if let Some(limit) = self.limit {
            filtered.truncate(limit);
        }

        filtered
    }

    /// Check if a ticket matches all filter criteria
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(search) = &self.search {
            let found = search.is_match(&ticket.title)
                || ticket
                    .description
                    .as_deref()
                    .is_some_and(|d| search.is_match(d))
                || ticket
                    .ticket_number
                    .as_deref()
                    .is_some_and(|n| search.is_match(n));
            if !found {
                return false;
            }
        }

        if !field_matches(self.category.as_deref(), ticket.category.as_deref()) {
            return false;
        }

        field_matches(self.facility.as_deref(), ticket.facility.as_deref())
    }
}

fn field_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual.is_some_and(|a| a.trim().eq_ignore_ascii_case(wanted.trim())),
    }
}
