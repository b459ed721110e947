use super::id_format;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// A help desk support case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(alias = "id", deserialize_with = "id_format::required")]
    pub ticket_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(
        default,
        deserialize_with = "id_format::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub ticket_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "id_format::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "id_format::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub solution_reply_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_request_in_progress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<Reply>>,
}

impl Ticket {
    pub fn replies(&self) -> &[Reply] {
        self.replies.as_deref().unwrap_or_default()
    }

    /// Whether `reply` is the one marked as the solution
    pub fn is_solution(&self, reply: &Reply) -> bool {
        self.solution_reply_id.as_deref() == Some(reply.reply_id.as_str())
    }
}

/// A message attached to a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(alias = "id", deserialize_with = "id_format::required")]
    pub reply_id: String,
    #[serde(alias = "text", default)]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "id_format::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The ticket collection returned by `GET /tickets`
///
/// The endpoint answers either with a bare array or with an object holding
/// a `tickets` array. Any other shape is read as an empty list. Elements are
/// decoded one by one so a single malformed ticket is skipped, not the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketList {
    pub tickets: Vec<Ticket>,
}

impl TicketList {
    fn from_elements(elements: Vec<Value>) -> Self {
        let tickets = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| match decode_ticket(element) {
                Ok(ticket) => Some(ticket),
                Err(e) => {
                    warn!("Skipping malformed ticket at index {index}: {e}");
                    None
                },
            })
            .collect();
        Self { tickets }
    }
}

/// Decode one list element, preferring `ticket_id` when `id` is also sent
fn decode_ticket(mut element: Value) -> serde_json::Result<Ticket> {
    if let Some(object) = element.as_object_mut() {
        if object.contains_key("ticket_id") {
            object.remove("id");
        }
    }
    serde_json::from_value(element)
}

impl<'de> Deserialize<'de> for TicketList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(elements) => Self::from_elements(elements),
            Value::Object(mut object) => match object.remove("tickets") {
                Some(Value::Array(elements)) => Self::from_elements(elements),
                _ => Self::default(),
            },
            _ => Self::default(),
        })
    }
}

/// Which tab of the dashboard to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatusFilter {
    #[default]
    Open,
    Closed,
}

impl TicketStatusFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "active" => Ok(Self::Open),
            "closed" | "resolved" => Ok(Self::Closed),
            other => Err(format!("Invalid status filter: {other}. Use open or closed")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTicketRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdateTicketRequest {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
