use serde_json::Value;
use thiserror::Error;

/// A non-success response from the help desk API
///
/// Carries the requested URL, the HTTP status and the decoded response body
/// so callers can inspect server-side validation details.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub body: Value,
    pub message: String,
}

impl ApiError {
    pub fn new(
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        body: Value,
    ) -> Self {
        let status_text = status_text.into();
        let message = error_message(status, &status_text, &body);
        Self {
            url: url.into(),
            status,
            status_text,
            body,
            message,
        }
    }

    /// A `detail` or `message` field from the response body, if present
    pub fn detail(&self) -> Option<&str> {
        self.body
            .get("detail")
            .or_else(|| self.body.get("message"))
            .or_else(|| self.body.get("error"))
            .and_then(Value::as_str)
    }
}

fn error_message(status: u16, status_text: &str, body: &Value) -> String {
    let known = match status {
        400 => Some("Bad Request"),
        401 => Some("Unauthorized"),
        403 => Some("Forbidden"),
        404 => Some("Not Found"),
        500 => Some("Internal Server Error"),
        502 => Some("Bad Gateway"),
        503 => Some("Service Unavailable"),
        _ => None,
    };

    if let Some(message) = known {
        return message.to_string();
    }

    let status_text = if status_text.is_empty() {
        "unknown"
    } else {
        status_text
    };
    let body = match body {
        Value::Null => "undefined".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    format!("Generic Error: status: {status}; status text: {status_text}; body: {body}")
}
