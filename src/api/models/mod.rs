//! Request and response shapes of the help desk API

mod auth;
mod setting;
mod ticket;
mod user;

pub use auth::{
    AuthRequest, AuthRequestByCode, AuthResponse, FcmRequest, GenerateCodeRequest,
    GenerateCodeResponse, RefreshRequest,
};
pub use setting::{Setting, SettingList, UpdateSettingRequest};
pub use ticket::{
    CreateTicketRequest, Reply, ReplyRequest, SolutionRequest, Ticket, TicketList,
    TicketStatusFilter, UpdateTicketRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, UserList, UserProfile};

/// Identifier fields arrive as strings from some endpoints and as numbers
/// from others; both are read into `String`.
pub(crate) mod id_format {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_id<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(E::custom(format!("expected string or number id, got {other}"))),
        }
    }

    pub fn required<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        to_id(Value::deserialize(deserializer)?)?
            .ok_or_else(|| serde::de::Error::custom("id must not be null"))
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        to_id(Value::deserialize(deserializer)?)
    }
}
