use super::options::FormOptions;
use crate::api::{CreateTicketRequest, CreateUserRequest, UpdateUserRequest};
use crate::error::{HelpdeskError, Result};

pub const ROLES: [&str; 2] = ["admin", "user"];

/// Field validation shared by the forms
pub mod validation {
    use super::ROLES;
    use crate::error::{HelpdeskError, Result};
    use serde_json::Value;

    /// Validate and normalize a ticket title
    pub fn validate_title(title: &str) -> Result<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(HelpdeskError::InvalidInput(
                "Ticket title cannot be empty".to_string(),
            ));
        }
        Ok(title.to_string())
    }

    /// Require a non-blank value for `field`
    pub fn required(field: &str, value: Option<&str>) -> Result<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| HelpdeskError::InvalidInput(format!("{field} is required")))
    }

    /// Validate and parse a role
    pub fn parse_role(role: &str) -> Result<String> {
        let role = role.trim().to_lowercase();
        if ROLES.contains(&role.as_str()) {
            Ok(role)
        } else {
            Err(HelpdeskError::InvalidInput(format!(
                "Invalid role: {role}. Must be one of: {}",
                ROLES.join(", ")
            )))
        }
    }

    /// Validate a reply message
    pub fn validate_message(message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(HelpdeskError::InvalidInput(
                "Reply message cannot be empty".to_string(),
            ));
        }
        Ok(message.to_string())
    }

    /// Parse the edited data of a setting
    pub fn parse_setting_data(text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|_| HelpdeskError::custom("Invalid JSON data."))
    }
}

/// Builder for the ticket creation form
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    title: Option<String>,
    description: Option<String>,
    facility: Option<String>,
    category: Option<String>,
}

impl TicketDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn facility(mut self, facility: Option<String>) -> Self {
        self.facility = facility;
        self
    }

    #[must_use]
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub const fn has_description(&self) -> bool {
        self.description.is_some()
    }

    pub fn has_facility(&self) -> bool {
        self.facility.as_deref().is_some_and(|f| !f.trim().is_empty())
    }

    pub fn has_category(&self) -> bool {
        self.category.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Validate the form against `options` and build the request body
    pub fn build(self, options: &FormOptions) -> Result<CreateTicketRequest> {
        let title = validation::validate_title(self.title.as_deref().unwrap_or_default())?;
        let facility = options.facility(self.facility.as_deref().unwrap_or_default())?;
        let category = options.category(self.category.as_deref().unwrap_or_default())?;

        Ok(CreateTicketRequest {
            title,
            description: self.description.unwrap_or_default().trim().to_string(),
            category: Some(category),
            facility: Some(facility),
        })
    }
}

/// Builder for the user form, in create or update mode
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    username: Option<String>,
    name: Option<String>,
    role: Option<String>,
    password: Option<String>,
}

impl UserDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    #[must_use]
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn role(mut self, role: Option<String>) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Build a create request; every field is required
    pub fn build_create(self) -> Result<CreateUserRequest> {
        let username = validation::required("Username", self.username.as_deref())?;
        let name = validation::required("Name", self.name.as_deref())?;
        let role = validation::parse_role(self.role.as_deref().unwrap_or("user"))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| HelpdeskError::InvalidInput("Password is required".to_string()))?;

        Ok(CreateUserRequest {
            username,
            name,
            password,
            role,
        })
    }

    /// Build an update request for an existing account
    ///
    /// The username only identifies the account; an empty password leaves
    /// the current one unchanged.
    pub fn build_update(self) -> Result<UpdateUserRequest> {
        let username = validation::required("Username", self.username.as_deref())?;
        let name = match self.name.as_deref() {
            Some(name) => Some(validation::required("Name", Some(name))?),
            None => None,
        };
        let role = self.role.as_deref().map(validation::parse_role).transpose()?;
        let password = self.password.filter(|p| !p.is_empty());

        if name.is_none() && role.is_none() && password.is_none() {
            return Err(HelpdeskError::InvalidInput(
                "Nothing to update: give a name, role or password".to_string(),
            ));
        }

        Ok(UpdateUserRequest {
            username,
            name,
            role,
            password,
        })
    }
}
