use crate::api::Setting;
use crate::error::{HelpdeskError, Result};

/// Setting holding the facility choices under `data.facility`
pub const FACILITY_OPTIONS_KEY: &str = "facility_options";
/// Setting holding the category choices under `data.category`
pub const CATEGORY_OPTIONS_KEY: &str = "category_options";

pub const DEFAULT_FACILITIES: [&str; 3] = ["GOLDEN BREEZE", "SPRINGWELL", "DANA POINT"];
pub const DEFAULT_CATEGORIES: [&str; 3] = ["STAFF", "FACILITY", "RESIDENT"];

/// Choices offered by the ticket form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    pub facilities: Vec<String>,
    pub categories: Vec<String>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            facilities: DEFAULT_FACILITIES.iter().map(ToString::to_string).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl FormOptions {
    /// Build the option lists from the two settings, using the defaults for
    /// any list that is unavailable or empty
    pub fn from_settings(facility: Option<&Setting>, category: Option<&Setting>) -> Self {
        let defaults = Self::default();
        Self {
            facilities: list_or(facility, "facility", defaults.facilities),
            categories: list_or(category, "category", defaults.categories),
        }
    }

    pub fn facility(&self, input: &str) -> Result<String> {
        pick("facility", &self.facilities, input)
    }

    pub fn category(&self, input: &str) -> Result<String> {
        pick("category", &self.categories, input)
    }
}

fn list_or(setting: Option<&Setting>, field: &str, fallback: Vec<String>) -> Vec<String> {
    setting
        .and_then(|s| s.string_list(field))
        .filter(|list| !list.is_empty())
        .unwrap_or(fallback)
}

/// Match `input` case-insensitively against `choices`, returning the
/// canonical spelling
fn pick(kind: &str, choices: &[String], input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(HelpdeskError::InvalidInput(format!("A {kind} is required")));
    }

    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(input))
        .cloned()
        .ok_or_else(|| {
            HelpdeskError::InvalidInput(format!(
                "Invalid {kind}: {input}. Must be one of: {}",
                choices.join(", ")
            ))
        })
}
