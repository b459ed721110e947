use super::id_format;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-stored configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(alias = "key")]
    pub key_id: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "id_format::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_name: Option<String>,
}

impl Setting {
    /// String entries of the array stored under `field`
    ///
    /// Returns `None` when the field is missing or not an array.
    pub fn string_list(&self, field: &str) -> Option<Vec<String>> {
        self.data.get(field)?.as_array().map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingList {
    #[serde(default)]
    pub settings: Vec<Setting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingRequest {
    pub key_id: String,
    pub data: Value,
}
