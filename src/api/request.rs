//! Request description, URL construction and response decoding

use super::config::ApiConfig;
use crate::error::{HelpdeskError, Result};
use reqwest::{Method, Url};
use serde_json::Value;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Everything needed to issue one API call
#[derive(Debug, Clone)]
pub struct ApiRequestOptions {
    pub method: Method,
    /// Path template relative to the base URL, e.g. `/tickets/{ticketId}`
    pub url: &'static str,
    pub path: Vec<(&'static str, String)>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
    pub media_type: Option<&'static str>,
}

impl ApiRequestOptions {
    #[must_use]
    pub const fn new(method: Method, url: &'static str) -> Self {
        Self {
            method,
            url,
            path: Vec::new(),
            query: Vec::new(),
            body: None,
            media_type: None,
        }
    }

    #[must_use]
    pub fn get(url: &'static str) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: &'static str) -> Self {
        Self::new(Method::POST, url)
    }

    #[must_use]
    pub fn patch(url: &'static str) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// Bind a `{name}` placeholder in the path template
    #[must_use]
    pub fn path_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path.push((name, value.into()));
        self
    }

    /// Add a query parameter; `None` values are left out
    #[must_use]
    pub fn query_param(mut self, name: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.query.push((name, value.to_string()));
        }
        self
    }

    /// Add one query entry per value, repeating the key
    #[must_use]
    pub fn query_list<I, V>(mut self, name: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.query
            .extend(values.into_iter().map(|v| (name, v.to_string())));
        self
    }

    /// Attach a JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self.media_type = Some(JSON_MEDIA_TYPE);
        self
    }
}

/// Resolve the full request URL: base, substituted path, then query string
pub fn build_url(config: &ApiConfig, options: &ApiRequestOptions) -> Result<Url> {
    let mut path = options.url.to_string();
    for (name, value) in &options.path {
        let encoded = match config.encode_path {
            Some(encoder) => encoder(value),
            None => urlencoding::encode(value).into_owned(),
        };
        path = path.replace(&format!("{{{name}}}"), &encoded);
    }

    if let Some(start) = path.find('{') {
        let rest = &path[start..];
        let end = rest.find('}').map_or(rest.len(), |i| i + 1);
        return Err(HelpdeskError::InvalidInput(format!(
            "Missing path parameter {} for {}",
            &rest[..end],
            options.url
        )));
    }

    let raw = format!("{}{}", config.base.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|e| HelpdeskError::InvalidUrl(format!("{raw}: {e}")))?;

    if !options.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &options.query {
            pairs.append_pair(name, value);
        }
    }

    Ok(url)
}

/// Decode a successful response body into JSON
///
/// No-content responses decode as `null`; non-JSON bodies are returned as
/// a JSON string holding the text.
pub fn decode_body(status: u16, content_type: Option<&str>, bytes: &[u8]) -> Result<Value> {
    if status == 204 || bytes.is_empty() {
        return Ok(Value::Null);
    }
    if is_json(content_type) {
        return Ok(serde_json::from_slice(bytes)?);
    }
    Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Decode an error response body, never failing
pub fn decode_error_body(content_type: Option<&str>, bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    if is_json(content_type) {
        if let Ok(value) = serde_json::from_slice(bytes) {
            return value;
        }
    }
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.starts_with(JSON_MEDIA_TYPE) || ct.contains("+json")
    })
}
