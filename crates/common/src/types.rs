//! Core types for apiprobe

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// HTTP method of an API descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Whether a request body is sent. Every method except GET carries one.
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Static record used to pre-fill a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDescriptor {
    pub name: String,
    pub method: HttpMethod,
    pub endpoint: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ApiDescriptor {
    pub fn new(name: &str, method: HttpMethod, endpoint: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            method,
            endpoint: endpoint.to_string(),
            description: description.to_string(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Example payload as editable text, `{}` when the descriptor has none
    pub fn default_payload_text(&self) -> String {
        let payload = self
            .payload
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()));
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
    }

    /// Names of `:name` placeholders in the path, query string excluded
    pub fn path_params(&self) -> Vec<String> {
        path_params(&self.endpoint)
    }
}

/// Extract `:name` placeholder segments from an endpoint path
pub fn path_params(endpoint: &str) -> Vec<String> {
    let path = endpoint.split('?').next().unwrap_or_default();
    path.split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
