//! Turning a descriptor plus user edits into a concrete HTTP request

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{path_params, ApiDescriptor, HttpMethod};

/// A fully resolved request, ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
    #[serde(skip)]
    pub bearer: Option<String>,
}

/// User edits applied on top of a descriptor
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    endpoint: Option<String>,
    payload: Option<String>,
    params: Vec<(String, String)>,
    bearer: Option<String>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the descriptor endpoint. Empty text keeps the original.
    pub fn endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Replace the example payload with raw JSON text. Empty text keeps the original.
    pub fn payload(mut self, payload: Option<String>) -> Self {
        self.payload = payload;
        self
    }

    /// Substitute `:name` path placeholders
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    /// Parse `name=value` pairs as given on the command line
    pub fn params<I, S>(mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pair in pairs {
            let (name, value) = parse_param(pair.as_ref())?;
            self.params.push((name, value));
        }
        Ok(self)
    }

    /// Attach a bearer token. Empty tokens are ignored.
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|t| !t.is_empty());
        self
    }

    pub fn build(self, base_url: &str, api: &ApiDescriptor) -> Result<PreparedRequest> {
        let endpoint = self
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| api.endpoint.clone());
        let endpoint = substitute_params(&endpoint, &self.params);

        let unresolved = path_params(&endpoint);
        if !unresolved.is_empty() {
            warn!(
                placeholders = %unresolved.join(", "),
                "Endpoint still contains path placeholders, use --param name=value"
            );
        }

        let body = if api.method.has_body() {
            let text = self
                .payload
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| api.default_payload_text());
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| Error::InvalidPayload(e.to_string()))?;
            Some(value)
        } else {
            None
        };

        Ok(PreparedRequest {
            method: api.method,
            url: join_url(base_url, &endpoint)?,
            body,
            bearer: self.bearer,
        })
    }
}

fn parse_param(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().trim_start_matches(':').to_string(), value.to_string()))
        }
        _ => Err(Error::InvalidParam(pair.to_string())),
    }
}

fn substitute_params(endpoint: &str, params: &[(String, String)]) -> String {
    let (path, query) = match endpoint.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (endpoint, None),
    };

    let path = path
        .split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|name| params.iter().find(|(n, _)| n == name))
                .map(|(_, value)| value.as_str())
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join("/");

    match query {
        Some(q) => format!("{}?{}", path, q),
        None => path,
    }
}

/// Join a base URL and an endpoint with exactly one slash between them
pub fn join_url(base_url: &str, endpoint: &str) -> Result<String> {
    let base = base_url.trim().trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(Error::InvalidUrl(base_url.to_string()));
    }

    let endpoint = endpoint.trim();
    if endpoint.starts_with('/') {
        Ok(format!("{}{}", base, endpoint))
    } else {
        Ok(format!("{}/{}", base, endpoint))
    }
}
