//! REST client for the services under test

use anyhow::{Context, Result};
use apiprobe_common::{Error, HttpMethod, PreparedRequest, LOGIN_ENDPOINT};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Message shown when a failed login carries no `message` field
pub const LOGIN_FALLBACK_MESSAGE: &str = "Failed to fetch token";

/// Client for one service deployment
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Response body as received
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

/// Outcome of a call that reached the server
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub ok: bool,
    pub body: ResponseBody,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl ApiResponse {
    /// Body as display text: indented JSON, or the raw text
    pub fn render(&self) -> String {
        match &self.body {
            ResponseBody::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ResponseBody::Text(text) => text.clone(),
            ResponseBody::Empty => String::new(),
        }
    }
}

impl ApiClient {
    /// Create a new client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("apiprobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, LOGIN_ENDPOINT);
        info!(%url, email, "Requesting token");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "Login transport failure");
                Error::Login(LOGIN_FALLBACK_MESSAGE.to_string())
            })?;

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.get("message"))
                .and_then(Value::as_str)
                .unwrap_or(LOGIN_FALLBACK_MESSAGE);
            debug!(%status, message, "Login rejected");
            return Err(Error::Login(message.to_string()).into());
        }

        body.as_ref()
            .and_then(|b| b.get("token"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or_else(|| Error::Login(LOGIN_FALLBACK_MESSAGE.to_string()).into())
    }

    /// Send a prepared request.
    ///
    /// Non-2xx statuses come back as responses with `ok == false`; only
    /// transport failures are errors.
    pub async fn execute(&self, request: &PreparedRequest) -> Result<ApiResponse> {
        let method: reqwest::Method = to_reqwest(request.method);
        info!(%method, url = %request.url, "Executing request");

        let mut builder = self
            .http
            .request(method, &request.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(ref token) = request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(ref body) = request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let elapsed = started.elapsed();

        debug!(%status, bytes = bytes.len(), elapsed_ms = elapsed.as_millis() as u64, "Response received");

        Ok(ApiResponse {
            status: status.as_u16(),
            ok: status.is_success(),
            body: parse_body(&bytes),
            elapsed,
        })
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn parse_body(bytes: &[u8]) -> ResponseBody {
    if bytes.is_empty() {
        return ResponseBody::Empty;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => ResponseBody::Json(value),
        Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}
