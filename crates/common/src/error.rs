//! Error types for apiprobe

use thiserror::Error;

/// Result type alias using apiprobe Error
pub type Result<T> = std::result::Result<T, Error>;

/// apiprobe error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Catalog file error: {0}")]
    CatalogFile(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown API '{selector}' in service {service}")]
    UnknownApi { service: String, selector: String },

    #[error("Ambiguous API '{selector}' matches: {candidates}")]
    AmbiguousApi { selector: String, candidates: String },

    #[error("Unsupported HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("Invalid path parameter '{0}', expected name=value")]
    InvalidParam(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Login(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
