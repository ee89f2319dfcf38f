//! apiprobe Common Library
//!
//! API descriptors, the built-in service catalog, request building, and the
//! on-disk config and token stores shared by the apiprobe CLI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod request;
pub mod session;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, Service, LOGIN_ENDPOINT};
pub use config::{Config, Profile};
pub use error::{Error, Result};
pub use request::{PreparedRequest, RequestBuilder};
pub use session::{SessionStore, StoredToken};
pub use types::*;

/// apiprobe version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default store path, `$APIPROBE_HOME` or `~/.apiprobe`
pub fn default_store_path() -> std::path::PathBuf {
    if let Some(home) = std::env::var_os("APIPROBE_HOME") {
        return std::path::PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".apiprobe")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
