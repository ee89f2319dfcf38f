//! apiprobe configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, MOVIES_SERVICE};
use crate::error::{Error, Result};

/// Tool configuration, read from `config.toml` in the store directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Service used when `--service` is not given
    pub default_service: String,

    /// Per-service overrides
    pub services: BTreeMap<String, ServiceOverride>,

    /// Named login credentials
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "user".to_string(),
            Profile {
                email: "user2@example.com".to_string(),
                password: "User2@123".to_string(),
            },
        );
        profiles.insert(
            "admin".to_string(),
            Profile {
                email: "user@example.com".to_string(),
                password: "User@123".to_string(),
            },
        );

        Self {
            timeout_secs: 30,
            default_service: MOVIES_SERVICE.to_string(),
            services: BTreeMap::new(),
            profiles,
        }
    }
}

/// Override for a built-in or catalog-file service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOverride {
    pub base_url: Option<String>,
}

/// Email/password pair used to obtain a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))
    }

    /// Apply base URL overrides to a catalog
    pub fn apply(&self, catalog: &mut Catalog) -> Result<()> {
        for (id, service) in &self.services {
            if let Some(ref base_url) = service.base_url {
                catalog.set_base_url(id, base_url)?;
            }
        }
        Ok(())
    }
}

/// Config file inside a store directory
pub fn config_path(store: &Path) -> PathBuf {
    store.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(&config_path(tmp.path())).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.default_service, "movies");
        assert_eq!(config.profile("admin").unwrap().email, "user@example.com");
        assert_eq!(config.profile("user").unwrap().email, "user2@example.com");
    }

    #[test]
    fn test_save_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = config_path(tmp.path());
        std::fs::write(
            &path,
            r#"
timeout_secs = 5

[services.search]
base_url = "http://localhost:4000"

[profiles.qa]
email = "qa@example.com"
password = "pw"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.default_service, "movies");
        assert!(config.profile("qa").is_ok());
        assert!(matches!(config.profile("admin"), Err(Error::UnknownProfile(_))));

        let mut catalog = Catalog::builtin();
        config.apply(&mut catalog).unwrap();
        assert_eq!(catalog.service("search").unwrap().base_url, "http://localhost:4000");

        config.save(&path).unwrap();
        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.timeout_secs, 5);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = config_path(tmp.path());
        std::fs::write(&path, "timeout_secs = 0\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_override_for_unknown_service() {
        let mut config = Config::default();
        config.services.insert(
            "ghost".to_string(),
            ServiceOverride { base_url: Some("http://x".to_string()) },
        );
        let mut catalog = Catalog::builtin();
        assert!(config.apply(&mut catalog).is_err());
    }
}
