//! CLI Commands

pub mod auth;
pub mod catalog;
pub mod exec;

use anyhow::{Context as _, Result};
use apiprobe_common::{Catalog, Config, Service, SessionStore};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::client::ApiClient;
use crate::output::OutputFormat;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub service: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub catalog_file: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Everything a command needs: catalog, config, token store and the selected service
pub struct Context {
    pub catalog: Catalog,
    pub config: Config,
    pub sessions: SessionStore,
    pub service_id: String,
    pub format: OutputFormat,
    pub timeout: Duration,
}

impl Context {
    pub fn load(opts: GlobalOptions) -> Result<Self> {
        let store = opts.store.unwrap_or_else(apiprobe_common::default_store_path);
        let config_path = apiprobe_common::config::config_path(&store);
        let config = Config::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        debug!(path = %config_path.display(), "Configuration loaded");

        let mut catalog = Catalog::builtin();
        if let Some(ref file) = opts.catalog_file {
            catalog
                .merge_file(file)
                .with_context(|| format!("Failed to load catalog {}", file.display()))?;
        }
        config.apply(&mut catalog)?;

        let service_id = opts
            .service
            .unwrap_or_else(|| config.default_service.clone());
        if let Some(ref base_url) = opts.base_url {
            catalog.set_base_url(&service_id, base_url)?;
        }

        let timeout = Duration::from_secs(opts.timeout_secs.unwrap_or(config.timeout_secs).max(1));

        Ok(Self {
            catalog,
            config,
            sessions: SessionStore::new(&store),
            service_id,
            format: opts.format,
            timeout,
        })
    }

    /// The selected service
    pub fn service(&self) -> Result<&Service> {
        Ok(self.catalog.service(&self.service_id)?)
    }

    /// HTTP client pointed at the selected service
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.service()?.base_url, self.timeout)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// Context rooted in a temp store, optionally pointing the service at a mock server
    pub fn context(tmp: &TempDir, service: &str, base_url: Option<String>) -> Context {
        Context::load(GlobalOptions {
            service: Some(service.to_string()),
            base_url,
            store: Some(tmp.path().to_path_buf()),
            format: OutputFormat::Json,
            ..Default::default()
        })
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_to_movies_service() {
        let tmp = TempDir::new().unwrap();
        let ctx = Context::load(GlobalOptions {
            store: Some(tmp.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.service_id, "movies");
        assert_eq!(ctx.timeout, Duration::from_secs(30));
        assert!(ctx.service().unwrap().base_url.starts_with("https://movie-management"));
    }

    #[test]
    fn test_timeout_flag_overrides_config() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            timeout_secs: 90,
            ..Default::default()
        };
        config
            .save(&apiprobe_common::config::config_path(tmp.path()))
            .unwrap();

        let from_config = Context::load(GlobalOptions {
            store: Some(tmp.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(from_config.timeout, Duration::from_secs(90));

        let from_flag = Context::load(GlobalOptions {
            timeout_secs: Some(5),
            store: Some(tmp.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(from_flag.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_base_url_override_and_unknown_service() {
        let tmp = TempDir::new().unwrap();
        let ctx = test_support::context(&tmp, "search", Some("http://localhost:1".to_string()));
        assert_eq!(ctx.client().unwrap().base_url(), "http://localhost:1");

        let err = Context::load(GlobalOptions {
            service: Some("billing".to_string()),
            base_url: Some("http://x".to_string()),
            store: Some(tmp.path().to_path_buf()),
            ..Default::default()
        });
        assert!(err.is_err());
    }
}
