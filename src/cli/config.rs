//! Application configuration
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables:
//!
//! | Variable             | Field                              |
//! |----------------------|------------------------------------|
//! | `PORT`               | `server.port`                      |
//! | `HOST`               | `server.host`                      |
//! | `APP_ENV`            | `environment`                      |
//! | `BOOKSHELF_DATA_DIR` | `storage.data_dir`, selects `file` |

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::storage::StoreBackend;

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Required for the file backend
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    /// Reported by the health endpoint (default: "development")
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            environment: default_environment(),
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (or defaults), apply process environment, validate.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Apply overrides from `lookup` (the process environment in production).
    pub fn with_env<F>(mut self, lookup: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| CliError::config_error(format!("Invalid PORT: '{}'", port)))?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(env) = lookup("APP_ENV") {
            self.environment = env;
        }
        if let Some(dir) = lookup("BOOKSHELF_DATA_DIR") {
            self.storage.backend = BackendKind::File;
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }
        if self.storage.backend == BackendKind::File && self.storage.data_dir.is_none() {
            return Err(CliError::config_error(
                "storage.data_dir is required when storage.backend is 'file'",
            ));
        }
        Ok(())
    }

    pub fn store_backend(&self) -> CliResult<StoreBackend> {
        match (self.storage.backend, &self.storage.data_dir) {
            (BackendKind::Memory, _) => Ok(StoreBackend::Memory),
            (BackendKind::File, Some(dir)) => Ok(StoreBackend::File {
                data_dir: dir.clone(),
            }),
            (BackendKind::File, None) => Err(CliError::config_error(
                "storage.data_dir is required when storage.backend is 'file'",
            )),
        }
    }
}
