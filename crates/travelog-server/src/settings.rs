//! Server settings
//!
//! Values come from an optional config file, then `TRAVELOG_*` environment
//! variables (e.g. `TRAVELOG_BIND_ADDRESS`, `TRAVELOG_STORAGE`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "TRAVELOG";

/// Which key-value backend holds the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/travelog.db`
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: usize,
    #[serde(default = "default_list_page_size")]
    pub list_page_size: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0:8787".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./public")
}

fn default_storage() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_max_attachment_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_list_page_size() -> usize {
    1000
}

impl Settings {
    /// Load configuration from an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn database_path(&self) -> String {
        self.database_path.clone().unwrap_or_else(|| {
            self.data_dir
                .join("travelog.db")
                .to_string_lossy()
                .to_string()
        })
    }

    /// Request body limit: two attachments plus room for the text fields
    /// and multipart framing
    pub fn body_limit(&self) -> usize {
        self.max_attachment_bytes
            .saturating_mul(2)
            .saturating_add(64 * 1024)
    }

    fn validate(&self) -> Result<()> {
        if self.max_attachment_bytes == 0 {
            anyhow::bail!("max_attachment_bytes must be greater than zero");
        }
        if self.list_page_size == 0 {
            anyhow::bail!("list_page_size must be greater than zero");
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            data_dir: default_data_dir(),
            database_path: None,
            static_dir: default_static_dir(),
            storage: default_storage(),
            max_attachment_bytes: default_max_attachment_bytes(),
            list_page_size: default_list_page_size(),
        }
    }
}
