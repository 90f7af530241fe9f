//! Configuration management for the barista gateway
//!
//! Values resolve env > TOML file > default.

pub mod file;

use std::path::PathBuf;

use crate::prompt::DEFAULT_SHOP_NAME;
use crate::store::{HISTORY_FILE, JsonFileStore, SUMMARY_FILE};
use crate::tools::DEFAULT_READY_MINUTES;
use crate::{Error, Result};

/// Default API server port
pub const DEFAULT_PORT: u16 = 18790;

/// Barista gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API server configuration
    pub api_server: ApiServerConfig,

    /// Order document locations
    pub store: StoreConfig,

    /// Shop settings for prompts and replies
    pub shop: ShopConfig,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Port to listen on
    pub port: u16,
}

/// Where the history and snapshot documents live
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding both documents (relative paths resolve against the working directory)
    pub data_dir: PathBuf,

    /// History document file name
    pub history_file: String,

    /// Snapshot document file name
    pub summary_file: String,
}

impl StoreConfig {
    /// Full path of the history document
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    /// Full path of the snapshot document
    #[must_use]
    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join(&self.summary_file)
    }

    /// Open a file store over the configured documents
    #[must_use]
    pub fn open(&self) -> JsonFileStore {
        JsonFileStore::new(self.history_path(), self.summary_path())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            history_file: HISTORY_FILE.to_string(),
            summary_file: SUMMARY_FILE.to_string(),
        }
    }
}

/// Shop settings
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Shop name the agent introduces
    pub name: String,

    /// Minutes quoted to the customer after ordering
    pub ready_minutes: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SHOP_NAME.to_string(),
            ready_minutes: DEFAULT_READY_MINUTES,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the standard config file
    ///
    /// # Errors
    ///
    /// Returns error if the resolved store settings are unusable
    pub fn load() -> Result<Self> {
        Self::resolve(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a file overlay and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a document file name is empty or both documents
    /// would share one file
    pub fn resolve(
        fc: file::BaristaConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        // API server config (env > toml > default); unparseable env falls through
        let api_server = ApiServerConfig {
            port: env("BARISTA_PORT")
                .or_else(|| env("PORT"))
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
        };

        let defaults = StoreConfig::default();
        let store = StoreConfig {
            data_dir: env("BARISTA_DATA_DIR")
                .or(fc.store.data_dir)
                .map_or(defaults.data_dir, PathBuf::from),
            history_file: env("BARISTA_HISTORY_FILE")
                .or(fc.store.history_file)
                .unwrap_or(defaults.history_file),
            summary_file: env("BARISTA_SUMMARY_FILE")
                .or(fc.store.summary_file)
                .unwrap_or(defaults.summary_file),
        };

        if store.history_file.trim().is_empty() || store.summary_file.trim().is_empty() {
            return Err(Error::Config("order document file names must not be empty".to_string()));
        }
        if store.history_file == store.summary_file {
            return Err(Error::Config(format!(
                "history and summary documents must differ (both are {})",
                store.history_file
            )));
        }

        let shop = ShopConfig {
            name: env("BARISTA_SHOP_NAME")
                .or(fc.shop.name)
                .unwrap_or_else(|| DEFAULT_SHOP_NAME.to_string()),
            ready_minutes: env("BARISTA_READY_MINUTES")
                .and_then(|s| s.parse().ok())
                .or(fc.shop.ready_minutes)
                .unwrap_or(DEFAULT_READY_MINUTES),
        };

        Ok(Self {
            api_server,
            store,
            shop,
        })
    }
}
