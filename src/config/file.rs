//! TOML configuration file loading
//!
//! Supports `~/.config/barista/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct BaristaConfigFile {
    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Order document locations
    #[serde(default)]
    pub store: StoreFileConfig,

    /// Shop-facing settings used in prompts and replies
    #[serde(default)]
    pub shop: ShopFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// Order document locations
#[derive(Debug, Default, Deserialize)]
pub struct StoreFileConfig {
    /// Directory holding both documents
    pub data_dir: Option<String>,
    /// History document file name
    pub history_file: Option<String>,
    /// Snapshot document file name
    pub summary_file: Option<String>,
}

/// Shop settings
#[derive(Debug, Default, Deserialize)]
pub struct ShopFileConfig {
    /// Shop name the agent introduces
    pub name: Option<String>,
    /// Minutes quoted until the order is ready
    pub ready_minutes: Option<u32>,
}

/// Load the TOML config file from the standard path
///
/// Returns `BaristaConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> BaristaConfigFile {
    config_file_path().map_or_else(BaristaConfigFile::default, |path| load_config_file_from(&path))
}

/// Load a TOML config file from an explicit path
///
/// Missing, unreadable, or unparseable files yield the default (empty) overlay.
pub fn load_config_file_from(path: &Path) -> BaristaConfigFile {
    if !path.exists() {
        return BaristaConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                BaristaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            BaristaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/barista/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("barista").join("config.toml"))
}
