//! Application configuration
//!
//! Optional TOML file at `~/.omq/config.toml`:
//!
//! ```toml
//! origin = "https://menu.example.com"
//! database = "/var/lib/omq/omq.db"
//!
//! [pricing_table]
//! publishable_key = "pk_live_..."
//! pricing_table_id = "prctbl_..."
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{pricing, share};
use crate::paths;

/// Settings read from the config file, with defaults for anything omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin the public menu link is built from
    pub origin: String,
    /// Database path override
    pub database: Option<PathBuf>,
    pub pricing_table: PricingTableConfig,
}

/// Hosted pricing table identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTableConfig {
    pub publishable_key: String,
    pub pricing_table_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: share::DEFAULT_ORIGIN.to_string(),
            database: None,
            pricing_table: PricingTableConfig::default(),
        }
    }
}

impl Default for PricingTableConfig {
    fn default() -> Self {
        Self {
            publishable_key: pricing::PUBLISHABLE_KEY.to_string(),
            pricing_table_id: pricing::PRICING_TABLE_ID.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&paths::config_file())
    }

    /// Load from a specific path; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Database location, honoring the override
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(paths::database_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = AppConfig::load_from_path(&temp_dir.path().join("config.toml"))
            .expect("Missing config should not fail");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.origin, "http://localhost:5173");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "origin = \"https://menu.example.com\"\n\n[pricing_table]\npricing_table_id = \"prctbl_live\"\n",
        )
        .expect("Failed to write config");

        let config = AppConfig::load_from_path(&path).expect("Failed to load config");

        assert_eq!(config.origin, "https://menu.example.com");
        assert_eq!(config.pricing_table.pricing_table_id, "prctbl_live");
        assert_eq!(config.pricing_table.publishable_key, pricing::PUBLISHABLE_KEY);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "origin = [").expect("Failed to write config");

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_database_override() {
        let config = AppConfig {
            database: Some(PathBuf::from("/tmp/menu.db")),
            ..AppConfig::default()
        };
        assert_eq!(config.database_path(), PathBuf::from("/tmp/menu.db"));
    }
}
