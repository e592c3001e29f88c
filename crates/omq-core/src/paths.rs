//! Filesystem locations under the user's home directory

use std::path::PathBuf;

use crate::constants::fs;

/// Root config directory (~/.omq)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(fs::CONFIG_DIR_NAME)
}

/// Default database location (~/.omq/omq.db)
pub fn database_path() -> PathBuf {
    config_dir().join(fs::DATABASE_FILE_NAME)
}

/// Default config file location (~/.omq/config.toml)
pub fn config_file() -> PathBuf {
    config_dir().join(fs::CONFIG_FILE_NAME)
}

/// Log directory (~/.omq/logs)
pub fn logs_dir() -> PathBuf {
    config_dir().join(fs::LOGS_DIR_NAME)
}

/// Log file (~/.omq/logs/omq.log)
pub fn log_file() -> PathBuf {
    logs_dir().join(fs::LOG_FILE_NAME)
}
