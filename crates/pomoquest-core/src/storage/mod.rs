mod config;
pub mod database;
pub mod migrations;
pub mod snapshot;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use snapshot::{clear_except_history, load_session, save_changes, save_session};

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the directory holding `config.toml` and `pomoquest.db`.
///
/// `POMOQUEST_DATA_DIR` wins when set. Otherwise `~/.config/pomoquest[-dev]/`,
/// with the `-dev` suffix when `POMOQUEST_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOQUEST_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOQUEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomoquest-dev")
            } else {
                base_dir.join("pomoquest")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Key-value store of JSON-encoded session fields.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory store, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
