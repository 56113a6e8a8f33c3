//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Initial timer lengths, used when no session snapshot exists yet
//! - Notification permission and delivery options
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::notify::Permission;
use crate::timer::{
    TimerState, BREAK_LENGTH_RANGE, DEFAULT_BREAK_LENGTH_MIN, DEFAULT_SESSION_LENGTH_MIN,
    DEFAULT_TOTAL_SESSIONS, SESSION_LENGTH_RANGE, TOTAL_SESSIONS_RANGE,
};

pub const CONFIG_FILE: &str = "config.toml";

/// Timer defaults for a fresh session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_session_length")]
    pub session_length: u32,
    #[serde(default = "default_break_length")]
    pub break_length: u32,
    #[serde(default = "default_total_sessions")]
    pub total_sessions: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub permission: Permission,
    /// Ring the terminal bell with each alert.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_session_length() -> u32 {
    DEFAULT_SESSION_LENGTH_MIN
}
fn default_break_length() -> u32 {
    DEFAULT_BREAK_LENGTH_MIN
}
fn default_total_sessions() -> u32 {
    DEFAULT_TOTAL_SESSIONS
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            session_length: default_session_length(),
            break_length: default_break_length(),
            total_sessions: default_total_sessions(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            permission: Permission::NotAsked,
            bell: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                    .into(),
            ),
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from disk, writing and returning the default if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check the timer lengths against their allowed ranges.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("timer.session_length", self.timer.session_length, SESSION_LENGTH_RANGE),
            ("timer.break_length", self.timer.break_length, BREAK_LENGTH_RANGE),
            ("timer.total_sessions", self.timer.total_sessions, TOTAL_SESSIONS_RANGE),
        ];
        for (key, value, (min, max)) in checks {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be between {min} and {max} (got {value})"),
                });
            }
        }
        Ok(())
    }

    /// Initial timer state for a session with no snapshot.
    /// Each out-of-range length falls back to its built-in default.
    pub fn timer_defaults(&self) -> TimerState {
        let field = |key: &str, value: u32, (min, max): (u32, u32), default: u32| {
            if (min..=max).contains(&value) {
                value
            } else {
                tracing::warn!(key, value, "timer config out of range, using default");
                default
            }
        };
        TimerState::with_lengths(
            field(
                "timer.session_length",
                self.timer.session_length,
                SESSION_LENGTH_RANGE,
                DEFAULT_SESSION_LENGTH_MIN,
            ),
            field(
                "timer.break_length",
                self.timer.break_length,
                BREAK_LENGTH_RANGE,
                DEFAULT_BREAK_LENGTH_MIN,
            ),
            field(
                "timer.total_sessions",
                self.timer.total_sessions,
                TOTAL_SESSIONS_RANGE,
                DEFAULT_TOTAL_SESSIONS,
            ),
        )
    }
}
