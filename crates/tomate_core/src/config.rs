//! Runtime configuration for hosts embedding the list models.
//!
//! # Responsibility
//! - Describe where the store lives, how to log, and how weeks are framed.
//! - Resolve `TOMATE_*` environment overrides on top of defaults.
//!
//! # Invariants
//! - Configuration never opens the store or initializes logging by itself.

use crate::calendar::WeekStart;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TOMATE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TOMATE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TOMATE_LOG_DIR";
pub const ENV_WEEK_START: &str = "TOMATE_WEEK_START";

const DEFAULT_DB_FILE: &str = "tomate.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyValue { key: &'static str },
    InvalidWeekStart(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue { key } => write!(f, "`{key}` must not be empty"),
            Self::InvalidWeekStart(value) => {
                write!(f, "unsupported week start `{value}`; expected sunday|monday")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by the store, logging and weekly statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of trace|debug|info|warn|error.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    pub week_start: WeekStart,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            week_start: WeekStart::default(),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed by `TOMATE_*` name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_DB_PATH) {
            config.db_path = PathBuf::from(non_empty(ENV_DB_PATH, &value)?);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            config.log_level = non_empty(ENV_LOG_LEVEL, &value)?.to_string();
        }
        if let Some(value) = lookup(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(non_empty(ENV_LOG_DIR, &value)?));
        }
        if let Some(value) = lookup(ENV_WEEK_START) {
            config.week_start = WeekStart::parse(&value)
                .ok_or_else(|| ConfigError::InvalidWeekStart(value.trim().to_string()))?;
        }

        Ok(config)
    }
}

fn non_empty<'a>(key: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyValue { key });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| values.get(key).cloned()
    }

    #[test]
    fn missing_values_keep_defaults() {
        let config = CoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.db_path, PathBuf::from("tomate.db"));
        assert_eq!(config.week_start, WeekStart::Sunday);
    }

    #[test]
    fn overrides_are_trimmed_and_applied() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /tmp/tomate.db "),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/tmp/tomate-logs"),
            (ENV_WEEK_START, "Monday"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/tomate.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/tomate-logs")));
        assert_eq!(config.week_start, WeekStart::Monday);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_WEEK_START, "friday")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidWeekStart("friday".to_string()));

        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyValue { key: ENV_DB_PATH });
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: CoreConfig =
            serde_json::from_str(r#"{"db_path": "/data/tomate.db", "week_start": "monday"}"#)
                .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/tomate.db"));
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.log_dir, None);
    }
}
