//! Store configuration file.
//!
//! # Responsibility
//! - Load `mindnest.json` from an app data directory, or write defaults.
//!
//! # Invariants
//! - Fields missing from an existing file take their defaults.
//! - A present but unparsable file is an error; it is never overwritten.

use crate::speech::SpeechProfile;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "mindnest.json";
pub const DEFAULT_STORAGE_KEY: &str = "mindnest-storage";
pub const DEFAULT_RECENT_SYMBOLS_LIMIT: usize = 6;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Parsed but semantically unusable.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config io error: {err}"),
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Runtime settings for one `AppStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage key the durable blob is written under.
    pub storage_key: String,
    /// Capacity of the recent-symbols list.
    pub recent_symbols_limit: usize,
    pub speech: SpeechProfile,
    /// Overrides `default_log_level()` when set.
    pub log_level: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            recent_symbols_limit: DEFAULT_RECENT_SYMBOLS_LIMIT,
            speech: SpeechProfile::default(),
            log_level: None,
        }
    }
}

impl StoreConfig {
    /// Reads `mindnest.json` in `base_dir`, creating it with defaults when
    /// absent.
    pub fn load_or_init(base_dir: &Path) -> Result<Self, ConfigError> {
        fs::create_dir_all(base_dir)?;
        let config_path = base_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)?;
            let config: StoreConfig = serde_json::from_str(&raw)?;
            config.validate()?;
            return Ok(config);
        }

        let config = StoreConfig::default();
        fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be blank".into()));
        }
        if self.recent_symbols_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_symbols_limit must be at least 1".into(),
            ));
        }
        if let Some(level) = self.log_level.as_deref() {
            crate::logging::normalize_level(level).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    /// Log level to initialize logging with.
    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(crate::logging::default_log_level())
    }

    /// Starts file logging under `log_dir` at `effective_log_level()`.
    pub fn init_logging(&self, log_dir: &str) -> Result<(), String> {
        crate::logging::init_logging(self.effective_log_level(), log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, CONFIG_FILE_NAME};
    use std::fs;

    #[test]
    fn load_or_init_writes_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"recent_symbols_limit": 3, "speech": {"rate": 1.0}}"#,
        )
        .unwrap();
        let config = StoreConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(config.recent_symbols_limit, 3);
        assert_eq!(config.storage_key, "mindnest-storage");
        assert_eq!(config.speech.rate, 1.0);
        assert_eq!(config.speech.pitch, 1.1);
    }

    #[test]
    fn zero_symbol_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"recent_symbols_limit": 0}"#,
        )
        .unwrap();
        let err = StoreConfig::load_or_init(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn log_level_override_is_validated_and_preferred() {
        let mut config = StoreConfig::default();
        assert_eq!(
            config.effective_log_level(),
            crate::logging::default_log_level()
        );

        config.log_level = Some("warn".into());
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_log_level(), "warn");

        config.log_level = Some("chatty".into());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
