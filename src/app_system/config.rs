use std::path::PathBuf;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "config/clinic";

/// Runtime settings. Every field has a default, so an empty environment is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClinicConfig {
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_mailbox_capacity() -> usize {
    32
}

fn default_low_stock_threshold() -> u32 {
    10
}

fn default_page_size() -> usize {
    10
}

fn default_max_commit_attempts() -> u32 {
    3
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: default_mailbox_capacity(),
            low_stock_threshold: default_low_stock_threshold(),
            page_size: default_page_size(),
            max_commit_attempts: default_max_commit_attempts(),
            snapshot_path: None,
            log_filter: default_log_filter(),
        }
    }
}

impl ClinicConfig {
    /// Loads `config/clinic.toml` (optional), then `CLINIC__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("CLINIC").separator("__"))
            .build()?;

        let config: ClinicConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Message("mailbox_capacity must be at least 1".to_string()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Message("page_size must be at least 1".to_string()));
        }
        if self.max_commit_attempts == 0 {
            return Err(ConfigError::Message("max_commit_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}
