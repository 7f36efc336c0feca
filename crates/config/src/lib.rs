//! Configuration management for lipi
//!
//! Supports loading configuration from:
//! - YAML files (config/default.yaml, config/{env}.yaml)
//! - Environment variables (LIPI__ prefix)
//!
//! Settings are built once at startup and handed to each component
//! explicitly.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, ObservabilityConfig, OcrConfig, RuntimeEnvironment, ServerConfig, Settings,
    StorageConfig, TransliterationConfig, TtsConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
