//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{endpoints, ocr, server, storage, tts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Where generated audio lives
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub transliteration: TransliterationConfig,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_storage()?;
        self.validate_tts()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.public_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.public_port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_upload_bytes".to_string(),
                message: "Upload limit must be at least 1 byte".to_string(),
            });
        }

        if server.fallback_host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.fallback_host".to_string(),
                message: "Fallback host cannot be empty".to_string(),
            });
        }

        if self.environment.is_production() && server.fallback_host == server::FALLBACK_HOST {
            tracing::warn!(
                "server.fallback_host is still {}; audio URLs will not be reachable \
                 from other machines",
                server::FALLBACK_HOST
            );
        }

        Ok(())
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        let storage = &self.storage;

        if storage.audio_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.audio_dir".to_string(),
                message: "Audio directory cannot be empty".to_string(),
            });
        }

        if storage.artifact_prefix.is_empty() || !is_file_safe(&storage.artifact_prefix) {
            return Err(ConfigError::InvalidValue {
                field: "storage.artifact_prefix".to_string(),
                message: format!(
                    "Must be non-empty and contain only [A-Za-z0-9_-], got '{}'",
                    storage.artifact_prefix
                ),
            });
        }

        if storage.artifact_extension.is_empty() || !is_file_safe(&storage.artifact_extension) {
            return Err(ConfigError::InvalidValue {
                field: "storage.artifact_extension".to_string(),
                message: format!(
                    "Must be non-empty and contain only [A-Za-z0-9_-], got '{}'",
                    storage.artifact_extension
                ),
            });
        }

        Ok(())
    }

    fn validate_tts(&self) -> Result<(), ConfigError> {
        if self.tts.max_pieces == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tts.max_pieces".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.tts.max_chunk_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tts.max_chunk_chars".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn is_file_safe(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port written into audio URLs
    #[serde(default = "default_port")]
    pub public_port: u16,

    /// Host written into audio URLs when the request host is loopback or a
    /// wildcard address
    #[serde(default = "default_fallback_host")]
    pub fallback_host: String,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Transcription timeout in seconds, 0 disables it
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    server::PORT
}

fn default_fallback_host() -> String {
    server::FALLBACK_HOST.to_string()
}

fn default_max_upload_bytes() -> usize {
    server::MAX_UPLOAD_BYTES
}

fn default_timeout() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_port: default_port(),
            fallback_host: default_fallback_host(),
            max_upload_bytes: default_max_upload_bytes(),
            timeout_seconds: default_timeout(),
            cors_enabled: false,
            cors_origins: Vec::new(),
        }
    }
}

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,

    /// File name prefix for generated artifacts
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    /// File extension for generated artifacts, without the dot
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
}

fn default_audio_dir() -> String {
    storage::AUDIO_DIR.to_string()
}

fn default_artifact_prefix() -> String {
    storage::ARTIFACT_PREFIX.to_string()
}

fn default_artifact_extension() -> String {
    storage::ARTIFACT_EXTENSION.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            artifact_prefix: default_artifact_prefix(),
            artifact_extension: default_artifact_extension(),
        }
    }
}

/// OCR sidecar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,

    /// Language hint used when the request does not supply one
    #[serde(default = "default_ocr_languages")]
    pub default_languages: String,

    /// Language retried once when the requested set fails
    #[serde(default = "default_ocr_fallback")]
    pub fallback_language: String,

    #[serde(default = "default_ocr_timeout")]
    pub timeout_ms: u64,
}

fn default_ocr_endpoint() -> String {
    endpoints::OCR_DEFAULT.to_string()
}

fn default_ocr_languages() -> String {
    ocr::DEFAULT_LANGUAGES.to_string()
}

fn default_ocr_fallback() -> String {
    ocr::FALLBACK_LANGUAGE.to_string()
}

fn default_ocr_timeout() -> u64 {
    ocr::TIMEOUT_MS
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ocr_endpoint(),
            default_languages: default_ocr_languages(),
            fallback_language: default_ocr_fallback(),
            timeout_ms: default_ocr_timeout(),
        }
    }
}

/// Transliteration sidecar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransliterationConfig {
    #[serde(default = "default_transliteration_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_transliteration_timeout")]
    pub timeout_ms: u64,
}

fn default_transliteration_endpoint() -> String {
    endpoints::TRANSLITERATION_DEFAULT.to_string()
}

fn default_transliteration_timeout() -> u64 {
    10_000
}

impl Default for TransliterationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_transliteration_endpoint(),
            timeout_ms: default_transliteration_timeout(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_tts_timeout")]
    pub timeout_ms: u64,

    /// Sentence pieces above this count are re-bucketed
    #[serde(default = "default_max_pieces")]
    pub max_pieces: usize,

    /// Character budget per re-bucketed piece
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

fn default_tts_endpoint() -> String {
    endpoints::TTS_DEFAULT.to_string()
}

fn default_tts_timeout() -> u64 {
    tts::TIMEOUT_MS
}

fn default_max_pieces() -> usize {
    tts::MAX_PIECES
}

fn default_max_chunk_chars() -> usize {
    tts::MAX_CHUNK_CHARS
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            timeout_ms: default_tts_timeout(),
            max_pieces: default_max_pieces(),
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (LIPI_ prefix, `__` separator)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("LIPI")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
