//! Configuration management for the `TripAI` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripAiError;
use crate::map::TileLayer;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable read when no key is configured explicitly
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Root configuration structure for the `TripAI` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TripAiConfig {
    /// Language-model API configuration
    pub model: ModelConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Trip planning limits and display defaults
    pub planner: PlannerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// PDF export settings
    pub export: ExportConfig,
    /// Serve a canned itinerary instead of calling the model API
    pub demo_mode: bool,
}

/// Language-model API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API key for the model service
    pub api_key: Option<String>,
    /// Base URL for the model API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the form page and its assets
    pub static_dir: String,
}

/// Trip planning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Longest trip a user may request
    pub max_days: u32,
    /// Tile layer used when the form does not pick one
    pub default_tile_layer: TileLayer,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// PDF export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// TrueType font to embed; needed for text outside Latin-1
    pub font_path: Option<PathBuf>,
}

// Default value functions
fn default_model_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model_name() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_model_timeout() -> u32 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

fn default_max_days() -> u32 {
    14
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_model_base_url(),
            model: default_model_name(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
            default_tile_layer: TileLayer::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TripAiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_demo(config_path, false)
    }

    /// Load configuration, optionally forcing demo mode on before validation
    pub fn load_with_demo(config_path: Option<PathBuf>, force_demo: bool) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPAI_MODEL__API_KEY -> model.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRIPAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if force_demo {
            builder = builder
                .set_override("demo_mode", true)
                .with_context(|| "Failed to enable demo mode")?;
        }

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripAiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.model.api_key.is_none() {
            config.model.api_key = std::env::var(FALLBACK_API_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripai").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.model.base_url.is_empty() {
            self.model.base_url = default_model_base_url();
        }
        if self.model.model.is_empty() {
            self.model.model = default_model_name();
        }
        if self.model.timeout_seconds == 0 {
            self.model.timeout_seconds = default_model_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.planner.max_days == 0 {
            self.planner.max_days = default_max_days();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The model API key is mandatory unless running in demo mode
    pub fn validate_api_key(&self) -> Result<()> {
        if self.demo_mode {
            return Ok(());
        }

        match &self.model.api_key {
            None => Err(TripAiError::config(format!(
                "Missing model API key. Set {FALLBACK_API_KEY_VAR} or TRIPAI_MODEL__API_KEY, or enable demo_mode."
            ))
            .into()),
            Some(key) if key.trim().is_empty() => Err(TripAiError::config(
                "Model API key cannot be empty. Either remove it or provide a valid key.",
            )
            .into()),
            Some(key) if key.len() < 8 => Err(TripAiError::config(
                "Model API key appears to be invalid (too short). Please check your API key.",
            )
            .into()),
            Some(_) => Ok(()),
        }
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.model.timeout_seconds > 300 {
            return Err(
                TripAiError::config("Model API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.planner.max_days > 60 {
            return Err(TripAiError::config("Maximum trip length cannot exceed 60 days").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripAiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripAiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let base_url = &self.model.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TripAiError::config(
                "Model API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> TripAiConfig {
        let mut config = TripAiConfig::default();
        config.model.api_key = Some("valid_api_key_123".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = TripAiConfig::default();
        assert_eq!(
            config.model.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert!(config.export.font_path.is_none());
        assert_eq!(config.model.timeout_seconds, 60);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.planner.max_days, 14);
        assert_eq!(config.planner.default_tile_layer, TileLayer::Standard);
        assert_eq!(config.logging.level, "info");
        assert!(config.model.api_key.is_none());
        assert!(!config.demo_mode);
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let config = TripAiConfig::default();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Missing model API key"));
    }

    #[test]
    fn test_demo_mode_needs_no_api_key() {
        let mut config = TripAiConfig::default();
        config.demo_mode = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_api_key_rejected() {
        let mut config = TripAiConfig::default();
        config.model.api_key = Some("abc".to_string());
        let result = config.validate_api_key();
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = valid_config();
        config.model.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = valid_config();
        config.model.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = valid_config();
        config.model.timeout_seconds = 0;
        config.planner.max_days = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.model.timeout_seconds, 60);
        assert_eq!(config.planner.max_days, 14);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("tripai-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "demo_mode = true\n\n[server]\nport = 9090\n\n[planner]\ndefault_tile_layer = \"dark\"\n\n\
             [export]\nfont_path = \"/usr/share/fonts/DejaVuSans.ttf\"\n",
        )
        .unwrap();

        let config = TripAiConfig::load_from_path(Some(path)).unwrap();
        assert!(config.demo_mode);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.planner.default_tile_layer, TileLayer::Dark);
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(
            config.export.font_path,
            Some(PathBuf::from("/usr/share/fonts/DejaVuSans.ttf"))
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_with_demo_override() {
        let dir = std::env::temp_dir().join(format!("tripai-demo-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[server]\nport = 7070\n").unwrap();

        let config = TripAiConfig::load_with_demo(Some(path), true).unwrap();
        assert!(config.demo_mode);
        assert_eq!(config.server.port, 7070);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_config_path_generation() {
        let path = TripAiConfig::get_config_path();
        if let Some(path) = path {
            assert!(path.to_string_lossy().contains("tripai"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
