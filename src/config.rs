//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prediction backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Dashboard view settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Run the sample update sequence after the charts come up
    #[serde(default)]
    pub demo_on_start: bool,

    #[serde(default = "default_demo_delay")]
    pub demo_delay_ms: u64,

    #[serde(default = "default_segment_labels")]
    pub segment_labels: Vec<String>,
}

fn default_demo_delay() -> u64 {
    1000
}

fn default_segment_labels() -> Vec<String> {
    (0..3).map(|i| format!("Segment {}", i)).collect()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            demo_on_start: false,
            demo_delay_ms: default_demo_delay(),
            segment_labels: default_segment_labels(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// The first config file that exists wins. A file that exists but cannot
    /// be read or parsed is an error, not a silent fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("salesdash").join("config.toml")),
            Some(PathBuf::from("./salesdash.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SALESDASH_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("SALESDASH_API_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.api.request_timeout_ms = ms;
            }
        }

        if let Some(demo) = lookup("SALESDASH_DEMO") {
            self.dashboard.demo_on_start = match demo.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    tracing::warn!("Ignoring unrecognised SALESDASH_DEMO value {:?}", other);
                    false
                }
            };
        }

        if let Some(level) = lookup("SALESDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SALESDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Salesdash Configuration
#
# Environment variables override these settings:
# - SALESDASH_API_URL
# - SALESDASH_API_TIMEOUT_MS
# - SALESDASH_DEMO
# - SALESDASH_LOG_LEVEL
# - SALESDASH_LOG_FORMAT

[api]
# Prediction backend base URL
base_url = "http://127.0.0.1:5000"

# Request timeout in milliseconds
request_timeout_ms = 10000

[dashboard]
# Push one sample point and one count per segment after startup
demo_on_start = false

# Delay before the sample sequence runs (ms)
demo_delay_ms = 1000

# Pie chart bucket labels
segment_labels = ["Segment 0", "Segment 1", "Segment 2"]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
