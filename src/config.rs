//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::debounce::SearchOptions;
use crate::search::{DEBOUNCE_MS, MIN_QUERY_CHARS, SEARCH_PAGE_SIZE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// MacroFacts server connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Where the token and theme are kept
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("macrofacts").to_string_lossy().to_string())
        .unwrap_or_else(|| "./macrofacts_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// `data_dir` with a leading `~` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Interactive search tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_debounce_ms() -> u64 {
    DEBOUNCE_MS
}

fn default_min_query_len() -> usize {
    MIN_QUERY_CHARS
}

fn default_page_size() -> u32 {
    SEARCH_PAGE_SIZE
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            page_size: default_page_size(),
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            min_chars: self.min_query_len,
            limit: self.page_size.max(1),
        }
    }
}

/// Facts about this machine sent to the server
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceConfig {
    /// IANA timezone, e.g. "Europe/Oslo". Falls back to `TZ`.
    pub timezone: Option<String>,
}

impl DeviceConfig {
    /// Configured timezone, else the `TZ` environment variable
    pub fn resolved_timezone(&self) -> Option<String> {
        self.timezone
            .clone()
            .or_else(|| std::env::var("TZ").ok())
            .map(|tz| tz.trim().trim_start_matches(':').to_string())
            .filter(|tz| !tz.is_empty())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
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

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("macrofacts").join("config.toml")),
            Some(PathBuf::from("/etc/macrofacts/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `MACROFACTS_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MACROFACTS_API_URL") {
            self.api.base_url = url;
        }
        if let Some(data_dir) = lookup("MACROFACTS_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(timezone) = lookup("MACROFACTS_TIMEZONE") {
            self.device.timezone = Some(timezone);
        }
        if let Some(level) = lookup("MACROFACTS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("MACROFACTS_LOG_FORMAT") {
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
    r#"# MacroFacts Configuration
#
# Environment variables override these settings:
# - MACROFACTS_API_URL
# - MACROFACTS_DATA_DIR
# - MACROFACTS_TIMEZONE
# - MACROFACTS_LOG_LEVEL
# - MACROFACTS_LOG_FORMAT

[api]
# MacroFacts server; requests go to <base_url>/api/...
base_url = "http://localhost:8080"

# Request timeout in seconds
request_timeout_secs = 30

[storage]
# Directory holding the session token and theme preference
data_dir = "~/.local/share/macrofacts"

[search]
# Quiet period after typing before a search is sent (ms)
debounce_ms = 250

# Shorter queries clear results instead of searching
min_query_len = 2

# Results per search
page_size = 25

[device]
# IANA timezone reported to the server; defaults to $TZ
# timezone = "Europe/Oslo"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/macrofacts/macrofacts.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.search.page_size, 25);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.device.timezone.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("[api]\nbase_url = \"https://mf.example\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://mf.example");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.search.options().debounce, Duration::from_millis(250));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MACROFACTS_API_URL", "http://10.0.0.2:8080"),
            ("MACROFACTS_TIMEZONE", "Asia/Tokyo"),
            ("MACROFACTS_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.device.resolved_timezone().as_deref(), Some("Asia/Tokyo"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_tilde_data_dir() {
        let storage = StorageConfig {
            data_dir: "/var/lib/macrofacts".to_string(),
        };
        assert_eq!(storage.data_path(), PathBuf::from("/var/lib/macrofacts"));

        let storage = StorageConfig {
            data_dir: "~/x".to_string(),
        };
        let path = storage.data_path();
        assert!(path.ends_with("x"));
        match dirs::home_dir() {
            Some(home) => {
                assert_ne!(path, PathBuf::from("~/x"));
                assert_eq!(path, home.join("x"));
            }
            None => assert_eq!(path, PathBuf::from("~/x")),
        }
    }
}
