use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use time::UtcOffset;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SOURCE_ENDPOINT: &str = "http://127.0.0.1:8000/api/person_count/1";
pub const DEFAULT_SOURCE_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_UTC_OFFSET_HOURS: i8 = 9;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub source: Option<SourceSection>,
    #[serde(default)]
    pub display: Option<DisplaySection>,
    #[serde(default)]
    pub server: Option<ServerSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSection {
    /// Person-count endpoint, `http://` only
    pub endpoint: Option<String>,
    /// Read records from a JSON file instead of the endpoint
    pub path: Option<PathBuf>,
    /// Connect/read/write timeout in milliseconds (default: 3000)
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySection {
    /// Offset used for calendar days and hour-of-day buckets (default: +9)
    pub utc_offset_hours: Option<i8>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    /// Port to listen on (default: 8080)
    pub port: Option<u16>,
    /// Seconds between background refetches (default: 60, 0 disables)
    pub refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    config.utc_offset()?;
    Ok(config)
}

impl Config {
    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::INFO)
    }

    pub fn source_endpoint(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.endpoint.as_deref())
            .unwrap_or(DEFAULT_SOURCE_ENDPOINT)
    }

    pub fn source_path(&self) -> Option<&Path> {
        let path = self.source.as_ref()?.path.as_deref()?;
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }

    pub fn source_timeout(&self) -> Duration {
        let millis = self
            .source
            .as_ref()
            .and_then(|s| s.timeout_ms)
            .unwrap_or(DEFAULT_SOURCE_TIMEOUT_MS);
        Duration::from_millis(millis)
    }

    pub fn utc_offset(&self) -> Result<UtcOffset, ConfigError> {
        let hours = self
            .display
            .as_ref()
            .and_then(|d| d.utc_offset_hours)
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
        UtcOffset::from_hms(hours, 0, 0)
            .map_err(|err| ConfigError::Invalid(format!("utc_offset_hours {hours}: {err}")))
    }

    /// Returns the server port (default: 8080)
    pub fn server_port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Background refresh interval, `None` when disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        let secs = self
            .server
            .as_ref()
            .and_then(|s| s.refresh_interval_secs)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
        (secs > 0).then(|| Duration::from_secs(secs))
    }
}
