use std::path::{Path, PathBuf};
use std::time::Duration;

use console_engine::{TransportError, TransportSettings};
use console_logging::console_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "agent_console.ron";
pub const SERVER_ENV: &str = "AGENT_CONSOLE_SERVER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: console_engine::PersistError,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid server url: {0}")]
    ServerUrl(#[from] TransportError),
}

/// Settings read from `agent_console.ron`. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    /// `None` disables the per-request timeout.
    pub request_timeout_ms: Option<u64>,
    pub max_response_bytes: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
    pub state_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:50001/".to_string(),
            poll_interval_ms: 250,
            connect_timeout_ms: 5_000,
            request_timeout_ms: Some(10_000),
            max_response_bytes: 8 * 1024 * 1024,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
            state_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            console_engine::read_optional(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        match content {
            Some(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            None => Ok(Self::default()),
        }
    }

    pub fn with_server_override(mut self, server: Option<String>) -> Self {
        if let Some(server) = server.filter(|s| !s.trim().is_empty()) {
            console_info!("server url overridden by {SERVER_ENV}");
            self.server_url = server;
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn transport_settings(&self) -> Result<TransportSettings, ConfigError> {
        let mut settings = TransportSettings::new(&self.server_url)?;
        settings.connect_timeout = Duration::from_millis(self.connect_timeout_ms);
        settings.request_timeout = self.request_timeout_ms.map(Duration::from_millis);
        settings.max_bytes = self.max_response_bytes;
        Ok(settings)
    }
}
