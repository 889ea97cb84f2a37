//! `zentrax.toml` configuration.
//!
//! ```toml
//! [backend]
//! url = "ws://localhost:8765"
//!
//! [reconnect]
//! max_attempts = 10
//! base_delay_ms = 3000
//! max_delay_ms = 15000
//!
//! [history]
//! capacity = 50
//!
//! [display]
//! status_interval_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use zentrax_client::{ClientConfig, History, ReconnectPolicy};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Seconds between status lines. Zero disables them.
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            status_interval_secs: default_status_interval_secs(),
        }
    }
}

fn default_url() -> String {
    zentrax_core::DEFAULT_URL.to_string()
}

fn default_max_attempts() -> u32 {
    ReconnectPolicy::DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    ReconnectPolicy::DEFAULT_BASE_DELAY.as_millis() as u64
}

fn default_max_delay_ms() -> u64 {
    ReconnectPolicy::DEFAULT_MAX_DELAY.as_millis() as u64
}

fn default_history_capacity() -> usize {
    History::DEFAULT_CAPACITY
}

fn default_status_interval_secs() -> u64 {
    5
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.backend.url;
        if url.starts_with("wss://") {
            return Err(ConfigError::Invalid(format!(
                "backend.url {url:?} needs TLS, which this build does not support; use ws://"
            )));
        }
        if !url.starts_with("ws://") {
            return Err(ConfigError::Invalid(format!(
                "backend.url must be a ws:// url, got {url:?}"
            )));
        }
        if self.reconnect.base_delay_ms > self.reconnect.max_delay_ms {
            return Err(ConfigError::Invalid(
                "reconnect.base_delay_ms exceeds reconnect.max_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn client(&self) -> ClientConfig {
        ClientConfig {
            url: self.backend.url.clone(),
            reconnect: ReconnectPolicy::new(
                self.reconnect.max_attempts,
                Duration::from_millis(self.reconnect.base_delay_ms),
                Duration::from_millis(self.reconnect.max_delay_ms),
            ),
            history_capacity: self.history.capacity,
        }
    }

    pub fn status_interval(&self) -> Option<Duration> {
        match self.display.status_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend.url, "ws://localhost:8765");

        let client = config.client();
        assert_eq!(client.reconnect, ReconnectPolicy::default());
        assert_eq!(client.history_capacity, 50);
    }

    #[test]
    fn partial_sections() {
        let config = Config::from_toml(
            r#"
            [backend]
            url = "ws://192.168.1.20:8765"

            [reconnect]
            max_attempts = 3

            [display]
            status_interval_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "ws://192.168.1.20:8765");
        assert_eq!(config.reconnect.max_attempts, 3);
        assert_eq!(config.reconnect.base_delay_ms, 3000);
        assert_eq!(config.status_interval(), None);

        let policy = config.client().reconnect;
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay(2), Duration::from_secs(6));
    }

    #[test]
    fn rejects_non_websocket_url() {
        let err = Config::from_toml("[backend]\nurl = \"http://localhost:8765\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_tls_url() {
        let err = Config::from_toml("[backend]\nurl = \"wss://example.com\"").unwrap_err();
        match err {
            ConfigError::Invalid(reason) => assert!(reason.contains("TLS"), "{reason}"),
            other => panic!("expected Invalid, got {other:?}"),
        }

        let mut config = Config::default();
        config.backend.url = "wss://localhost:8765".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_delays() {
        let err = Config::from_toml("[reconnect]\nbase_delay_ms = 20000\nmax_delay_ms = 1000")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_types() {
        let err = Config::from_toml("[history]\ncapacity = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
