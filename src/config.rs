use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ConfigError;

pub const ENV_API_BASE_URL: &str = "PLANETVOTE_API_BASE_URL";
pub const ENV_WS_URL: &str = "PLANETVOTE_WS_URL";
pub const ENV_RELAY_ENABLED: &str = "PLANETVOTE_RELAY_ENABLED";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub relay: RelayConfig,
    pub vote: VoteConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix for `/extensions/vote`, `/extensions/vote/batch` and `/quiz/submit`.
    pub base_url: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub enabled: bool,
    pub ws_url: String,
    pub reconnect_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteConfig {
    /// Two votes on the same extension closer than this continue a combo.
    pub combo_window_ms: u64,
    /// Idle time after which the combo counter drops back to zero.
    pub combo_reset_ms: u64,
    /// Debounce delay between the last enqueue and the batch flush.
    pub flush_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How often the display re-reads counts from the backend.
    pub refresh_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ws_url: "ws://localhost:3000/ws".to_string(),
            reconnect_ms: 5_000,
        }
    }
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            combo_window_ms: 2_000,
            combo_reset_ms: 3_000,
            flush_delay_ms: 100,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { refresh_ms: 30_000 }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl RelayConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_ms)
    }
}

impl VoteConfig {
    pub fn combo_reset(&self) -> Duration {
        Duration::from_millis(self.combo_reset_ms)
    }

    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }
}

impl DisplayConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}

impl AppConfig {
    /// File (if any) -> environment overrides -> validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(ENV_API_BASE_URL) {
            info!("{ENV_API_BASE_URL} set, using {url}");
            self.api.base_url = url;
        }
        if let Ok(url) = env::var(ENV_WS_URL) {
            info!("{ENV_WS_URL} set, using {url}");
            self.relay.ws_url = url;
        }
        if let Ok(flag) = env::var(ENV_RELAY_ENABLED) {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.relay.enabled = true,
                "0" | "false" | "no" | "off" => self.relay.enabled = false,
                other => warn!("Ignoring {ENV_RELAY_ENABLED}={other}, expected true/false"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let nonzero = [
            ("api.request_timeout_ms", self.api.request_timeout_ms),
            ("relay.reconnect_ms", self.relay.reconnect_ms),
            ("vote.combo_window_ms", self.vote.combo_window_ms),
            ("vote.combo_reset_ms", self.vote.combo_reset_ms),
            ("vote.flush_delay_ms", self.vote.flush_delay_ms),
            ("display.refresh_ms", self.display.refresh_ms),
        ];
        for (key, value) in nonzero {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if self.vote.combo_window_ms >= self.vote.combo_reset_ms {
            return Err(ConfigError::Invalid {
                key: "vote.combo_window_ms",
                reason: format!(
                    "combo window ({}ms) must be shorter than the reset delay ({}ms)",
                    self.vote.combo_window_ms, self.vote.combo_reset_ms
                ),
            });
        }

        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "api.base_url",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
