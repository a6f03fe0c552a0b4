use super::ConfigError;
use crate::link::DEFAULT_SHARE_BASE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// Network the operator is connected to; drives collateral options.
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub relay: Option<RelayConfig>,
    #[serde(default)]
    pub event_log: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RelayConfig {
    pub endpoint: String,
    #[serde(default = "default_relay_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_share_base_url() -> String {
    DEFAULT_SHARE_BASE_URL.to_string()
}

fn default_relay_timeout_secs() -> u64 {
    DEFAULT_RELAY_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            share_base_url: default_share_base_url(),
            chain_id: None,
            relay: None,
            event_log: None,
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.share_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::Settings(
                "share_base_url must be non-empty".to_string(),
            ));
        }
        if base.contains('?') || base.contains('#') {
            return Err(ConfigError::Settings(
                "share_base_url must not carry a query or fragment".to_string(),
            ));
        }
        if let Some(relay) = &self.relay {
            if relay.endpoint.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "relay.endpoint must be non-empty".to_string(),
                ));
            }
            if relay.timeout_secs == 0 {
                return Err(ConfigError::Settings(
                    "relay.timeout_secs must be >= 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}
