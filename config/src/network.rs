//! The network configuration document.

use crate::{ConfigError, Exceptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static parameters of a network.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParams {
    pub name: String,

    /// Address version byte.
    pub pub_key_hash: u8,

    #[serde(default)]
    pub wif: u8,

    /// Genesis time, ISO 8601. Timestamps on the wire count seconds from it.
    #[serde(default = "default_epoch")]
    pub epoch: String,

    #[serde(default)]
    pub nethash: String,

    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub symbol: String,
}

/// The raw document a [`crate::ConfigManager`] is built from.
///
/// Milestones stay untyped until they are merged, since each entry only carries
/// the keys that change at its height.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network: NetworkParams,

    pub milestones: Vec<serde_json::Value>,

    #[serde(default)]
    pub exceptions: Exceptions,

    #[serde(default)]
    pub genesis_block: Option<serde_json::Value>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_epoch() -> String {
    "2017-03-21T13:00:00.000Z".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NetworkParams {
    /// The epoch as Unix seconds.
    pub fn epoch_unix(&self) -> Result<i64, ConfigError> {
        chrono::DateTime::parse_from_rfc3339(&self.epoch)
            .map(|t| t.timestamp())
            .map_err(|_| ConfigError::InvalidEpoch(self.epoch.clone()))
    }
}

impl NetworkConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
