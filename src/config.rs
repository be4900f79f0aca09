//! Relay configuration.
//!
//! Webhook target administration lives outside the relay; at startup the
//! relay reads a JSON config file naming the bind address, the configured
//! targets, and the host's status table. The path comes from the
//! `RELAY_CONFIG` environment variable.
//!
//! ```json
//! {
//!   "bind_addr": "0.0.0.0:3000",
//!   "targets": [
//!     { "id": 1, "project_id": 5, "url": "https://chat.example/room" },
//!     { "id": 2, "project_id": 0, "url": "https://chat.example/catch-all" }
//!   ],
//!   "statuses": { "1": "New", "2": "Resolved" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::targets::WebhookTarget;
use crate::types::StatusId;

/// Environment variable naming the config file path.
pub const CONFIG_ENV_VAR: &str = "RELAY_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `RELAY_CONFIG` environment variable is not set.
    #[error("{CONFIG_ENV_VAR} is not set")]
    MissingEnvVar,

    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON of the expected shape.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parsed relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Address the hook server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Configured webhook targets, in delivery order.
    #[serde(default)]
    pub targets: Vec<WebhookTarget>,

    /// The host's status table, `id -> name`.
    #[serde(default)]
    pub statuses: HashMap<u64, String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl RelayConfig {
    /// Loads configuration from the file named by `RELAY_CONFIG`.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV_VAR).map_err(|_| ConfigError::MissingEnvVar)?;
        Self::load(path)
    }

    /// Loads configuration from a specific file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The status table keyed by [`StatusId`], for the status directory.
    pub fn status_map(&self) -> HashMap<StatusId, String> {
        self.statuses
            .iter()
            .map(|(id, name)| (StatusId(*id), name.clone()))
            .collect()
    }
}
