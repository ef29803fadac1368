//! Party client configuration with TOML file support.

use std::path::Path;

use pop_types::InstanceId;
use pop_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::PartyError;

/// Configuration for a party client.
///
/// Loaded with [`PartyConfig::from_toml_file`] or built in code for tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyConfig {
    /// Hex id of the party instance to attach to.
    #[serde(default)]
    pub instance_id: Option<String>,

    /// Reward offered per attendee when spawning a new party.
    #[serde(default = "default_mining_reward")]
    pub mining_reward: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_mining_reward() -> u64 {
    1_000_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PartyConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PartyError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PartyError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, PartyError> {
        toml::from_str(s).map_err(|e| PartyError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, PartyError> {
        toml::to_string_pretty(self).map_err(|e| PartyError::Config(e.to_string()))
    }

    /// The configured party instance, if any.
    pub fn instance_id(&self) -> Result<Option<InstanceId>, PartyError> {
        self.instance_id
            .as_deref()
            .map(|s| {
                s.parse::<InstanceId>()
                    .map_err(|e| PartyError::Config(format!("instance_id: {e}")))
            })
            .transpose()
    }

    pub fn log_format(&self) -> Result<LogFormat, PartyError> {
        self.log_format.parse().map_err(PartyError::Config)
    }

    /// Install the global subscriber. Returns false if one was already set.
    pub fn init_logging(&self) -> Result<bool, PartyError> {
        Ok(pop_utils::init_logging(self.log_format()?, &self.log_level))
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            instance_id: None,
            mining_reward: default_mining_reward(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
