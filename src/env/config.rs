use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::errors::ConfigError;
use crate::env::spaces::{BoxSpace, Dtype, Space};

pub const DEFAULT_ENDPOINT: &str = "tcp://127.0.0.1:5558";
pub const DEFAULT_TIMEOUT_MS: u64 = 2500;

/// Where the remote environment lives and what it looks like.
///
/// Nothing here is negotiated with the remote side: both spaces must match
/// what the simulator actually sends and expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// How long one step waits for the reply (and for a reconnect to finish).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_action_space")]
    pub action_space: Space,
    #[serde(default = "default_observation_space")]
    pub observation_space: BoxSpace,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_action_space() -> Space {
    Space::discrete(18)
}

fn default_observation_space() -> BoxSpace {
    BoxSpace::uniform(0.0, 255.0, vec![4, 4, 3], Dtype::U8)
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            action_space: default_action_space(),
            observation_space: default_observation_space(),
        }
    }
}

impl EnvConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_action_space(mut self, space: Space) -> Self {
        self.action_space = space;
        self
    }

    pub fn with_observation_space(mut self, space: BoxSpace) -> Self {
        self.observation_space = space;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.endpoint)?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.action_space.validate()?;
        self.observation_space.validate()
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::Endpoint(endpoint.to_string());

    if let Some(rest) = endpoint.strip_prefix("tcp://") {
        let (host, port) = rest.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() || port.parse::<u16>().is_err() {
            return Err(invalid());
        }
        Ok(())
    } else if let Some(path) = endpoint.strip_prefix("ipc://") {
        if path.is_empty() {
            return Err(invalid());
        }
        Ok(())
    } else {
        Err(invalid())
    }
}
