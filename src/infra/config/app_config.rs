use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::infra::slack::slack_api_client::DEFAULT_BASE_URL;

const DEFAULT_FILTER_CONFIG_PATH: &str = "filters.yaml";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_API_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read filter config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse filter config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Filter #{index} is invalid: {reason}")]
    InvalidFilter { index: usize, reason: String },
}

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub signing_secret: String,
    pub access_token: String,
    pub filter_config_path: PathBuf,
    pub listen_addr: SocketAddr,
    pub api_timeout: Duration,
    pub api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let signing_secret = require("SLACK_SIGNING_SECRET")?;
        let access_token = require("SLACK_ACCESS_TOKEN")?;

        let filter_config_path = get("FILTER_CONFIG_PATH")
            .unwrap_or_else(|| DEFAULT_FILTER_CONFIG_PATH.to_string())
            .into();

        let listen_addr = get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "LISTEN_ADDR",
                value: listen_addr.clone(),
                reason: e.to_string(),
            })?;

        let api_timeout = match get("SLACK_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    key: "SLACK_API_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        key: "SLACK_API_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        };

        let api_base_url =
            get("SLACK_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            signing_secret,
            access_token,
            filter_config_path,
            listen_addr,
            api_timeout,
            api_base_url,
        })
    }
}
