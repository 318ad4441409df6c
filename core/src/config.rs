//! Client configuration: where the catalog lives and how to reach it.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HOST: &str = "openmarket.yagom-academy.kr";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENMARKET_PORT is not a valid port: {0}")]
    InvalidPort(String),

    #[error("OPENMARKET_TIMEOUT_SECS is not a whole number of seconds: {0}")]
    InvalidTimeout(String),
}

/// Settings shared by `ProductEndpoints` and `ReqwestTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    /// Vendor identifier sent with mutating requests.
    pub identifier: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: None,
            identifier: None,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read `OPENMARKET_*` variables, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(scheme) = lookup("OPENMARKET_SCHEME") {
            config.scheme = scheme;
        }
        if let Some(host) = lookup("OPENMARKET_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("OPENMARKET_PORT") {
            config.port = Some(port.parse().map_err(|_| ConfigError::InvalidPort(port))?);
        }
        config.identifier = lookup("OPENMARKET_IDENTIFIER").filter(|id| !id.is_empty());
        if let Some(secs) = lookup("OPENMARKET_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidTimeout(secs))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
