use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MediBot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables read at startup.
pub const BIND_ADDR_ENV: &str = "MEDIBOT_BIND_ADDR";
pub const MODEL_DIR_ENV: &str = "MEDIBOT_MODEL_DIR";
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MODEL_DIR: &str = "ml/saved_model";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,tower_http=warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("Invalid port '{0}'")]
    Port(String),
}

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub model_dir: PathBuf,
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `PORT` (set by most hosting platforms) overrides the port of
    /// `MEDIBOT_BIND_ADDR`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let mut bind_addr: SocketAddr =
            raw_addr
                .parse()
                .map_err(|source| ConfigError::BindAddr {
                    value: raw_addr.clone(),
                    source,
                })?;

        if let Some(port) = lookup(PORT_ENV) {
            let port: u16 = port.trim().parse().map_err(|_| ConfigError::Port(port.clone()))?;
            bind_addr.set_port(port);
        }

        let model_dir = lookup(MODEL_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR));

        Ok(Self {
            bind_addr,
            model_dir,
        })
    }
}
