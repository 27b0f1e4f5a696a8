use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::directory::{IdentityMode, ParseIdentityModeError};

pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the relay process.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds.
    pub listen_addr: SocketAddr,
    /// Database file for the on-disk store. `None` runs in memory.
    pub db_path: Option<PathBuf>,
    /// Identity assignment policy for new registrations.
    pub identity_mode: IdentityMode,
    /// Default level for the stdout log filter.
    pub log_level: tracing::Level,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            db_path: None,
            identity_mode: IdentityMode::default(),
            log_level: tracing::Level::INFO,
        }
    }
}

impl ServiceConfig {
    /// Apply `DEADDROP_*` environment overrides on top of the current
    /// values. Command line flags are applied after this, so they win.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(addr) = std::env::var("DEADDROP_ADDR") {
            self.listen_addr = addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddr(addr.clone()))?;
        }
        if let Ok(path) = std::env::var("DEADDROP_STORE") {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Ok(mode) = std::env::var("DEADDROP_IDENTITY_MODE") {
            self.identity_mode = mode.parse()?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid listen address {0:?}")]
    InvalidAddr(String),
    #[error(transparent)]
    InvalidMode(#[from] ParseIdentityModeError),
}
