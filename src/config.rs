//! Runtime configuration read from environment variables.
//!
//! - `EMI_BIND_ADDR`: listen address, default `0.0.0.0:8080`
//! - `EMI_DATABASE`: SQLite file path; unset, empty or `:memory:` keeps
//!   records in process memory
//! - `RUST_LOG`: log verbosity, read by `env_logger`

use crate::error::{EmiError, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable holding the listen address.
pub const BIND_ADDR_VAR: &str = "EMI_BIND_ADDR";

/// Environment variable holding the SQLite database path.
pub const DATABASE_VAR: &str = "EMI_DATABASE";

/// Listen address used when `EMI_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In process memory; lost on exit.
    Memory,

    /// SQLite database file.
    Sqlite(PathBuf),
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.trim().parse::<SocketAddr>().map_err(|e| {
            EmiError::Config(format!("{}='{}': {}", BIND_ADDR_VAR, raw_addr, e))
        })?;

        let store = match lookup(DATABASE_VAR) {
            Some(path) if !path.trim().is_empty() && path.trim() != ":memory:" => {
                StoreBackend::Sqlite(PathBuf::from(path.trim()))
            }
            _ => StoreBackend::Memory,
        };

        Ok(Config { bind_addr, store })
    }
}
