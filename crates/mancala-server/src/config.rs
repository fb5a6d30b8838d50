//! Server configuration from the environment.

use mancala_core::{validate_initial_stones, DEFAULT_INITIAL_STONES, MAX_INITIAL_STONES};
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error(
        "Invalid INITIAL_STONES '{0}': expected an integer from 1 to {max}",
        max = MAX_INITIAL_STONES
    )]
    InvalidInitialStones(String),
}

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// WebSocket listen address (`SERVER_ADDR`)
    pub addr: SocketAddr,
    /// Stones per pit for new games (`INITIAL_STONES`)
    pub initial_stones: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_value = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_value.clone(),
                source,
            })?;

        let initial_stones = match lookup("INITIAL_STONES") {
            Some(value) => parse_initial_stones(&value)?,
            None => DEFAULT_INITIAL_STONES,
        };

        Ok(Self {
            addr,
            initial_stones,
        })
    }
}

fn parse_initial_stones(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|n| validate_initial_stones(n).ok())
        .ok_or_else(|| ConfigError::InvalidInitialStones(value.to_string()))
}
