//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

use crate::game::{DodgeTable, EngineConfig, Heading, TargetPolicy, HORIZONTAL_DODGE_LOWER_HALF};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// How the bot picks whom to chase
    pub target_policy: TargetPolicy,
    /// Escape heading for a horizontal threat in the lower half of the arena
    pub dodge_lower_half_heading: Heading,

    /// Seed for the fallback random source; entropy when unset
    pub fallback_seed: Option<u64>,
    /// Emit a debug event for every decision
    pub trace_decisions: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Cloud hosts provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            target_policy: parse_var("TARGET_POLICY")?.unwrap_or_default(),
            dodge_lower_half_heading: parse_var("DODGE_LOWER_HALF_HEADING")?
                .unwrap_or(HORIZONTAL_DODGE_LOWER_HALF),

            fallback_seed: parse_var("FALLBACK_SEED")?,
            trace_decisions: parse_var::<bool>("TRACE_DECISIONS")?.unwrap_or(false),
        })
    }

    /// Engine tunables derived from this configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            target_policy: self.target_policy,
            dodge: DodgeTable {
                horizontal_lower_half: self.dodge_lower_half_heading,
                ..DodgeTable::default()
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: "info".to_string(),
            target_policy: TargetPolicy::default(),
            dodge_lower_half_heading: HORIZONTAL_DODGE_LOWER_HALF,
            fallback_seed: None,
            trace_decisions: false,
        }
    }
}

/// Read an optional variable, failing on values that don't parse
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => parse_value(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid server address format")]
    InvalidAddress,
}
