//! # Runtime Configuration
//!
//! Sealing difficulties, proof-of-work budgets and time windows.
//!
//! ## Environment Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `AIONET_TX_DIFFICULTY` | 2 |
//! | `AIONET_MSG_DIFFICULTY` | 3 |
//! | `AIONET_BLOCK_DIFFICULTY` | 4 |
//! | `AIONET_MAX_POW_ITERATIONS` | 50,000,000 |
//! | `AIONET_POW_TIMEOUT_SECS` | 30 |
//! | `AIONET_PAIR_TTL_SECS` | 1800 |
//! | `AIONET_DEVICE_RETENTION_SECS` | 86400 |
//!
//! Unparsable values fall back to the default; `validate` catches values that
//! parse but make no sense.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Hex digits in a SHA-256 digest; no difficulty can exceed it.
pub const MAX_DIFFICULTY: usize = 64;

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AionetConfig {
    pub transaction_difficulty: usize,
    pub message_difficulty: usize,
    pub block_difficulty: usize,
    /// Nonce budget per proof-of-work search.
    pub max_pow_iterations: u64,
    /// Wall-clock limit for async sealing.
    pub pow_timeout: Duration,
    pub pair_ttl: Duration,
    /// Idle time after which per-device scoring state is forgotten.
    pub device_retention: Duration,
    /// Validity window of a message's dynamic data.
    pub message_validity_window: Duration,
    /// Trust scores retained per device.
    pub score_history_capacity: usize,
}

impl Default for AionetConfig {
    fn default() -> Self {
        Self {
            transaction_difficulty: 2,
            message_difficulty: 3,
            block_difficulty: 4,
            max_pow_iterations: 50_000_000,
            pow_timeout: Duration::from_secs(30),
            pair_ttl: Duration::from_secs(30 * 60),
            device_retention: Duration::from_secs(24 * 60 * 60),
            message_validity_window: Duration::from_secs(30),
            score_history_capacity: 50,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Difficulty outside `1..=64`.
    #[error("{name} must be between 1 and {MAX_DIFFICULTY}, got {value}")]
    InvalidDifficulty {
        /// Which difficulty
        name: &'static str,
        /// Rejected value
        value: usize,
    },

    /// Zero nonce budget.
    #[error("max_pow_iterations must be greater than zero")]
    ZeroIterationBudget,
}

impl AionetConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            transaction_difficulty: parse("AIONET_TX_DIFFICULTY")
                .map_or(defaults.transaction_difficulty, |v| v as usize),
            message_difficulty: parse("AIONET_MSG_DIFFICULTY")
                .map_or(defaults.message_difficulty, |v| v as usize),
            block_difficulty: parse("AIONET_BLOCK_DIFFICULTY")
                .map_or(defaults.block_difficulty, |v| v as usize),
            max_pow_iterations: parse("AIONET_MAX_POW_ITERATIONS")
                .unwrap_or(defaults.max_pow_iterations),
            pow_timeout: parse("AIONET_POW_TIMEOUT_SECS")
                .map_or(defaults.pow_timeout, Duration::from_secs),
            pair_ttl: parse("AIONET_PAIR_TTL_SECS").map_or(defaults.pair_ttl, Duration::from_secs),
            device_retention: parse("AIONET_DEVICE_RETENTION_SECS")
                .map_or(defaults.device_retention, Duration::from_secs),
            ..defaults
        }
    }

    /// Reject difficulties outside `1..=64` and a zero iteration budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("transaction_difficulty", self.transaction_difficulty),
            ("message_difficulty", self.message_difficulty),
            ("block_difficulty", self.block_difficulty),
        ] {
            if value == 0 || value > MAX_DIFFICULTY {
                return Err(ConfigError::InvalidDifficulty { name, value });
            }
        }
        if self.max_pow_iterations == 0 {
            return Err(ConfigError::ZeroIterationBudget);
        }
        Ok(())
    }

    /// Duration as whole milliseconds, saturating.
    pub(crate) fn millis(duration: Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }
}
