//! Configuration types for the message blockchain

use serde::{Deserialize, Serialize};

/// Message and block sealing parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageChainConfig {
    /// Leading zero hex digits required of a message seal.
    pub message_difficulty: usize,
    /// Leading zero hex digits required of a block hash.
    pub block_difficulty: usize,
    /// Nonce budget per search.
    pub max_pow_iterations: u64,
    /// How long dynamic data stays valid after creation, ms.
    pub validity_window_ms: u64,
}

impl Default for MessageChainConfig {
    fn default() -> Self {
        Self {
            message_difficulty: 3,
            block_difficulty: 4,
            max_pow_iterations: 50_000_000,
            validity_window_ms: 30_000,
        }
    }
}
