//! Error types for the runtime

use std::time::Duration;

use aio_05_transaction_ledger::LedgerError;
use aio_06_message_chain::MessageChainError;
use thiserror::Error;

use crate::container::ConfigError;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors surfaced by the security manager
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration rejected at startup
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transaction sealing or linkage failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Message or block sealing failed
    #[error(transparent)]
    MessageChain(#[from] MessageChainError),

    /// Proof-of-work search exceeded its wall-clock limit and was cancelled
    #[error("Proof-of-work timeout sealing {kind} at difficulty {difficulty} after {timeout:?}")]
    ProofOfWorkTimeout {
        /// Artifact kind (transaction, message, block)
        kind: &'static str,
        /// Required leading zero hex digits
        difficulty: usize,
        /// Configured limit
        timeout: Duration,
    },

    /// Blocking sealing task panicked or was aborted
    #[error("Sealing task failed: {0}")]
    TaskFailed(String),
}

impl RuntimeError {
    /// True if sealing was abandoned for time or budget.
    pub fn is_pow_timeout(&self) -> bool {
        match self {
            Self::ProofOfWorkTimeout { .. } => true,
            Self::Ledger(e) => e.is_pow_interrupted(),
            Self::MessageChain(e) => e.is_pow_interrupted(),
            _ => false,
        }
    }
}
