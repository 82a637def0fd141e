//! Error types for the transaction ledger

use shared_crypto::CryptoError;
use shared_types::HashHex;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors raised while sealing or appending transactions
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Hashing, signing or proof-of-work failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Amount is NaN or infinite and has no canonical encoding
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Transaction names a predecessor other than the chain tail
    #[error("Linkage mismatch: chain tail is {expected:?}, transaction links to {found:?}")]
    LinkageMismatch {
        /// Current tail hash
        expected: Option<HashHex>,
        /// Predecessor named by the transaction
        found: Option<HashHex>,
    },
}

impl LedgerError {
    /// True if a proof-of-work search ran out of budget or was cancelled.
    pub fn is_pow_interrupted(&self) -> bool {
        matches!(self, Self::Crypto(e) if e.is_pow_interrupted())
    }
}
