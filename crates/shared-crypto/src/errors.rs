//! Crypto error types.

use shared_types::SerializationError;
use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Hex input could not be decoded
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Invalid key material
    #[error("Invalid key material")]
    InvalidKey,

    /// Payload could not be canonicalized for hashing
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Proof-of-work search exhausted its iteration budget
    #[error("Proof-of-work timeout: no nonce found for difficulty {difficulty} within {iterations} iterations")]
    ProofOfWorkTimeout {
        /// Required leading zero hex digits
        difficulty: usize,
        /// Iterations attempted
        iterations: u64,
    },

    /// Proof-of-work search was cancelled by the caller
    #[error("Proof-of-work cancelled after {iterations} iterations")]
    ProofOfWorkCancelled {
        /// Iterations attempted before cancellation
        iterations: u64,
    },
}

impl CryptoError {
    /// Whether the error came from an interrupted proof-of-work search.
    pub fn is_pow_interrupted(&self) -> bool {
        matches!(
            self,
            Self::ProofOfWorkTimeout { .. } | Self::ProofOfWorkCancelled { .. }
        )
    }
}
