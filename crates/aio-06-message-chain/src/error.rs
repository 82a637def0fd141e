//! Error types for the message blockchain

use shared_crypto::CryptoError;
use thiserror::Error;

/// Result type alias for message chain operations
pub type Result<T> = std::result::Result<T, MessageChainError>;

/// Errors raised while sealing messages or blocks
#[derive(Debug, Error)]
pub enum MessageChainError {
    /// Hashing, signing, encryption or proof-of-work failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Encryption or decryption was asked for with an empty shared secret
    #[error("Encryption requires a non-empty shared secret")]
    EncryptionRequiresSecret,

    /// Encrypted message carries no encryption nonce
    #[error("Encrypted message {id} has no encryption nonce")]
    MissingEncryptionNonce {
        /// Message id
        id: String,
    },
}

impl MessageChainError {
    /// True if a proof-of-work search ran out of budget or was cancelled.
    pub fn is_pow_interrupted(&self) -> bool {
        matches!(self, Self::Crypto(e) if e.is_pow_interrupted())
    }
}
