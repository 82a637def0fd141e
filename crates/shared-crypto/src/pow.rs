//! # Proof-of-Work Sealing
//!
//! A seal is the smallest nonce `n` such that `SHA-256(hash ++ n)` (with `n` in
//! decimal) starts with `difficulty` zero hex digits.
//!
//! The search is always bounded by `max_iterations` and polls an optional
//! cancellation flag, so a caller can stop it from another thread.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{sha256_hex, CryptoError, Result};

/// How often the search checks its cancellation flag.
pub const CANCEL_POLL_INTERVAL: u64 = 10_000;

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowSeal {
    /// Winning nonce.
    pub nonce: u64,
    /// `SHA-256(hash ++ nonce)`.
    pub digest: String,
    /// Hashes computed, including the winning one.
    pub iterations: u64,
}

/// Bounded nonce search at a fixed difficulty.
#[derive(Debug, Clone, Copy)]
pub struct ProofOfWork {
    difficulty: usize,
    max_iterations: u64,
}

impl ProofOfWork {
    /// Create a search for `difficulty` leading zero hex digits, trying at most
    /// `max_iterations` nonces.
    pub fn new(difficulty: usize, max_iterations: u64) -> Self {
        Self {
            difficulty,
            max_iterations,
        }
    }

    /// Required leading zero hex digits.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Iteration budget.
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Search nonces from 0 upward.
    pub fn seal(&self, payload_hash: &str) -> Result<PowSeal> {
        self.seal_with_cancel(payload_hash, None)
    }

    /// Search nonces from 0 upward, stopping early if `cancel` is raised.
    ///
    /// # Errors
    ///
    /// - `ProofOfWorkTimeout` when the budget is exhausted
    /// - `ProofOfWorkCancelled` when the flag was observed
    pub fn seal_with_cancel(
        &self,
        payload_hash: &str,
        cancel: Option<&AtomicBool>,
    ) -> Result<PowSeal> {
        for nonce in 0..self.max_iterations {
            if nonce % CANCEL_POLL_INTERVAL == 0
                && cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                tracing::debug!(nonce, difficulty = self.difficulty, "PoW search cancelled");
                return Err(CryptoError::ProofOfWorkCancelled { iterations: nonce });
            }

            let digest = pow_digest(payload_hash, nonce);
            if meets_difficulty(&digest, self.difficulty) {
                tracing::trace!(nonce, difficulty = self.difficulty, "PoW seal found");
                return Ok(PowSeal {
                    nonce,
                    digest,
                    iterations: nonce + 1,
                });
            }
        }

        tracing::warn!(
            difficulty = self.difficulty,
            iterations = self.max_iterations,
            "PoW search exhausted its budget"
        );
        Err(CryptoError::ProofOfWorkTimeout {
            difficulty: self.difficulty,
            iterations: self.max_iterations,
        })
    }

    /// Check a previously found nonce.
    pub fn verify(&self, payload_hash: &str, nonce: u64) -> bool {
        meets_difficulty(&pow_digest(payload_hash, nonce), self.difficulty)
    }
}

/// `SHA-256(payload_hash ++ nonce)`, hex encoded.
pub fn pow_digest(payload_hash: &str, nonce: u64) -> String {
    sha256_hex(format!("{payload_hash}{nonce}"))
}

/// True if `digest` starts with `difficulty` `'0'` characters.
pub fn meets_difficulty(digest: &str, difficulty: usize) -> bool {
    digest.len() >= difficulty && digest.bytes().take(difficulty).all(|b| b == b'0')
}
