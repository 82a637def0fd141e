//! # AIONET Transaction Ledger (Subsystem 5)
//!
//! **Bounded Context:** Payment transaction sealing and linkage
//!
//! ## Sealing
//!
//! 1. Build the canonical payload (every field except signature and nonce).
//! 2. `hash = SHA-256(canonical payload)`.
//! 3. Sign the hash with the device key.
//! 4. Search nonces from 0 for `SHA-256(hash ++ nonce)` with 2 leading zero
//!    hex digits. The search is bounded by an iteration budget and can be
//!    cancelled.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | `chain[i].previous_hash == chain[i-1].hash` | `TransactionChain::add_transaction` |
//! | Sealed transactions are immutable | fields only set by the ledger before return |
//! | Verification never fails loudly | `verify_transaction` returns `bool` |

#![warn(clippy::all)]

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{
    render_receipt, verify_transaction, SecureTransaction, TransactionChain, TransactionPayload,
};
pub use error::{LedgerError, Result};
pub use service::{TransactionLedger, TRANSACTION_DIFFICULTY};

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 5;
