//! # AIONET Message Blockchain (Subsystem 6)
//!
//! **Bounded Context:** Secure messaging and block sealing
//!
//! ## Purpose
//!
//! A secure message carries, besides its content, replay-resistance material
//! (`DynamicData`, valid for 30 s), a `LivenessProof` derived from the entropy
//! analyzer, the sender's trust score, and a single-validator
//! `BlockchainProof`. Messages are hashed, signed and sealed at difficulty 3,
//! then queued. `create_message_block` seals the whole queue into a block at
//! difficulty 4.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | `merkle_root == MerkleRoot(message hashes)` | `seal_block`, `verify_blocks` |
//! | `previous_block_hash == chain[i-1].block_hash` | `seal_block`, `verify_blocks` |
//! | Block sealing drains the queue exclusively | pending `Mutex` held for the whole seal |
//! | A failed seal leaves the queue intact | queue drained only after the seal succeeds |
//!
//! ## Verification
//!
//! `verify_secure_message` and `verify_message_blockchain` return `false`
//! on any mismatch; they never error.

#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::MessageChainConfig;
pub use domain::{
    verify_blocks, verify_secure_message, BlockchainProof, BlockchainStats, DynamicData,
    LivenessProof, MessageBlock, MessageType, SecureMessage,
};
pub use error::{MessageChainError, Result};
pub use service::{MessageBlockchain, MessageRequest};

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 6;
