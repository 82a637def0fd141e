//! # AIONET Runtime
//!
//! Wires the six AIONET subsystems into a single [`SecurityManager`] context
//! object and exposes bounded async sealing on top of it. The `aionet-node`
//! binary in `main.rs` is a demo driver around this library.
//!
//! ## Control Flow
//!
//! ```text
//! interaction telemetry ──→ Entropy (2) ──┐
//!                                         ├──→ Trust (4) ──→ Message chain (6)
//!                     Clone detector (3) ─┘
//! payment fields ──────────────────────────────→ Transaction ledger (5)
//! ```
//!
//! ## Concurrency
//!
//! | Operation | Runs on | Bound |
//! |-----------|---------|-------|
//! | `create_secure_*`, `create_message_block` | caller thread | iteration budget |
//! | `seal_transaction`, `seal_message`, `seal_block` | blocking pool | iteration budget + `pow_timeout` |

#![warn(clippy::all)]

pub mod container;
pub mod error;
pub mod sealing;

pub use container::{AionetConfig, ConfigError, SecurityManager, MAX_DIFFICULTY};
pub use error::{Result, RuntimeError};
