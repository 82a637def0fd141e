//! # AIONET Identity & Keying (Subsystem 1)
//!
//! **Bounded Context:** Device identity and peer pairing
//!
//! ## Purpose
//!
//! - Creates the process-lifetime `DeviceIdentity` (device id + key pair).
//! - Establishes `DevicePair`s with peers: a shared secret derived from the
//!   local private key and the peer's public key, bound to a fresh session id.
//! - Expires pairs after a fixed TTL (30 minutes by default).
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Identity immutable after creation | `DeviceIdentity` exposes no setters |
//! | Pairs keyed by unique session id | `PairRegistry::establish_pair` (UUID v4) |
//! | Expired pairs are purged | `PairRegistry::cleanup_expired_pairs` |
//! | Unknown lookups are absent, not errors | `PairRegistry::get` returns `Option` |
//!
//! ## Concurrency
//!
//! The registry is behind a `parking_lot::RwLock`; establishing and purging
//! take the write lock.

#![warn(clippy::all)]

pub mod domain;

pub use domain::{DeviceIdentity, DevicePair, PairRegistry, DEFAULT_PAIR_TTL_MS};

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 1;
