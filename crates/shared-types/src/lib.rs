//! # Shared Types Crate
//!
//! Types shared by every AIONET subsystem.
//!
//! ## Contents
//!
//! - `entities`: interaction telemetry supplied by the UI/NFC layer
//!   (touch points, swipes, timing, proximity) and the `RiskLevel` scale.
//! - `time`: the `TimeSource` port. Every time-dependent rule reads the clock
//!   through it so tests can drive time explicitly.
//! - `canonical`: field-order-independent JSON used as hashing input.
//! - `stats`: small numeric helpers over telemetry samples.
//! - `errors`: serialization errors shared across crates.
//!
//! ## Design Principles
//!
//! - **All telemetry is optional**: every collection defaults to empty and every
//!   record to `None`; scoring code degrades instead of failing.
//! - **Non-finite samples are noise**: `stats::finite` drops NaN/infinite values
//!   before any arithmetic.

pub mod canonical;
pub mod entities;
pub mod errors;
pub mod stats;
pub mod time;

pub use canonical::canonical_json;
pub use entities::*;
pub use errors::*;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource, Timestamp};

/// Hex-encoded SHA-256 digest (64 lowercase hex chars).
pub type HashHex = String;

/// Device identifier supplied by the device/storage layer.
pub type DeviceId = String;

/// Hash used where no predecessor exists (genesis block, first link).
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";
