//! # Domain Layer - Identity Subsystem
//!
//! - `entities`: `DeviceIdentity`, `DevicePair`
//! - `registry`: `PairRegistry` with TTL-based expiry

pub mod entities;
pub mod registry;

pub use entities::*;
pub use registry::*;
