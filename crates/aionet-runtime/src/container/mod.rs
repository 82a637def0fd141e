//! Subsystem container: configuration plus the `SecurityManager` that owns
//! every AIONET subsystem instance.

pub mod config;
pub mod manager;

pub use config::{AionetConfig, ConfigError, MAX_DIFFICULTY};
pub use manager::SecurityManager;
