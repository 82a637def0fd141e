//! # Domain Layer - Entropy Subsystem
//!
//! - `shannon`: binned, normalized Shannon entropy
//! - `entities`: `EntropyFingerprint` and its parts
//! - `analyzer`: `EntropyAnalyzer`

pub mod analyzer;
pub mod entities;
pub mod shannon;

pub use analyzer::*;
pub use entities::*;
pub use shannon::*;
