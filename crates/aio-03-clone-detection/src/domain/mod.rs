//! # Domain Layer - Clone Detection
//!
//! - `entities`: verdicts, detection methods, anti-cloning report
//! - `checks`: the six stateless check functions
//! - `resistance`: clone-resistance factors

pub mod checks;
pub mod entities;
pub mod resistance;

pub use entities::*;
