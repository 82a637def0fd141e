//! # AIONET Test Suite
//!
//! Unified test crate for behavior that spans subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs        # Shared interaction telemetry samples
//! └── integration/
//!     ├── properties.rs  # Round-trip and tamper properties of sealed artifacts
//!     ├── scenarios.rs   # Human vs. replayed telemetry end to end
//!     └── flows.rs       # Pairing, messaging and async sealing via SecurityManager
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p aionet-tests
//! cargo test -p aionet-tests integration::scenarios::
//!
//! # Benchmarks
//! cargo bench -p aionet-tests
//! ```

pub mod fixtures;
pub mod integration;
