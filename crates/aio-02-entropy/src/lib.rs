//! # AIONET Entropy Analyzer (Subsystem 2)
//!
//! **Bounded Context:** Liveness from interaction variability
//!
//! ## Purpose
//!
//! Humans are noisy; replays and scripts are not. This subsystem measures the
//! normalized Shannon entropy of five telemetry channels and turns it into an
//! `EntropyFingerprint`:
//!
//! | Channel | Samples | Weight |
//! |---------|---------|--------|
//! | timing | intervals between touches (timing record as fallback) | 0.30 |
//! | pressure | touch pressures | 0.25 |
//! | movement | distances between consecutive touches | 0.20 |
//! | gesture | swipe velocities and durations | 0.15 |
//! | session | session duration, response time, consistency | 0.10 |
//!
//! Each channel is compared with an expected band, the weighted sum gives the
//! overall entropy, and a z-score against a human baseline (mean 0.55,
//! sigma 0.15) drives anomaly detection.
//!
//! ## Error Handling
//!
//! Nothing here fails. Absent or non-finite telemetry yields entropy 0 for the
//! affected channel and a structurally complete fingerprint.

#![warn(clippy::all)]

pub mod config;
pub mod domain;

pub use config::{ChannelBand, EntropyConfig};
pub use domain::{
    shannon_entropy, AnomalyDetection, ChannelEntropy, EntropyAnalyzer, EntropyChannel,
    EntropyChannels, EntropyFingerprint, ENTROPY_BINS,
};

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 2;
