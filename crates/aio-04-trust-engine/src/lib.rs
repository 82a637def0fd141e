//! # AIONET Trust Engine (Subsystem 4)
//!
//! **Bounded Context:** Device trust scoring
//!
//! ## Purpose
//!
//! Scores a device interaction on five components, combines them with adaptive
//! weights, and decays the result with device inactivity.
//!
//! | Component | Weight | Signals |
//! |-----------|--------|---------|
//! | deviceReputation | 0.25 | known device, interaction count |
//! | interactionQuality | 0.20 | touch/swipe presence, pressure variation |
//! | timingConsistency | 0.20 | response time, pattern consistency |
//! | behavioralPattern | 0.20 | touch count, coordinate spread |
//! | proximitySecurity | 0.15 | signal strength, distance, interference |
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Every component score is in `[0, 100]` | `clamp_score` after each component |
//! | `overall_score` is in `[0, 100]` | clamped after the rotation factor |
//! | `rotation_factor` is in `[0.3, 1.2]` | `rotation_factor` |
//! | Score history never exceeds its capacity | `ScoreHistory::push` evicts oldest |
//!
//! ## Risk Levels
//!
//! `>= 80` low, `>= 60` medium, `>= 40` high, otherwise critical.

#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod service;

pub use config::TrustConfig;
pub use domain::{
    AdaptiveWeights, HistoricalTrend, ScoreHistory, TrendDirection, TrustComponent, TrustFactor,
    TrustScore,
};
pub use service::TrustEngine;

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 4;
