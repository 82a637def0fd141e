//! # AIONET Clone Detector (Subsystem 3)
//!
//! **Bounded Context:** Clone and replay detection
//!
//! ## Purpose
//!
//! Six independent checks each contribute capped risk points; their sum is the
//! verdict confidence.
//!
//! | Check | Trigger | Risk |
//! |-------|---------|------|
//! | Hardware fingerprint | fingerprint on record differs from the fresh one | +30 |
//! | Behavioral pattern | few touches, flat pressure, few swipes, odd velocity/response | up to 40 (absent data: 25) |
//! | Temporal consistency | last activity not within (3.6 s, 24 h) | +20 |
//! | Session binding | session age not within (1 s, 1 h) | +15 |
//! | Entropy pattern | average sample entropy outside [0.3, 0.8] | up to 30 (absent data: 20) |
//! | Proximity/environment | readings outside valid numeric ranges | +10 |
//!
//! `confidence = min(100, total)`, `is_cloned = confidence > 60`, risk level
//! thresholds at 30/50/70.
//!
//! The detector also scores clone resistance, produces uniqueness
//! fingerprints, and reports which anti-cloning measures are currently active.
//!
//! ## State
//!
//! Per-device records (hardware fingerprint, last activity, session start) live
//! behind a `parking_lot::RwLock`. Only `detect_cloning_attempt` writes them;
//! the measure report and resistance score are read-only evaluations.

#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod service;

pub use config::CloneDetectionConfig;
pub use domain::{
    AntiCloningReport, CheckOutcome, CloneVerdict, DetectionMethod, ProtectionLevel,
    ProtectionMeasure,
};
pub use service::CloneDetector;

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 3;
