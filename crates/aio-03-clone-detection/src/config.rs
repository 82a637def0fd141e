//! Configuration types for clone detection

use serde::{Deserialize, Serialize};

/// Thresholds and risk weights of the six checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CloneDetectionConfig {
    /// Platform descriptor mixed into hardware fingerprints.
    pub hardware_profile: String,

    pub hardware_mismatch_risk: f64,

    pub behavioral_cap: f64,
    pub behavioral_missing_risk: f64,
    pub min_touch_points: usize,
    pub min_pressure_variation: f64,
    pub min_swipes: usize,
    /// Valid swipe velocity, px/s.
    pub velocity_range: (f64, f64),
    /// Valid response time, ms.
    pub response_time_range: (f64, f64),

    /// Exclusive window for the gap since last activity, ms.
    pub activity_window_ms: (u64, u64),
    pub temporal_risk: f64,

    /// Exclusive window for session age, ms.
    pub session_window_ms: (u64, u64),
    pub session_risk: f64,

    pub entropy_band: (f64, f64),
    pub entropy_cap: f64,
    pub entropy_missing_risk: f64,

    pub proximity_risk: f64,

    /// Confidence above which a verdict is `is_cloned`.
    pub clone_threshold: f64,
}

impl Default for CloneDetectionConfig {
    fn default() -> Self {
        Self {
            hardware_profile: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            hardware_mismatch_risk: 30.0,
            behavioral_cap: 40.0,
            behavioral_missing_risk: 25.0,
            min_touch_points: 3,
            min_pressure_variation: 0.05,
            min_swipes: 2,
            velocity_range: (50.0, 3000.0),
            response_time_range: (50.0, 5000.0),
            activity_window_ms: (3_600, 24 * 60 * 60 * 1000),
            temporal_risk: 20.0,
            session_window_ms: (1_000, 60 * 60 * 1000),
            session_risk: 15.0,
            entropy_band: (0.3, 0.8),
            entropy_cap: 30.0,
            entropy_missing_risk: 20.0,
            proximity_risk: 10.0,
            clone_threshold: 60.0,
        }
    }
}
