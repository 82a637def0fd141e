//! # Domain Entities
//!
//! Interaction telemetry consumed by the AIONET core. Field names serialize in
//! camelCase so records produced by the UI layer deserialize unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::finite;

/// A single touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
    /// Normalized pressure, 0.0-1.0 on most devices.
    pub pressure: f64,
    /// Milliseconds since epoch.
    pub timestamp: f64,
}

impl TouchPoint {
    /// Euclidean distance to another touch point.
    pub fn distance_to(&self, other: &TouchPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A recorded swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeGesture {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    /// Milliseconds.
    pub duration: f64,
    /// Pixels per second.
    pub velocity: f64,
}

/// Timing characteristics of the current interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingData {
    /// Milliseconds between prompt and first input.
    pub response_time: f64,
    /// Milliseconds between consecutive inputs.
    pub interaction_delay: f64,
    /// Milliseconds since the session started.
    pub session_duration: f64,
    /// 0.0-1.0, how regular the user's rhythm is.
    pub pattern_consistency: f64,
}

/// NFC/radio proximity readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityData {
    /// dBm.
    pub signal_strength: f64,
    /// Centimetres.
    pub distance: f64,
    /// Degrees.
    pub angle: f64,
    /// 0.0-1.0.
    pub interference: f64,
}

/// Everything the UI/NFC layer knows about one interaction. All parts optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionData {
    pub touch_points: Vec<TouchPoint>,
    pub swipe_gestures: Vec<SwipeGesture>,
    pub timing: Option<TimingData>,
    pub proximity: Option<ProximityData>,
}

impl InteractionData {
    /// True when no channel carries any data.
    pub fn is_empty(&self) -> bool {
        self.touch_points.is_empty()
            && self.swipe_gestures.is_empty()
            && self.timing.is_none()
            && self.proximity.is_none()
    }

    /// Finite touch pressures.
    pub fn pressures(&self) -> Vec<f64> {
        finite(self.touch_points.iter().map(|p| p.pressure))
    }

    /// Finite x coordinates.
    pub fn xs(&self) -> Vec<f64> {
        finite(self.touch_points.iter().map(|p| p.x))
    }

    /// Finite y coordinates.
    pub fn ys(&self) -> Vec<f64> {
        finite(self.touch_points.iter().map(|p| p.y))
    }

    /// Finite swipe velocities.
    pub fn velocities(&self) -> Vec<f64> {
        finite(self.swipe_gestures.iter().map(|s| s.velocity))
    }

    /// Finite swipe durations.
    pub fn swipe_durations(&self) -> Vec<f64> {
        finite(self.swipe_gestures.iter().map(|s| s.duration))
    }

    /// Distances between consecutive touch points.
    pub fn movement_distances(&self) -> Vec<f64> {
        finite(
            self.touch_points
                .windows(2)
                .map(|pair| pair[0].distance_to(&pair[1])),
        )
    }

    /// Intervals between consecutive touch timestamps.
    pub fn touch_intervals(&self) -> Vec<f64> {
        finite(
            self.touch_points
                .windows(2)
                .map(|pair| pair[1].timestamp - pair[0].timestamp),
        )
    }
}

/// Four-step risk scale shared by entropy, trust and clone verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Lowercase label, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
