//! Configuration types for trust scoring

use serde::{Deserialize, Serialize};

use crate::domain::AdaptiveWeights;

/// Trust engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Initial component weights.
    pub weights: AdaptiveWeights,
    /// Reputation base for a device in the known-device registry.
    pub known_device_base: f64,
    /// Reputation base for any other device.
    pub unknown_device_base: f64,
    /// Maximum scores retained per device.
    pub history_capacity: usize,
    /// Activity this recent earns the rotation bonus, ms.
    pub recent_activity_ms: u64,
    /// Rotation factor lost per hour of inactivity.
    pub decay_per_hour: f64,
    /// Volatility above which predictions regress to the historical mean.
    pub volatility_threshold: f64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            weights: AdaptiveWeights::default(),
            known_device_base: 85.0,
            unknown_device_base: 45.0,
            history_capacity: 50,
            recent_activity_ms: 5 * 60 * 1000,
            decay_per_hour: 0.01,
            volatility_threshold: 15.0,
        }
    }
}
