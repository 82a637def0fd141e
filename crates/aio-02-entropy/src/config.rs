//! Configuration types for the entropy analyzer

use serde::{Deserialize, Serialize};

/// Expected entropy band and weight for one channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelBand {
    pub min: f64,
    pub max: f64,
    pub weight: f64,
}

impl ChannelBand {
    pub const fn new(min: f64, max: f64, weight: f64) -> Self {
        Self { min, max, weight }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Distance from the band midpoint in half-band units.
    pub fn deviation(&self, entropy: f64) -> f64 {
        let half_width = (self.max - self.min) / 2.0;
        if half_width <= 0.0 {
            return 0.0;
        }
        (entropy - self.midpoint()).abs() / half_width
    }
}

/// Runtime configuration for the entropy analyzer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntropyConfig {
    pub timing: ChannelBand,
    pub pressure: ChannelBand,
    pub movement: ChannelBand,
    pub gesture: ChannelBand,
    pub session: ChannelBand,

    /// Mean overall entropy of human interaction.
    pub baseline_mean: f64,
    /// Standard deviation of overall entropy of human interaction.
    pub baseline_std_dev: f64,

    /// Overall entropy above this is flagged `entropy_too_high`.
    pub too_high: f64,
    /// Overall entropy below this is flagged `entropy_too_low`.
    pub too_low: f64,
    /// Channel deviation above this is flagged `<channel>_deviation`.
    pub deviation_flag_threshold: f64,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            timing: ChannelBand::new(0.5, 0.8, 0.30),
            pressure: ChannelBand::new(0.4, 0.7, 0.25),
            movement: ChannelBand::new(0.5, 0.8, 0.20),
            gesture: ChannelBand::new(0.3, 0.6, 0.15),
            session: ChannelBand::new(0.2, 0.5, 0.10),
            baseline_mean: 0.55,
            baseline_std_dev: 0.15,
            too_high: 0.95,
            too_low: 0.1,
            deviation_flag_threshold: 3.0,
        }
    }
}
