//! Entropy analyzer service.

use shared_crypto::hash_canonical;
use shared_types::{stats::clamp_score, HashHex, InteractionData, RiskLevel};

use super::{
    shannon_entropy, AnomalyDetection, ChannelEntropy, EntropyChannel, EntropyChannels,
    EntropyFingerprint,
};
use crate::config::{ChannelBand, EntropyConfig};

const BASE_LIVENESS: f64 = 50.0;

/// Computes entropy fingerprints from interaction telemetry.
#[derive(Debug, Clone, Default)]
pub struct EntropyAnalyzer {
    config: EntropyConfig,
}

impl EntropyAnalyzer {
    pub fn new(config: EntropyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EntropyConfig {
        &self.config
    }

    /// Fingerprint one interaction sample. `None` is scored as silence.
    pub fn fingerprint(&self, interaction: Option<&InteractionData>) -> EntropyFingerprint {
        let empty = InteractionData::default();
        let data = interaction.unwrap_or(&empty);

        let channels = EntropyChannels {
            timing: self.channel(&self.config.timing, &timing_samples(data)),
            pressure: self.channel(&self.config.pressure, &data.pressures()),
            movement: self.channel(&self.config.movement, &data.movement_distances()),
            gesture: self.channel(&self.config.gesture, &gesture_samples(data)),
            session: self.channel(&self.config.session, &session_samples(data)),
        };

        let overall_entropy = self.overall(&channels);
        let liveness_score = self.liveness(overall_entropy, &channels);
        let anomaly_detection = self.detect_anomalies(overall_entropy, &channels);
        let validity_score = validity(liveness_score, &anomaly_detection);
        let fingerprint_hash = fingerprint_hash(&channels, overall_entropy);

        tracing::debug!(
            overall_entropy,
            liveness_score,
            risk = %anomaly_detection.risk_level,
            flags = anomaly_detection.flags.len(),
            "entropy fingerprint computed"
        );

        EntropyFingerprint {
            channels,
            overall_entropy,
            liveness_score,
            anomaly_detection,
            fingerprint_hash,
            validity_score,
        }
    }

    fn channel(&self, band: &ChannelBand, samples: &[f64]) -> ChannelEntropy {
        let entropy = shannon_entropy(samples);
        ChannelEntropy {
            entropy,
            expected_range: [band.min, band.max],
            deviation: band.deviation(entropy),
        }
    }

    fn band(&self, channel: EntropyChannel) -> &ChannelBand {
        match channel {
            EntropyChannel::Timing => &self.config.timing,
            EntropyChannel::Pressure => &self.config.pressure,
            EntropyChannel::Movement => &self.config.movement,
            EntropyChannel::Gesture => &self.config.gesture,
            EntropyChannel::Session => &self.config.session,
        }
    }

    fn overall(&self, channels: &EntropyChannels) -> f64 {
        channels
            .iter()
            .map(|(channel, c)| c.entropy * self.band(channel).weight)
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }

    fn liveness(&self, overall: f64, channels: &EntropyChannels) -> f64 {
        let mut score = BASE_LIVENESS;

        if (0.3..=0.8).contains(&overall) {
            score += 30.0;
        } else if !(0.2..=0.9).contains(&overall) {
            score -= 20.0;
        }

        let avg_deviation = channels.average_deviation();
        if avg_deviation < 1.0 {
            score += 20.0;
        } else if avg_deviation > 2.0 {
            score -= 15.0;
        }

        clamp_score(score)
    }

    fn detect_anomalies(&self, overall: f64, channels: &EntropyChannels) -> AnomalyDetection {
        let mut flags = Vec::new();

        if overall > self.config.too_high {
            flags.push("entropy_too_high".to_string());
        }
        if overall < self.config.too_low {
            flags.push("entropy_too_low".to_string());
        }
        for (channel, c) in channels.iter() {
            if c.deviation > self.config.deviation_flag_threshold {
                flags.push(channel.deviation_flag());
            }
        }

        let z_score = if self.config.baseline_std_dev > 0.0 {
            (overall - self.config.baseline_mean) / self.config.baseline_std_dev
        } else {
            0.0
        };
        let p_value = two_sided_p_value(z_score);
        let risk_level = anomaly_risk(z_score, flags.len());

        AnomalyDetection {
            z_score,
            p_value,
            risk_level,
            flags,
        }
    }
}

/// Touch intervals, or the timing record when there are too few touches.
fn timing_samples(data: &InteractionData) -> Vec<f64> {
    let intervals = data.touch_intervals();
    if intervals.len() >= 2 {
        return intervals;
    }
    data.timing
        .map(|t| vec![t.response_time, t.interaction_delay])
        .unwrap_or_default()
}

fn gesture_samples(data: &InteractionData) -> Vec<f64> {
    let mut samples = data.velocities();
    samples.extend(data.swipe_durations());
    samples
}

fn session_samples(data: &InteractionData) -> Vec<f64> {
    data.timing
        .map(|t| vec![t.session_duration, t.response_time, t.pattern_consistency])
        .unwrap_or_default()
}

fn anomaly_risk(z_score: f64, flag_count: usize) -> RiskLevel {
    let z = z_score.abs();
    if z > 3.0 || flag_count >= 4 {
        RiskLevel::Critical
    } else if z > 2.0 || flag_count >= 2 {
        RiskLevel::High
    } else if z > 1.0 || flag_count >= 1 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn validity(liveness: f64, anomalies: &AnomalyDetection) -> f64 {
    let flag_penalty = 1.0 - 0.15 * anomalies.flags.len().min(5) as f64;
    let significance = if anomalies.p_value < 0.05 { 0.8 } else { 1.0 };
    clamp_score(liveness * flag_penalty * significance)
}

fn fingerprint_hash(channels: &EntropyChannels, overall: f64) -> HashHex {
    let entropies: Vec<f64> = channels.iter().map(|(_, c)| c.entropy).collect();
    let payload = serde_json::json!({
        "channels": entropies,
        "overall": overall,
    });
    // Only finite f64s reach the payload, so canonicalization cannot fail.
    hash_canonical(&payload).unwrap_or_default()
}

/// Two-sided p-value for a standard normal z-score.
fn two_sided_p_value(z: f64) -> f64 {
    (1.0 - erf(z.abs() / std::f64::consts::SQRT_2)).clamp(0.0, 1.0)
}

/// Abramowitz & Stegun 7.1.26, max error 1.5e-7.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    sign * (1.0 - poly * (-x * x).exp())
}
