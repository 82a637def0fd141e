//! Entropy fingerprint entities.

use serde::{Deserialize, Serialize};
use shared_types::{HashHex, RiskLevel};
use std::fmt;

/// The five telemetry channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyChannel {
    Timing,
    Pressure,
    Movement,
    Gesture,
    Session,
}

impl EntropyChannel {
    pub const ALL: [EntropyChannel; 5] = [
        EntropyChannel::Timing,
        EntropyChannel::Pressure,
        EntropyChannel::Movement,
        EntropyChannel::Gesture,
        EntropyChannel::Session,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntropyChannel::Timing => "timing",
            EntropyChannel::Pressure => "pressure",
            EntropyChannel::Movement => "movement",
            EntropyChannel::Gesture => "gesture",
            EntropyChannel::Session => "session",
        }
    }

    /// Anomaly flag raised when this channel deviates too far.
    pub fn deviation_flag(&self) -> String {
        format!("{}_deviation", self.as_str())
    }
}

impl fmt::Display for EntropyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entropy of one channel and how far it sits from its expected band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEntropy {
    pub entropy: f64,
    /// `[min, max]`
    pub expected_range: [f64; 2],
    pub deviation: f64,
}

/// Per-channel results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropyChannels {
    pub timing: ChannelEntropy,
    pub pressure: ChannelEntropy,
    pub movement: ChannelEntropy,
    pub gesture: ChannelEntropy,
    pub session: ChannelEntropy,
}

impl EntropyChannels {
    pub fn get(&self, channel: EntropyChannel) -> &ChannelEntropy {
        match channel {
            EntropyChannel::Timing => &self.timing,
            EntropyChannel::Pressure => &self.pressure,
            EntropyChannel::Movement => &self.movement,
            EntropyChannel::Gesture => &self.gesture,
            EntropyChannel::Session => &self.session,
        }
    }

    /// Channels in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (EntropyChannel, &ChannelEntropy)> {
        EntropyChannel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn average_deviation(&self) -> f64 {
        self.iter().map(|(_, c)| c.deviation).sum::<f64>() / EntropyChannel::ALL.len() as f64
    }
}

/// Statistical verdict on the overall entropy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyDetection {
    pub z_score: f64,
    /// Two-sided p-value of `z_score` under a normal baseline.
    pub p_value: f64,
    pub risk_level: RiskLevel,
    pub flags: Vec<String>,
}

/// Liveness summary of one interaction sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropyFingerprint {
    pub channels: EntropyChannels,
    pub overall_entropy: f64,
    /// 0-100.
    pub liveness_score: f64,
    pub anomaly_detection: AnomalyDetection,
    pub fingerprint_hash: HashHex,
    /// 0-100. Liveness discounted by anomalies.
    pub validity_score: f64,
}

impl EntropyFingerprint {
    /// True when no anomaly flag was raised.
    pub fn is_clean(&self) -> bool {
        self.anomaly_detection.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(entropy: f64, deviation: f64) -> ChannelEntropy {
        ChannelEntropy {
            entropy,
            expected_range: [0.0, 1.0],
            deviation,
        }
    }

    #[test]
    fn test_channel_iteration_order() {
        let channels = EntropyChannels {
            timing: channel(0.1, 1.0),
            pressure: channel(0.2, 2.0),
            movement: channel(0.3, 3.0),
            gesture: channel(0.4, 4.0),
            session: channel(0.5, 5.0),
        };
        let order: Vec<_> = channels.iter().map(|(c, _)| c).collect();
        assert_eq!(order, EntropyChannel::ALL.to_vec());
        assert_eq!(channels.average_deviation(), 3.0);
        assert_eq!(channels.get(EntropyChannel::Gesture).entropy, 0.4);
    }

    #[test]
    fn test_deviation_flag_name() {
        assert_eq!(EntropyChannel::Pressure.deviation_flag(), "pressure_deviation");
    }
}
