//! Trust scoring entities.

use serde::{Deserialize, Serialize};
use shared_types::{HashHex, RiskLevel};
use std::fmt;

/// The five scored components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrustFactor {
    DeviceReputation,
    InteractionQuality,
    TimingConsistency,
    BehavioralPattern,
    ProximitySecurity,
}

impl TrustFactor {
    pub const ALL: [TrustFactor; 5] = [
        TrustFactor::DeviceReputation,
        TrustFactor::InteractionQuality,
        TrustFactor::TimingConsistency,
        TrustFactor::BehavioralPattern,
        TrustFactor::ProximitySecurity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceReputation => "deviceReputation",
            Self::InteractionQuality => "interactionQuality",
            Self::TimingConsistency => "timingConsistency",
            Self::BehavioralPattern => "behavioralPattern",
            Self::ProximitySecurity => "proximitySecurity",
        }
    }
}

impl fmt::Display for TrustFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored component with the reasons behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustComponent {
    pub factor: TrustFactor,
    /// 0-100.
    pub score: f64,
    pub weight: f64,
    pub evidence: Vec<String>,
    pub risk_factors: Vec<String>,
}

/// Component weights. Normalized by their sum when combined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveWeights {
    pub device_reputation: f64,
    pub interaction_quality: f64,
    pub timing_consistency: f64,
    pub behavioral_pattern: f64,
    pub proximity_security: f64,
}

impl Default for AdaptiveWeights {
    fn default() -> Self {
        Self {
            device_reputation: 0.25,
            interaction_quality: 0.20,
            timing_consistency: 0.20,
            behavioral_pattern: 0.20,
            proximity_security: 0.15,
        }
    }
}

impl AdaptiveWeights {
    pub fn get(&self, factor: TrustFactor) -> f64 {
        match factor {
            TrustFactor::DeviceReputation => self.device_reputation,
            TrustFactor::InteractionQuality => self.interaction_quality,
            TrustFactor::TimingConsistency => self.timing_consistency,
            TrustFactor::BehavioralPattern => self.behavioral_pattern,
            TrustFactor::ProximitySecurity => self.proximity_security,
        }
    }

    pub fn total(&self) -> f64 {
        TrustFactor::ALL.iter().map(|f| self.get(*f)).sum()
    }
}

/// Direction of a device's recent scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Summary of a device's score history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTrend {
    pub trend: TrendDirection,
    /// Standard deviation of the retained scores.
    pub volatility: f64,
    /// `1 - coefficient of variation`, clamped to `[0, 1]`.
    pub consistency: f64,
    pub mean: f64,
    pub samples: usize,
}

impl Default for HistoricalTrend {
    fn default() -> Self {
        Self {
            trend: TrendDirection::Stable,
            volatility: 0.0,
            consistency: 1.0,
            mean: 0.0,
            samples: 0,
        }
    }
}

/// Result of scoring one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScore {
    /// 0-100.
    pub overall_score: f64,
    pub components: Vec<TrustComponent>,
    pub risk_level: RiskLevel,
    /// In `[0.3, 1.2]`.
    pub rotation_factor: f64,
    pub historical_trend: HistoricalTrend,
    pub adaptive_weights: AdaptiveWeights,
    pub predictive_score: f64,
    pub anomaly_score: f64,
    /// 0-100.
    pub clone_resistance_score: f64,
    pub uniqueness_fingerprint: HashHex,
}

impl TrustScore {
    pub fn component(&self, factor: TrustFactor) -> Option<&TrustComponent> {
        self.components.iter().find(|c| c.factor == factor)
    }

    /// Score of a single component, 0 if absent.
    pub fn component_score(&self, factor: TrustFactor) -> f64 {
        self.component(factor).map_or(0.0, |c| c.score)
    }
}

/// Map an overall score to its risk level.
pub fn risk_level_for(score: f64) -> RiskLevel {
    if score >= 80.0 {
        RiskLevel::Low
    } else if score >= 60.0 {
        RiskLevel::Medium
    } else if score >= 40.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}
