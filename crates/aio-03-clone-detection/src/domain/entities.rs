//! Clone detection entities.

use serde::{Deserialize, Serialize};
use shared_types::RiskLevel;
use std::fmt;

/// The six independent checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    HardwareFingerprintMismatch,
    BehavioralPatternAnomaly,
    TemporalInconsistency,
    SessionBindingFailure,
    EntropyPatternAnomaly,
    ProximityEnvironmentMismatch,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HardwareFingerprintMismatch => "hardware_fingerprint_mismatch",
            Self::BehavioralPatternAnomaly => "behavioral_pattern_anomaly",
            Self::TemporalInconsistency => "temporal_inconsistency",
            Self::SessionBindingFailure => "session_binding_failure",
            Self::EntropyPatternAnomaly => "entropy_pattern_anomaly",
            Self::ProximityEnvironmentMismatch => "proximity_environment_mismatch",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for DetectionMethod {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub method: DetectionMethod,
    /// Risk points, already capped for this check.
    pub risk: f64,
    /// Human-readable reasons for any risk.
    pub details: Vec<String>,
}

impl CheckOutcome {
    pub fn pass(method: DetectionMethod) -> Self {
        Self {
            method,
            risk: 0.0,
            details: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.risk <= 0.0
    }
}

/// Aggregated clone verdict. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneVerdict {
    pub is_cloned: bool,
    /// 0-100.
    pub confidence: f64,
    pub detection_methods: Vec<DetectionMethod>,
    pub risk_level: RiskLevel,
}

impl CloneVerdict {
    /// Fuse check outcomes into a verdict.
    pub fn from_checks(checks: &[CheckOutcome], clone_threshold: f64) -> Self {
        let total: f64 = checks.iter().map(|c| c.risk).sum();
        let confidence = total.clamp(0.0, 100.0);
        Self {
            is_cloned: confidence > clone_threshold,
            confidence,
            detection_methods: checks
                .iter()
                .filter(|c| !c.passed())
                .map(|c| c.method)
                .collect(),
            risk_level: verdict_risk(confidence),
        }
    }

    pub fn detected(&self, method: DetectionMethod) -> bool {
        self.detection_methods.contains(&method)
    }
}

fn verdict_risk(confidence: f64) -> RiskLevel {
    if confidence >= 70.0 {
        RiskLevel::Critical
    } else if confidence >= 50.0 {
        RiskLevel::High
    } else if confidence >= 30.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Anti-cloning measures and their effectiveness points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionMeasure {
    HardwareBinding,
    BehavioralBiometrics,
    TemporalChallenges,
    SessionIsolation,
    EntropyValidation,
    ProximityVerification,
    ContinuousMonitoring,
}

impl ProtectionMeasure {
    pub fn points(&self) -> u32 {
        match self {
            Self::HardwareBinding => 25,
            Self::BehavioralBiometrics => 20,
            Self::TemporalChallenges => 15,
            Self::SessionIsolation => 15,
            Self::EntropyValidation => 10,
            Self::ProximityVerification => 10,
            Self::ContinuousMonitoring => 5,
        }
    }
}

/// Overall protection tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectionLevel {
    Basic,
    Standard,
    Enhanced,
    Maximum,
}

impl ProtectionLevel {
    pub fn from_effectiveness(effectiveness: u32) -> Self {
        match effectiveness {
            90.. => Self::Maximum,
            75..=89 => Self::Enhanced,
            60..=74 => Self::Standard,
            _ => Self::Basic,
        }
    }
}

/// Which protections are active for a device right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiCloningReport {
    pub protection_level: ProtectionLevel,
    pub active_measures: Vec<ProtectionMeasure>,
    /// 0-100.
    pub effectiveness: u32,
}

impl AntiCloningReport {
    pub fn from_measures(active_measures: Vec<ProtectionMeasure>) -> Self {
        let effectiveness = active_measures.iter().map(|m| m.points()).sum::<u32>().min(100);
        Self {
            protection_level: ProtectionLevel::from_effectiveness(effectiveness),
            active_measures,
            effectiveness,
        }
    }
}
