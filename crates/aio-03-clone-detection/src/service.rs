//! Clone detector service.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use serde_json::json;
use shared_crypto::{hash_canonical, random_hex, sha256_hex};
use shared_types::{
    stats::clamp_score, DeviceId, HashHex, InteractionData, TimeSource, Timestamp,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CloneDetectionConfig;
use crate::domain::{
    checks, resistance, AntiCloningReport, CheckOutcome, CloneVerdict, DetectionMethod,
    ProtectionMeasure,
};

/// What the detector remembers about a device between calls.
#[derive(Debug, Clone, Default)]
struct DeviceRecord {
    hardware_fingerprint: Option<String>,
    last_activity: Option<Timestamp>,
    session_started: Option<Timestamp>,
}

/// Runs the six checks against per-device history.
pub struct CloneDetector {
    detector_id: String,
    config: CloneDetectionConfig,
    records: RwLock<HashMap<DeviceId, DeviceRecord>>,
    time: Arc<dyn TimeSource>,
}

impl CloneDetector {
    pub fn new(config: CloneDetectionConfig, time: Arc<dyn TimeSource>) -> Self {
        let detector_id = Uuid::new_v4().to_string();
        info!(detector_id = %detector_id, "Clone detector initialized");
        Self {
            detector_id,
            config,
            records: RwLock::new(HashMap::new()),
            time,
        }
    }

    pub fn detector_id(&self) -> &str {
        &self.detector_id
    }

    pub fn config(&self) -> &CloneDetectionConfig {
        &self.config
    }

    /// Fingerprint this host would produce for `device_id`.
    pub fn hardware_fingerprint(&self, device_id: &str) -> HashHex {
        sha256_hex(format!("{device_id}|{}", self.config.hardware_profile))
    }

    /// Pin the hardware fingerprint on record for a device.
    pub fn register_hardware_fingerprint(&self, device_id: &str, fingerprint: impl Into<String>) {
        self.records
            .write()
            .entry(device_id.to_string())
            .or_default()
            .hardware_fingerprint = Some(fingerprint.into());
    }

    /// Bind a session for a device starting now.
    pub fn start_session(&self, device_id: &str) {
        let now = self.time.now();
        self.records
            .write()
            .entry(device_id.to_string())
            .or_default()
            .session_started = Some(now);
    }

    /// Run all checks, record the activity, and fuse the result.
    pub fn detect_cloning_attempt(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> CloneVerdict {
        let outcomes = self.evaluate(device_id, interaction, true);
        let verdict = CloneVerdict::from_checks(&outcomes, self.config.clone_threshold);

        if verdict.is_cloned {
            warn!(
                device_id,
                confidence = verdict.confidence,
                risk = %verdict.risk_level,
                methods = ?verdict.detection_methods,
                "Cloning attempt detected"
            );
        } else {
            debug!(device_id, confidence = verdict.confidence, "Clone check passed");
        }
        verdict
    }

    /// Report which anti-cloning measures currently hold for a device.
    ///
    /// Read-only: device history is not updated.
    pub fn implement_anti_cloning_measures(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> AntiCloningReport {
        let outcomes = self.evaluate(device_id, interaction, false);
        let passed = |method: DetectionMethod| {
            outcomes
                .iter()
                .any(|o| o.method == method && o.passed())
        };

        let mut measures = Vec::new();
        if passed(DetectionMethod::HardwareFingerprintMismatch) {
            measures.push(ProtectionMeasure::HardwareBinding);
        }
        if passed(DetectionMethod::BehavioralPatternAnomaly) {
            measures.push(ProtectionMeasure::BehavioralBiometrics);
        }
        if passed(DetectionMethod::TemporalInconsistency) {
            measures.push(ProtectionMeasure::TemporalChallenges);
        }
        if passed(DetectionMethod::SessionBindingFailure) {
            measures.push(ProtectionMeasure::SessionIsolation);
        }
        if passed(DetectionMethod::EntropyPatternAnomaly) {
            measures.push(ProtectionMeasure::EntropyValidation);
        }
        let has_proximity = interaction.is_some_and(|d| d.proximity.is_some());
        if has_proximity && passed(DetectionMethod::ProximityEnvironmentMismatch) {
            measures.push(ProtectionMeasure::ProximityVerification);
        }
        measures.push(ProtectionMeasure::ContinuousMonitoring);

        AntiCloningReport::from_measures(measures)
    }

    /// Clone-resistance score in `[0, 100]`.
    pub fn calculate_clone_resistance_score(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> f64 {
        let precise = format!(
            "{}{:06}",
            self.time.now(),
            rand::thread_rng().gen_range(0..1_000_000u32)
        );
        let session_id = Uuid::new_v4().simple().to_string();

        let score = resistance::blend([
            resistance::hardware_uniqueness(device_id),
            resistance::behavioral_complexity(interaction),
            resistance::temporal_uniqueness(&precise),
            resistance::session_binding_strength(&session_id),
            resistance::entropy_randomness(interaction),
        ]);
        clamp_score(score)
    }

    /// Fresh per-call fingerprint binding device, detector, time and telemetry.
    pub fn generate_uniqueness_fingerprint(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> HashHex {
        let payload = json!({
            "deviceId": device_id,
            "detectorId": self.detector_id,
            "timestamp": self.time.now(),
            "nonce": random_hex(16),
            "interaction": interaction,
        });
        hash_canonical(&payload).unwrap_or_else(|_| sha256_hex(payload.to_string()))
    }

    /// Number of devices with any recorded history.
    pub fn tracked_devices(&self) -> usize {
        self.records.read().len()
    }

    /// Forget devices whose last activity or session start is older than
    /// `max_idle_ms` at `now`. Records with neither, such as a bare
    /// registered fingerprint, are kept. Returns how many were removed.
    pub fn cleanup_inactive_devices(&self, now: Timestamp, max_idle_ms: u64) -> usize {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| {
            record
                .last_activity
                .or(record.session_started)
                .map_or(true, |seen| now.saturating_sub(seen) <= max_idle_ms)
        });
        let removed = before - records.len();
        if removed > 0 {
            debug!(removed, remaining = records.len(), "inactive clone records purged");
        }
        removed
    }

    fn evaluate(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
        commit: bool,
    ) -> Vec<CheckOutcome> {
        let now = self.time.now();
        let fresh_fingerprint = self.hardware_fingerprint(device_id);

        let record = if commit {
            let mut records = self.records.write();
            let entry = records.entry(device_id.to_string()).or_default();
            let snapshot = DeviceRecord {
                session_started: Some(*entry.session_started.get_or_insert(now)),
                ..entry.clone()
            };
            entry
                .hardware_fingerprint
                .get_or_insert_with(|| fresh_fingerprint.clone());
            entry.last_activity = Some(now);
            snapshot
        } else {
            self.records.read().get(device_id).cloned().unwrap_or_default()
        };

        let c = &self.config;
        vec![
            checks::hardware_fingerprint(
                c,
                record.hardware_fingerprint.as_deref(),
                &fresh_fingerprint,
            ),
            checks::behavioral_pattern(c, interaction),
            checks::temporal_consistency(c, record.last_activity, now),
            checks::session_binding(c, record.session_started.unwrap_or(now), now),
            checks::entropy_pattern(c, interaction),
            checks::proximity_environment(c, interaction),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{ManualTimeSource, ProximityData, SwipeGesture, TimingData, TouchPoint};

    fn detector() -> (CloneDetector, Arc<ManualTimeSource>) {
        let time = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        (
            CloneDetector::new(CloneDetectionConfig::default(), time.clone()),
            time,
        )
    }

    fn robotic() -> InteractionData {
        let point = TouchPoint {
            x: 100.0,
            y: 100.0,
            pressure: 1.0,
            timestamp: 0.0,
        };
        InteractionData {
            touch_points: vec![point; 3],
            swipe_gestures: vec![],
            timing: Some(TimingData {
                response_time: 5.0,
                interaction_delay: 0.0,
                session_duration: 0.0,
                pattern_consistency: 1.0,
            }),
            proximity: None,
        }
    }

    fn natural() -> InteractionData {
        let xs = [100.0, 130.0, 165.0, 190.0, 230.0];
        let ys = [200.0, 210.0, 235.0, 250.0, 270.0];
        let pressures = [0.42, 0.48, 0.51, 0.57, 0.61];
        let touch_points = (0..5)
            .map(|i| TouchPoint {
                x: xs[i],
                y: ys[i],
                pressure: pressures[i],
                timestamp: 120.0 * i as f64,
            })
            .collect();
        let swipe = |velocity| SwipeGesture {
            start_x: 50.0,
            start_y: 300.0,
            end_x: 260.0,
            end_y: 340.0,
            duration: 280.0,
            velocity,
        };
        InteractionData {
            touch_points,
            swipe_gestures: vec![swipe(640.0), swipe(910.0)],
            timing: Some(TimingData {
                response_time: 250.0,
                interaction_delay: 180.0,
                session_duration: 45_000.0,
                pattern_consistency: 0.85,
            }),
            proximity: Some(ProximityData {
                signal_strength: -48.0,
                distance: 3.5,
                angle: 20.0,
                interference: 0.1,
            }),
        }
    }

    #[test]
    fn test_robotic_interaction_is_cloned() {
        let (detector, _) = detector();
        let verdict = detector.detect_cloning_attempt("AIONET_CLONE", Some(&robotic()));

        assert!(verdict.is_cloned);
        assert!(verdict.confidence > 60.0);
        assert!(matches!(
            verdict.risk_level,
            shared_types::RiskLevel::High | shared_types::RiskLevel::Critical
        ));
        assert!(verdict.detection_methods.contains(&DetectionMethod::BehavioralPatternAnomaly));
        assert!(verdict.detected(DetectionMethod::EntropyPatternAnomaly));
    }

    #[test]
    fn test_natural_interaction_is_not_cloned() {
        let (detector, _) = detector();
        let verdict = detector.detect_cloning_attempt("AIONET_HUMAN", Some(&natural()));

        assert!(!verdict.is_cloned);
        assert!(verdict.confidence < 50.0);
        assert!(!verdict.detected(DetectionMethod::BehavioralPatternAnomaly));
        assert!(!verdict.detected(DetectionMethod::EntropyPatternAnomaly));
    }

    #[test]
    fn test_absent_interaction_contributes_missing_data_risk() {
        let (detector, _) = detector();
        let verdict = detector.detect_cloning_attempt("AIONET_EMPTY", None);
        // behavioral 25 + entropy 20 + fresh session 15
        assert_eq!(verdict.confidence, 60.0);
        assert!(!verdict.is_cloned);
        assert_eq!(verdict.risk_level, shared_types::RiskLevel::High);
    }

    #[test]
    fn test_established_session_passes_binding() {
        let (detector, time) = detector();
        detector.start_session("AIONET_A");
        time.advance(10_000);

        let verdict = detector.detect_cloning_attempt("AIONET_A", Some(&natural()));
        assert!(!verdict.detected(DetectionMethod::SessionBindingFailure));
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn test_rapid_repeat_activity_is_temporal_inconsistency() {
        let (detector, time) = detector();
        detector.detect_cloning_attempt("AIONET_A", Some(&natural()));
        time.advance(500);

        let verdict = detector.detect_cloning_attempt("AIONET_A", Some(&natural()));
        assert!(verdict.detected(DetectionMethod::TemporalInconsistency));
    }

    #[test]
    fn test_hardware_mismatch_detected() {
        let (detector, _) = detector();
        detector.register_hardware_fingerprint("AIONET_A", "another-host");

        let verdict = detector.detect_cloning_attempt("AIONET_A", Some(&natural()));
        assert!(verdict.detected(DetectionMethod::HardwareFingerprintMismatch));
    }

    #[test]
    fn test_first_detection_records_hardware() {
        let (detector, _) = detector();
        detector.detect_cloning_attempt("AIONET_A", None);
        let verdict = detector.detect_cloning_attempt("AIONET_A", None);
        assert!(!verdict.detected(DetectionMethod::HardwareFingerprintMismatch));
        assert_eq!(detector.tracked_devices(), 1);
    }

    #[test]
    fn test_cleanup_inactive_devices() {
        let (detector, time) = detector();
        detector.detect_cloning_attempt("AIONET_OLD", None);
        detector.register_hardware_fingerprint("AIONET_PINNED", "host");
        time.advance(60_000);
        detector.start_session("AIONET_NEW");

        assert_eq!(detector.cleanup_inactive_devices(time.now(), 30_000), 1);
        assert_eq!(detector.tracked_devices(), 2);
        assert_eq!(detector.cleanup_inactive_devices(time.now(), 30_000), 0);
    }

    #[test]
    fn test_measures_do_not_touch_history() {
        let (detector, _) = detector();
        let report = detector.implement_anti_cloning_measures("AIONET_A", Some(&natural()));

        assert_eq!(detector.tracked_devices(), 0);
        assert!(report
            .active_measures
            .contains(&ProtectionMeasure::ContinuousMonitoring));
        assert!(report
            .active_measures
            .contains(&ProtectionMeasure::ProximityVerification));
        assert!(!report
            .active_measures
            .contains(&ProtectionMeasure::SessionIsolation));
    }

    #[test]
    fn test_measures_skip_proximity_without_data() {
        let (detector, _) = detector();
        let report = detector.implement_anti_cloning_measures("AIONET_A", None);
        assert!(!report
            .active_measures
            .contains(&ProtectionMeasure::ProximityVerification));
    }

    #[test]
    fn test_uniqueness_fingerprint_is_fresh() {
        let (detector, _) = detector();
        let a = detector.generate_uniqueness_fingerprint("AIONET_A", Some(&natural()));
        let b = detector.generate_uniqueness_fingerprint("AIONET_A", Some(&natural()));
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_richer_telemetry_resists_cloning_better() {
        let (detector, _) = detector();
        let rich = detector.calculate_clone_resistance_score("AIONET_A", Some(&natural()));
        let none = detector.calculate_clone_resistance_score("AIONET_A", None);
        assert!(rich > none);
    }

    proptest! {
        #[test]
        fn prop_resistance_score_in_bounds(
            xs in proptest::collection::vec(-1e9f64..1e9, 0..20),
            pressure in proptest::num::f64::ANY,
            velocity in proptest::num::f64::ANY,
        ) {
            let (detector, _) = detector();
            let data = InteractionData {
                touch_points: xs
                    .iter()
                    .map(|x| TouchPoint { x: *x, y: -x, pressure, timestamp: 0.0 })
                    .collect(),
                swipe_gestures: vec![SwipeGesture {
                    start_x: 0.0,
                    start_y: 0.0,
                    end_x: 1.0,
                    end_y: 1.0,
                    duration: 1.0,
                    velocity,
                }],
                timing: None,
                proximity: None,
            };
            let score = detector.calculate_clone_resistance_score("AIONET_P", Some(&data));
            prop_assert!((0.0..=100.0).contains(&score));

            let verdict = detector.detect_cloning_attempt("AIONET_P", Some(&data));
            prop_assert!((0.0..=100.0).contains(&verdict.confidence));
        }
    }
}
