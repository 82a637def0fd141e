//! Trust engine service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use aio_03_clone_detection::CloneDetector;
use parking_lot::RwLock;
use shared_types::{stats::clamp_score, DeviceId, InteractionData, TimeSource, Timestamp};
use tracing::{debug, info};

use crate::config::TrustConfig;
use crate::domain::{
    components, entities::risk_level_for, AdaptiveWeights, ScoreHistory, TrustComponent,
    TrustScore,
};

const MS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone)]
struct DeviceTrustState {
    last_activity: Timestamp,
    interaction_count: u64,
    history: ScoreHistory,
}

/// Scores device interactions against per-device history.
pub struct TrustEngine {
    config: TrustConfig,
    clone_detector: Arc<CloneDetector>,
    weights: RwLock<AdaptiveWeights>,
    known_devices: RwLock<HashSet<DeviceId>>,
    devices: RwLock<HashMap<DeviceId, DeviceTrustState>>,
    time: Arc<dyn TimeSource>,
}

impl TrustEngine {
    pub fn new(
        config: TrustConfig,
        clone_detector: Arc<CloneDetector>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        info!("Trust engine initialized");
        Self {
            weights: RwLock::new(config.weights),
            config,
            clone_detector,
            known_devices: RwLock::new(HashSet::new()),
            devices: RwLock::new(HashMap::new()),
            time,
        }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Add a device to the known-device registry.
    pub fn register_known_device(&self, device_id: impl Into<DeviceId>) {
        let device_id = device_id.into();
        debug!(device_id = %device_id, "Registered known device");
        self.known_devices.write().insert(device_id);
    }

    pub fn is_known_device(&self, device_id: &str) -> bool {
        self.known_devices.read().contains(device_id)
    }

    pub fn known_device_count(&self) -> usize {
        self.known_devices.read().len()
    }

    pub fn adaptive_weights(&self) -> AdaptiveWeights {
        *self.weights.read()
    }

    /// Scores recorded for a device, oldest first.
    pub fn score_history(&self, device_id: &str) -> Vec<f64> {
        self.devices
            .read()
            .get(device_id)
            .map(|s| s.history.scores())
            .unwrap_or_default()
    }

    /// Score one interaction and record it in the device's history.
    pub fn trust_score(&self, device_id: &str, interaction: Option<&InteractionData>) -> TrustScore {
        let now = self.time.now();
        let weights = self.adaptive_weights();
        let known = self.is_known_device(device_id);

        let previous = self.devices.read().get(device_id).cloned();
        let interaction_count = previous.as_ref().map_or(0, |s| s.interaction_count);
        let last_activity = previous.as_ref().map(|s| s.last_activity);
        let history = previous
            .map(|s| s.history)
            .unwrap_or_else(|| ScoreHistory::new(self.config.history_capacity));

        let mut components = vec![
            components::device_reputation(
                known,
                interaction_count,
                self.config.known_device_base,
                self.config.unknown_device_base,
            ),
            components::interaction_quality(interaction),
            components::timing_consistency(interaction),
            components::behavioral_pattern(interaction),
            components::proximity_security(interaction),
        ];
        for component in &mut components {
            component.weight = weights.get(component.factor);
        }

        let rotation_factor = self.rotation_factor(last_activity, now);
        let overall_score = clamp_score(weighted_score(&components, &weights) * rotation_factor);

        let historical_trend = history.trend();
        let predictive_score = history.predict(overall_score, self.config.volatility_threshold);
        let anomaly_score = history.anomaly(overall_score);

        let score = TrustScore {
            overall_score,
            risk_level: risk_level_for(overall_score),
            components,
            rotation_factor,
            historical_trend,
            adaptive_weights: weights,
            predictive_score,
            anomaly_score,
            clone_resistance_score: self
                .clone_detector
                .calculate_clone_resistance_score(device_id, interaction),
            uniqueness_fingerprint: self
                .clone_detector
                .generate_uniqueness_fingerprint(device_id, interaction),
        };

        {
            let mut devices = self.devices.write();
            let state = devices
                .entry(device_id.to_string())
                .or_insert_with(|| DeviceTrustState {
                    last_activity: now,
                    interaction_count: 0,
                    history: ScoreHistory::new(self.config.history_capacity),
                });
            state.last_activity = now;
            state.interaction_count += 1;
            state.history.push(overall_score);
        }

        self.update_adaptive_weights(device_id, &score);
        debug!(
            device_id,
            overall = score.overall_score,
            risk = %score.risk_level,
            rotation = score.rotation_factor,
            "Trust score computed"
        );
        score
    }

    /// Drop scoring state of devices idle longer than `max_idle_ms` at `now`.
    /// Known devices keep their history. Returns how many were removed.
    pub fn cleanup_inactive_devices(&self, now: Timestamp, max_idle_ms: u64) -> usize {
        let known = self.known_devices.read();
        let mut devices = self.devices.write();
        let before = devices.len();
        devices.retain(|device_id, state| {
            known.contains(device_id) || now.saturating_sub(state.last_activity) <= max_idle_ms
        });
        let removed = before - devices.len();
        if removed > 0 {
            debug!(removed, remaining = devices.len(), "inactive trust state purged");
        }
        removed
    }

    /// Number of devices with scoring state.
    pub fn tracked_devices(&self) -> usize {
        self.devices.read().len()
    }

    /// Online-learning hook. Weights are reported, not changed.
    pub fn update_adaptive_weights(&self, device_id: &str, score: &TrustScore) {
        debug!(
            device_id,
            weights = ?score.adaptive_weights,
            anomaly = score.anomaly_score,
            "Adaptive weights unchanged"
        );
    }

    /// Decay with inactivity, bonus for very recent activity.
    ///
    /// A device with no recorded activity gets 1.0.
    pub fn rotation_factor(&self, last_activity: Option<Timestamp>, now: Timestamp) -> f64 {
        let Some(last) = last_activity else {
            return 1.0;
        };
        let idle = now.saturating_sub(last);
        let hours = idle as f64 / MS_PER_HOUR;
        let mut factor = 1.0 - self.config.decay_per_hour * hours;
        if idle < self.config.recent_activity_ms {
            factor += 0.1;
        }
        factor.clamp(0.3, 1.2)
    }
}

/// Weight-normalized component sum.
fn weighted_score(components: &[TrustComponent], weights: &AdaptiveWeights) -> f64 {
    let total = weights.total();
    if total <= 0.0 || !total.is_finite() {
        let n = components.len().max(1) as f64;
        return components.iter().map(|c| c.score).sum::<f64>() / n;
    }
    components
        .iter()
        .map(|c| c.score * weights.get(c.factor))
        .sum::<f64>()
        / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrustFactor;
    use aio_03_clone_detection::CloneDetectionConfig;
    use proptest::prelude::*;
    use shared_types::{ManualTimeSource, ProximityData, SwipeGesture, TimingData, TouchPoint};

    fn engine() -> (TrustEngine, Arc<ManualTimeSource>) {
        let time = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let detector = Arc::new(CloneDetector::new(
            CloneDetectionConfig::default(),
            time.clone(),
        ));
        (
            TrustEngine::new(TrustConfig::default(), detector, time.clone()),
            time,
        )
    }

    fn natural() -> InteractionData {
        InteractionData {
            touch_points: (0..5)
                .map(|i| TouchPoint {
                    x: 100.0 + 30.0 * i as f64,
                    y: 200.0 + 15.0 * i as f64,
                    pressure: 0.3 + 0.1 * i as f64,
                    timestamp: 120.0 * i as f64,
                })
                .collect(),
            swipe_gestures: vec![SwipeGesture {
                start_x: 0.0,
                start_y: 0.0,
                end_x: 200.0,
                end_y: 40.0,
                duration: 250.0,
                velocity: 800.0,
            }],
            timing: Some(TimingData {
                response_time: 250.0,
                interaction_delay: 120.0,
                session_duration: 60_000.0,
                pattern_consistency: 0.85,
            }),
            proximity: Some(ProximityData {
                signal_strength: -45.0,
                distance: 3.0,
                angle: 12.0,
                interference: 0.1,
            }),
        }
    }

    #[test]
    fn test_known_device_scores_higher() {
        let (engine, _) = engine();
        engine.register_known_device("AIONET_KNOWN");

        let known = engine.trust_score("AIONET_KNOWN", Some(&natural()));
        let unknown = engine.trust_score("AIONET_OTHER", Some(&natural()));

        assert_eq!(known.component_score(TrustFactor::DeviceReputation), 85.0);
        assert_eq!(unknown.component_score(TrustFactor::DeviceReputation), 45.0);
        assert!(known.overall_score > unknown.overall_score);
    }

    #[test]
    fn test_natural_known_interaction_is_low_risk() {
        let (engine, _) = engine();
        engine.register_known_device("AIONET_KNOWN");
        let score = engine.trust_score("AIONET_KNOWN", Some(&natural()));

        // 85*.25 + 90*.2 + 90*.2 + 90*.2 + 100*.15 = 90.25
        assert!((score.overall_score - 90.25).abs() < 1e-9);
        assert_eq!(score.rotation_factor, 1.0);
        assert_eq!(score.risk_level, shared_types::RiskLevel::Low);
        assert_eq!(score.components.len(), 5);
        assert_eq!(score.uniqueness_fingerprint.len(), 64);
    }

    #[test]
    fn test_absent_interaction_is_critical_for_unknown_device() {
        let (engine, _) = engine();
        let score = engine.trust_score("AIONET_NONE", None);
        // 45*.25 + 25*.2 + 20*.2 + 25*.2 + 40*.15 = 31.25
        assert!((score.overall_score - 31.25).abs() < 1e-9);
        assert_eq!(score.risk_level, shared_types::RiskLevel::Critical);
    }

    #[test]
    fn test_rotation_factor() {
        let (engine, _) = engine();
        assert_eq!(engine.rotation_factor(None, 1_000), 1.0);
        assert!((engine.rotation_factor(Some(0), 60_000) - 1.1).abs() < 1e-3);
        assert!((engine.rotation_factor(Some(0), 10 * 3_600_000) - 0.9).abs() < 1e-9);
        assert_eq!(engine.rotation_factor(Some(0), 1_000 * 3_600_000), 0.3);
    }

    #[test]
    fn test_recent_activity_boost_and_idle_decay() {
        let (engine, time) = engine();
        let first = engine.trust_score("AIONET_A", None);
        time.advance(1_000);
        let second = engine.trust_score("AIONET_A", None);
        assert!(second.rotation_factor > 1.0);
        assert!(second.overall_score > first.overall_score);

        time.advance(48 * 3_600_000);
        let third = engine.trust_score("AIONET_A", None);
        assert!(third.rotation_factor < 1.0);
    }

    #[test]
    fn test_cleanup_inactive_devices_keeps_known() {
        let (engine, time) = engine();
        engine.register_known_device("AIONET_KNOWN");
        engine.trust_score("AIONET_KNOWN", None);
        engine.trust_score("AIONET_STALE", None);
        time.advance(2 * 3_600_000);
        engine.trust_score("AIONET_FRESH", None);

        assert_eq!(engine.cleanup_inactive_devices(time.now(), 3_600_000), 1);
        assert_eq!(engine.tracked_devices(), 2);
        assert!(engine.score_history("AIONET_STALE").is_empty());
        assert_eq!(engine.score_history("AIONET_KNOWN").len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let (engine, time) = engine();
        for _ in 0..60 {
            time.advance(10_000);
            engine.trust_score("AIONET_A", None);
        }
        assert_eq!(engine.score_history("AIONET_A").len(), 50);
    }

    #[test]
    fn test_frequent_device_gains_reputation() {
        let (engine, time) = engine();
        let mut last = None;
        for _ in 0..12 {
            time.advance(10_000);
            last = Some(engine.trust_score("AIONET_A", None));
        }
        let last = last.unwrap();
        assert_eq!(last.component_score(TrustFactor::DeviceReputation), 50.0);
    }

    #[test]
    fn test_adaptive_weights_hook_is_neutral() {
        let (engine, _) = engine();
        let before = engine.adaptive_weights();
        engine.trust_score("AIONET_A", Some(&natural()));
        assert_eq!(engine.adaptive_weights(), before);
    }

    proptest! {
        #[test]
        fn prop_scores_stay_in_bounds(
            x in proptest::num::f64::ANY,
            pressure in proptest::num::f64::ANY,
            response in proptest::num::f64::ANY,
            signal in proptest::num::f64::ANY,
            distance in proptest::num::f64::ANY,
            touches in 0usize..8,
        ) {
            let (engine, _) = engine();
            let data = InteractionData {
                touch_points: (0..touches)
                    .map(|i| TouchPoint { x: x * i as f64, y: x, pressure, timestamp: 0.0 })
                    .collect(),
                swipe_gestures: vec![],
                timing: Some(TimingData {
                    response_time: response,
                    interaction_delay: response,
                    session_duration: response,
                    pattern_consistency: pressure,
                }),
                proximity: Some(ProximityData {
                    signal_strength: signal,
                    distance,
                    angle: 0.0,
                    interference: pressure,
                }),
            };
            for _ in 0..2 {
                let score = engine.trust_score("AIONET_P", Some(&data));
                prop_assert!((0.0..=100.0).contains(&score.overall_score));
                prop_assert!((0.0..=100.0).contains(&score.clone_resistance_score));
                prop_assert!((0.0..=100.0).contains(&score.predictive_score));
                prop_assert!((0.0..=100.0).contains(&score.anomaly_score));
                prop_assert!((0.3..=1.2).contains(&score.rotation_factor));
            }
        }
    }
}
