//! # Human vs. Replayed Telemetry
//!
//! End-to-end scenarios across entropy, clone detection, trust scoring and
//! block sealing:
//!
//! 1. Replayed zero-variance touches are flagged as a clone
//! 2. Natural touches and swipes pass clone detection
//! 3. The trust engine ranks the natural sample above the replayed one
//! 4. A block sealed from two messages commits to both message hashes

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aio_01_identity::DeviceIdentity;
    use aio_02_entropy::EntropyAnalyzer;
    use aio_03_clone_detection::{CloneDetectionConfig, CloneDetector, DetectionMethod};
    use aio_04_trust_engine::{TrustConfig, TrustEngine};
    use aio_06_message_chain::{MessageBlockchain, MessageChainConfig, MessageType};
    use shared_crypto::merkle_root;
    use shared_types::{ManualTimeSource, RiskLevel, TimeSource, ZERO_HASH};

    use crate::fixtures::{human_interaction, robotic_interaction};

    fn subsystems() -> (Arc<CloneDetector>, Arc<TrustEngine>, Arc<dyn TimeSource>) {
        let time: Arc<dyn TimeSource> = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let detector = Arc::new(CloneDetector::new(
            CloneDetectionConfig::default(),
            Arc::clone(&time),
        ));
        let trust = Arc::new(TrustEngine::new(
            TrustConfig::default(),
            Arc::clone(&detector),
            Arc::clone(&time),
        ));
        (detector, trust, time)
    }

    #[test]
    fn test_replayed_touches_flagged_as_clone() {
        let (detector, _, _) = subsystems();
        let verdict = detector.detect_cloning_attempt("device-replay", Some(&robotic_interaction()));

        assert!(verdict.is_cloned);
        assert!(matches!(
            verdict.risk_level,
            RiskLevel::High | RiskLevel::Critical
        ));
        assert!(verdict.detected(DetectionMethod::BehavioralPatternAnomaly));

        let json = serde_json::to_value(&verdict.detection_methods).unwrap();
        assert!(json
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("behavioral_pattern_anomaly")));
    }

    #[test]
    fn test_natural_interaction_passes() {
        let (detector, _, _) = subsystems();
        let verdict = detector.detect_cloning_attempt("device-human", Some(&human_interaction()));

        assert!(!verdict.is_cloned);
        assert!(verdict.confidence < 50.0);
    }

    #[test]
    fn test_trust_prefers_natural_interaction() {
        let (_, trust, _) = subsystems();
        let human = trust.trust_score("device-human", Some(&human_interaction()));
        let replay = trust.trust_score("device-replay", Some(&robotic_interaction()));

        assert!(human.overall_score > replay.overall_score);
        assert!(human.risk_level <= replay.risk_level);
    }

    #[test]
    fn test_block_merkle_root_covers_both_messages() {
        let (_, trust, time) = subsystems();
        let chain = MessageBlockchain::new(
            MessageChainConfig::default(),
            Arc::new(DeviceIdentity::with_device_id("device-sender")),
            EntropyAnalyzer::default(),
            trust,
            time,
        );

        let first = chain
            .create_secure_message("device-peer", "first", MessageType::Text, None, None)
            .unwrap();
        let second = chain
            .create_secure_message(
                "device-peer",
                "second",
                MessageType::Receipt,
                None,
                Some(&human_interaction()),
            )
            .unwrap();

        let block = chain.create_message_block().unwrap().unwrap();
        assert_eq!(block.merkle_root, merkle_root(&[&first.hash, &second.hash]));
        assert_eq!(block.previous_block_hash, ZERO_HASH);
        assert_eq!(block.messages.len(), 2);
        assert!(chain.verify_message_blockchain());
    }
}
