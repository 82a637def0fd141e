//! # Artifact Properties
//!
//! Properties every sealed artifact must satisfy regardless of content:
//!
//! - transactions and messages verify against their own public key right
//!   after creation
//! - encrypted message content decrypts back to the plaintext
//! - mutating any transaction hash breaks the chain
//! - block creation returns `None` exactly when nothing is pending
//! - trust and clone-resistance scores stay within `[0, 100]`

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aio_01_identity::DeviceIdentity;
    use aio_02_entropy::{shannon_entropy, EntropyAnalyzer};
    use aio_03_clone_detection::{CloneDetectionConfig, CloneDetector};
    use aio_04_trust_engine::{TrustConfig, TrustEngine};
    use aio_05_transaction_ledger::{
        verify_transaction, TransactionChain, TransactionLedger, TRANSACTION_DIFFICULTY,
    };
    use aio_06_message_chain::{
        verify_secure_message, MessageBlockchain, MessageChainConfig, MessageType,
    };
    use proptest::prelude::*;
    use shared_crypto::ProofOfWork;
    use shared_types::{
        InteractionData, ManualTimeSource, ProximityData, SwipeGesture, TimeSource, TimingData,
        TouchPoint,
    };

    use crate::fixtures::human_interaction;

    const START: u64 = 1_700_000_000_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn time() -> Arc<dyn TimeSource> {
        Arc::new(ManualTimeSource::new(START))
    }

    fn trust_engine(time: &Arc<dyn TimeSource>) -> Arc<TrustEngine> {
        let detector = Arc::new(CloneDetector::new(
            CloneDetectionConfig::default(),
            Arc::clone(time),
        ));
        Arc::new(TrustEngine::new(
            TrustConfig::default(),
            detector,
            Arc::clone(time),
        ))
    }

    fn ledger() -> TransactionLedger {
        TransactionLedger::new(
            Arc::new(DeviceIdentity::create()),
            ProofOfWork::new(TRANSACTION_DIFFICULTY, 10_000_000),
            time(),
        )
    }

    fn message_chain() -> MessageBlockchain {
        let time = time();
        MessageBlockchain::new(
            MessageChainConfig::default(),
            Arc::new(DeviceIdentity::create()),
            EntropyAnalyzer::default(),
            trust_engine(&time),
            time,
        )
    }

    // =============================================================================
    // TRANSACTIONS
    // =============================================================================

    #[test]
    fn test_transactions_verify_against_own_key() {
        let ledger = ledger();
        for (amount, item) in [(0.0, "Free sample"), (4.5, "Espresso"), (1e6, "Car")] {
            let tx = ledger
                .create_secure_transaction(amount, item, Some("device-shop"), None)
                .unwrap();
            assert!(verify_transaction(&tx, &tx.public_key, TRANSACTION_DIFFICULTY));
        }
    }

    #[test]
    fn test_mutating_any_hash_breaks_chain() {
        let ledger = ledger();
        for item in ["A", "B", "C", "D"] {
            ledger.create_and_append(1.0, item, None, None).unwrap();
        }
        let txs: Vec<_> = ledger.snapshot().iter().cloned().collect();
        assert!(ledger.verify_chain());

        for index in 0..txs.len() {
            let mut tampered = txs.clone();
            tampered[index].hash = "0".repeat(64);
            let chain = TransactionChain::from_transactions(TRANSACTION_DIFFICULTY, tampered);
            assert!(!chain.verify_chain(), "mutation at {index} went unnoticed");
        }
    }

    // =============================================================================
    // MESSAGES AND BLOCKS
    // =============================================================================

    #[test]
    fn test_messages_verify_and_decrypt() {
        let chain = message_chain();
        let difficulty = chain.config().message_difficulty;

        let plain = chain
            .create_secure_message("device-peer", "hello", MessageType::Text, None, None)
            .unwrap();
        assert!(verify_secure_message(&plain, &plain.public_key, difficulty));
        assert!(!plain.encrypted);
        assert_eq!(plain.content, "hello");

        let sealed = chain
            .create_secure_message(
                "device-peer",
                "pay 4.50 for espresso",
                MessageType::PaymentRequest,
                Some("pair-secret"),
                Some(&human_interaction()),
            )
            .unwrap();
        assert!(verify_secure_message(&sealed, &sealed.public_key, difficulty));
        assert!(sealed.encrypted);
        assert_ne!(sealed.content, "pay 4.50 for espresso");
        assert_eq!(
            sealed.decrypt_content("pair-secret").unwrap(),
            "pay 4.50 for espresso"
        );
        assert!(sealed.decrypt_content("wrong-secret").is_err());
    }

    #[test]
    fn test_block_only_when_messages_pending() {
        let chain = message_chain();
        assert!(chain.create_message_block().unwrap().is_none());

        chain
            .create_secure_message("device-peer", "one", MessageType::Text, None, None)
            .unwrap();
        assert!(chain.create_message_block().unwrap().is_some());
        assert!(chain.pending_messages().is_empty());
        assert!(chain.verify_message_blockchain());

        assert!(chain.create_message_block().unwrap().is_none());
        assert!(chain.verify_message_blockchain());
    }

    // =============================================================================
    // SCORING
    // =============================================================================

    #[test]
    fn test_degenerate_samples_have_zero_entropy() {
        assert_eq!(shannon_entropy(&[]), 0.0);
        assert_eq!(shannon_entropy(&[5.0, 5.0, 5.0]), 0.0);
    }

    fn arbitrary_interaction() -> impl Strategy<Value = InteractionData> {
        let touch = (
            proptest::num::f64::ANY,
            proptest::num::f64::ANY,
            proptest::num::f64::ANY,
        )
            .prop_map(|(x, y, pressure)| TouchPoint {
                x,
                y,
                pressure,
                timestamp: 0.0,
            });
        let swipe = (proptest::num::f64::ANY, proptest::num::f64::ANY).prop_map(
            |(duration, velocity)| SwipeGesture {
                start_x: 0.0,
                start_y: 0.0,
                end_x: velocity,
                end_y: duration,
                duration,
                velocity,
            },
        );
        let timing = proptest::option::of(
            (proptest::num::f64::ANY, proptest::num::f64::ANY).prop_map(|(response, rhythm)| {
                TimingData {
                    response_time: response,
                    interaction_delay: response,
                    session_duration: response,
                    pattern_consistency: rhythm,
                }
            }),
        );
        let proximity = proptest::option::of(
            (proptest::num::f64::ANY, proptest::num::f64::ANY).prop_map(|(signal, distance)| {
                ProximityData {
                    signal_strength: signal,
                    distance,
                    angle: 0.0,
                    interference: distance,
                }
            }),
        );
        (
            proptest::collection::vec(touch, 0..8),
            proptest::collection::vec(swipe, 0..4),
            timing,
            proximity,
        )
            .prop_map(|(touch_points, swipe_gestures, timing, proximity)| InteractionData {
                touch_points,
                swipe_gestures,
                timing,
                proximity,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_trust_scores_stay_in_bounds(data in arbitrary_interaction()) {
            let time = time();
            let engine = trust_engine(&time);
            for _ in 0..2 {
                let score = engine.trust_score("device-new", Some(&data));
                prop_assert!((0.0..=100.0).contains(&score.overall_score));
                prop_assert!((0.0..=100.0).contains(&score.clone_resistance_score));
            }
            let silent = engine.trust_score("device-silent", None);
            prop_assert!((0.0..=100.0).contains(&silent.overall_score));
        }
    }
}
