//! # Security Manager Flows
//!
//! Two devices, each with its own `SecurityManager`, exercising the full
//! control flow:
//!
//! ```text
//! pair ──→ score telemetry ──→ clone gate ──→ seal transaction ──→ receipt
//!                                        └──→ seal message ──→ seal block
//! ```
//!
//! Artifacts sealed on one device are verified on the other.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use aio_01_identity::DeviceIdentity;
    use aio_03_clone_detection::ProtectionMeasure;
    use aio_06_message_chain::{MessageRequest, MessageType};
    use aionet_runtime::{AionetConfig, RuntimeError, SecurityManager};
    use shared_types::ManualTimeSource;

    use crate::fixtures::{human_interaction, robotic_interaction};

    fn device(name: &str, time: &Arc<ManualTimeSource>) -> SecurityManager {
        SecurityManager::with_identity(
            AionetConfig::default(),
            DeviceIdentity::with_device_id(name),
            time.clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_payment_flow_between_paired_devices() {
        let time = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let alice = device("device-alice", &time);
        let bob = device("device-bob", &time);

        let pair = alice.establish_pair(bob.device_id(), bob.public_key());
        assert_eq!(pair.device_b, "device-bob");
        assert!(alice.trust_engine().is_known_device("device-bob"));

        let verdict = alice.detect_cloning_attempt("device-bob", Some(&human_interaction()));
        assert!(!verdict.is_cloned);

        let tx = alice
            .create_secure_transaction(4.50, "Espresso", Some("device-bob"))
            .unwrap();
        assert!(bob.verify_transaction(&tx, alice.public_key()));
        assert!(!bob.verify_transaction(&tx, bob.public_key()));

        let receipt = alice.generate_secure_receipt(&tx);
        for needle in [tx.id.as_str(), "Espresso", "4.50", "device-alice", "AIONET v1.2"] {
            assert!(receipt.contains(needle), "receipt missing {needle}");
        }

        let msg = alice
            .create_secure_message(
                "device-bob",
                &format!("paid {}", tx.id),
                MessageType::PaymentConfirmation,
                Some(&pair.shared_secret),
                Some(&human_interaction()),
            )
            .unwrap();
        assert!(bob.verify_secure_message(&msg, alice.public_key()));
        assert_eq!(
            msg.decrypt_content(&pair.shared_secret).unwrap(),
            format!("paid {}", tx.id)
        );

        alice.create_message_block().unwrap().unwrap();
        let stats = alice.get_blockchain_stats();
        assert_eq!(stats.total_blocks, 1);
        assert_eq!(stats.total_messages, 1);
        assert_eq!(stats.pending_messages, 0);
        assert_eq!(stats.known_devices, 2);
        assert!(alice.verify_message_blockchain());
    }

    #[test]
    fn test_replayed_telemetry_is_gated() {
        let time = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let alice = device("device-alice", &time);

        let verdict = alice.detect_cloning_attempt("device-mallory", Some(&robotic_interaction()));
        assert!(verdict.is_cloned);

        let report =
            alice.implement_anti_cloning_measures("device-mallory", Some(&robotic_interaction()));
        assert!(report
            .active_measures
            .contains(&ProtectionMeasure::ContinuousMonitoring));
        assert!(!report
            .active_measures
            .contains(&ProtectionMeasure::BehavioralBiometrics));
    }

    #[test]
    fn test_pairs_expire_after_ttl() {
        let time = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let alice = device("device-alice", &time);
        let bob = device("device-bob", &time);

        let pair = alice.establish_pair(bob.device_id(), bob.public_key());
        time.advance(Duration::from_secs(31 * 60).as_millis() as u64);
        alice.cleanup_expired_pairs();

        assert!(alice.pair(&pair.session_id).is_none());
    }

    #[tokio::test]
    async fn test_async_sealing_flow() {
        let time = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let alice = device("device-alice", &time);

        let first = alice.seal_transaction(2.0, "Bagel", None).await.unwrap();
        let second = alice.seal_transaction(3.0, "Juice", None).await.unwrap();
        assert_eq!(second.previous_hash.as_deref(), Some(first.hash.as_str()));
        assert!(alice.verify_transaction_chain());

        let request = MessageRequest::new("device-bob", "receipt attached", MessageType::Receipt)
            .with_interaction(human_interaction());
        alice.seal_message(request).await.unwrap();

        let block = alice.seal_block().await.unwrap().unwrap();
        assert_eq!(block.index, 0);
        assert!(alice.verify_message_blockchain());
    }

    #[tokio::test]
    async fn test_async_sealing_times_out() {
        let config = AionetConfig {
            block_difficulty: 64,
            max_pow_iterations: u64::MAX,
            pow_timeout: Duration::from_millis(50),
            ..AionetConfig::default()
        };
        let alice = SecurityManager::with_identity(
            config,
            DeviceIdentity::with_device_id("device-alice"),
            Arc::new(ManualTimeSource::new(1_700_000_000_000)),
        )
        .unwrap();

        alice
            .seal_message(MessageRequest::new("device-bob", "queued", MessageType::Text))
            .await
            .unwrap();

        let err = alice.seal_block().await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::ProofOfWorkTimeout { kind: "block", .. }
        ));
        assert_eq!(alice.messages().pending_messages().len(), 1);
        assert!(alice.messages().latest_block().is_none());
    }
}
