//! # Security Manager
//!
//! Owns one instance of every AIONET subsystem and wires them together.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Device identity, time source, entropy analyzer
//! Level 1: Pair registry, clone detector (depend on Level 0)
//! Level 2: Trust engine (depends on the clone detector)
//! Level 3: Transaction ledger, message blockchain (depend on Level 0-2)
//! ```
//!
//! ## Thread Safety
//!
//! Every subsystem guards its own state with `parking_lot` locks, so the
//! manager is `Send + Sync` and is shared behind `Arc` without further locking.
//! Sealing subsystems are held in `Arc` so async sealing can move them onto
//! blocking threads.

use std::sync::Arc;

use tracing::{info, warn};

use aio_01_identity::{DeviceIdentity, DevicePair, PairRegistry};
use aio_02_entropy::{EntropyAnalyzer, EntropyConfig, EntropyFingerprint};
use aio_03_clone_detection::{
    AntiCloningReport, CloneDetectionConfig, CloneDetector, CloneVerdict,
};
use aio_04_trust_engine::{TrustConfig, TrustEngine, TrustScore};
use aio_05_transaction_ledger::{render_receipt, SecureTransaction, TransactionLedger};
use aio_06_message_chain::{
    BlockchainStats, MessageBlock, MessageBlockchain, MessageChainConfig, MessageType,
    SecureMessage,
};
use aionet_telemetry::{record_clone_verdict, record_seal, record_verification};
use shared_crypto::ProofOfWork;
use shared_types::{HashHex, InteractionData, SystemTimeSource, TimeSource};

use crate::container::config::AionetConfig;
use crate::error::Result;

/// Context object holding every subsystem for one local device.
pub struct SecurityManager {
    pub(crate) config: AionetConfig,
    time: Arc<dyn TimeSource>,

    // =========================================================================
    // LEVEL 0
    // =========================================================================
    /// Local device identity (Subsystem 1)
    identity: Arc<DeviceIdentity>,

    /// Entropy analyzer (Subsystem 2)
    entropy: EntropyAnalyzer,

    // =========================================================================
    // LEVEL 1-2
    // =========================================================================
    /// Active pairs with peer devices (Subsystem 1)
    pairs: PairRegistry,

    /// Clone detector (Subsystem 3), shared with the trust engine
    clone_detector: Arc<CloneDetector>,

    /// Trust engine (Subsystem 4), shared with the message blockchain
    trust: Arc<TrustEngine>,

    // =========================================================================
    // LEVEL 3
    // =========================================================================
    /// Transaction ledger (Subsystem 5)
    pub(crate) ledger: Arc<TransactionLedger>,

    /// Message blockchain (Subsystem 6)
    pub(crate) messages: Arc<MessageBlockchain>,
}

impl SecurityManager {
    /// Build a manager for a freshly generated identity on the system clock.
    pub fn new(config: AionetConfig) -> Result<Self> {
        Self::with_identity(config, DeviceIdentity::create(), Arc::new(SystemTimeSource))
    }

    /// Build a manager around an existing identity and time source.
    pub fn with_identity(
        config: AionetConfig,
        identity: DeviceIdentity,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        config.validate()?;

        // Level 0
        let identity = Arc::new(identity);
        let entropy = EntropyAnalyzer::new(EntropyConfig::default());

        // Level 1
        let pairs = PairRegistry::new(
            Arc::clone(&identity),
            AionetConfig::millis(config.pair_ttl),
            Arc::clone(&time),
        );
        let clone_detector = Arc::new(CloneDetector::new(
            CloneDetectionConfig::default(),
            Arc::clone(&time),
        ));

        // Level 2
        let trust_config = TrustConfig {
            history_capacity: config.score_history_capacity,
            ..TrustConfig::default()
        };
        let trust = Arc::new(TrustEngine::new(
            trust_config,
            Arc::clone(&clone_detector),
            Arc::clone(&time),
        ));
        trust.register_known_device(identity.device_id());

        // Level 3
        let ledger = Arc::new(TransactionLedger::new(
            Arc::clone(&identity),
            ProofOfWork::new(config.transaction_difficulty, config.max_pow_iterations),
            Arc::clone(&time),
        ));
        let message_config = MessageChainConfig {
            message_difficulty: config.message_difficulty,
            block_difficulty: config.block_difficulty,
            max_pow_iterations: config.max_pow_iterations,
            validity_window_ms: AionetConfig::millis(config.message_validity_window),
        };
        let messages = Arc::new(MessageBlockchain::new(
            message_config,
            Arc::clone(&identity),
            entropy.clone(),
            Arc::clone(&trust),
            Arc::clone(&time),
        ));

        info!(
            device_id = identity.device_id(),
            tx_difficulty = config.transaction_difficulty,
            msg_difficulty = config.message_difficulty,
            block_difficulty = config.block_difficulty,
            "Security manager initialized"
        );

        Ok(Self {
            config,
            time,
            identity,
            entropy,
            pairs,
            clone_detector,
            trust,
            ledger,
            messages,
        })
    }

    pub fn config(&self) -> &AionetConfig {
        &self.config
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn device_id(&self) -> &str {
        self.identity.device_id()
    }

    pub fn public_key(&self) -> &str {
        self.identity.public_key()
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn messages(&self) -> &MessageBlockchain {
        &self.messages
    }

    pub fn trust_engine(&self) -> &TrustEngine {
        &self.trust
    }

    // =========================================================================
    // Pairing
    // =========================================================================

    /// Pair with a peer and count it as a known device.
    pub fn establish_pair(&self, peer_device_id: &str, peer_public_key: &str) -> DevicePair {
        let pair = self.pairs.establish_pair(peer_device_id, peer_public_key);
        self.trust.register_known_device(peer_device_id);
        pair
    }

    /// Look up a pair by session id.
    pub fn pair(&self, session_id: &str) -> Option<DevicePair> {
        self.pairs.get(session_id)
    }

    /// Drop pairs older than the configured TTL.
    pub fn cleanup_expired_pairs(&self) {
        self.pairs.cleanup_expired_pairs(self.time.now());
    }

    /// Forget clone-check and scoring state of devices idle longer than the
    /// configured retention. Returns how many records were removed.
    pub fn cleanup_inactive_devices(&self) -> usize {
        let now = self.time.now();
        let max_idle_ms = AionetConfig::millis(self.config.device_retention);
        self.clone_detector.cleanup_inactive_devices(now, max_idle_ms)
            + self.trust.cleanup_inactive_devices(now, max_idle_ms)
    }

    pub fn active_pairs(&self) -> usize {
        self.pairs.len()
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    pub fn entropy_fingerprint(&self, interaction: Option<&InteractionData>) -> EntropyFingerprint {
        self.entropy.fingerprint(interaction)
    }

    pub fn trust_score(&self, device_id: &str, interaction: Option<&InteractionData>) -> TrustScore {
        self.trust.trust_score(device_id, interaction)
    }

    pub fn detect_cloning_attempt(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> CloneVerdict {
        let verdict = self.clone_detector.detect_cloning_attempt(device_id, interaction);
        record_clone_verdict(verdict.is_cloned);
        verdict
    }

    pub fn implement_anti_cloning_measures(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> AntiCloningReport {
        self.clone_detector
            .implement_anti_cloning_measures(device_id, interaction)
    }

    pub fn calculate_clone_resistance_score(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> f64 {
        self.clone_detector
            .calculate_clone_resistance_score(device_id, interaction)
    }

    pub fn generate_uniqueness_fingerprint(
        &self,
        device_id: &str,
        interaction: Option<&InteractionData>,
    ) -> HashHex {
        self.clone_detector
            .generate_uniqueness_fingerprint(device_id, interaction)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Seal a transaction against the ledger tail and append it.
    ///
    /// Runs on the calling thread; see `seal_transaction` for the bounded
    /// async variant.
    pub fn create_secure_transaction(
        &self,
        amount: f64,
        item_name: &str,
        recipient_device_id: Option<&str>,
    ) -> Result<SecureTransaction> {
        let tx = self
            .ledger
            .create_and_append(amount, item_name, recipient_device_id, None)?;
        record_seal("transaction", tx.nonce + 1);
        Ok(tx)
    }

    pub fn verify_transaction(&self, tx: &SecureTransaction, sender_public_key: &str) -> bool {
        let ok = self.ledger.verify_transaction(tx, sender_public_key);
        record_verification("transaction", ok);
        if !ok {
            warn!(tx_id = %tx.id, "Transaction failed verification");
        }
        ok
    }

    pub fn verify_transaction_chain(&self) -> bool {
        let ok = self.ledger.verify_chain();
        record_verification("transaction_chain", ok);
        ok
    }

    pub fn generate_secure_receipt(&self, tx: &SecureTransaction) -> String {
        render_receipt(tx)
    }

    // =========================================================================
    // Messages
    // =========================================================================

    /// Seal a message and queue it for the next block.
    pub fn create_secure_message(
        &self,
        recipient: &str,
        content: &str,
        message_type: MessageType,
        shared_secret: Option<&str>,
        interaction: Option<&InteractionData>,
    ) -> Result<SecureMessage> {
        let msg = self.messages.create_secure_message(
            recipient,
            content,
            message_type,
            shared_secret,
            interaction,
        )?;
        record_seal("message", msg.nonce + 1);
        Ok(msg)
    }

    pub fn verify_secure_message(&self, msg: &SecureMessage, sender_public_key: &str) -> bool {
        let ok = self.messages.verify_secure_message(msg, sender_public_key);
        record_verification("message", ok);
        if !ok {
            warn!(message_id = %msg.id, "Message failed verification");
        }
        ok
    }

    /// Seal the pending queue into a block. `None` when nothing is pending.
    pub fn create_message_block(&self) -> Result<Option<MessageBlock>> {
        let block = self.messages.create_message_block()?;
        if let Some(block) = &block {
            record_seal("block", block.nonce + 1);
        }
        Ok(block)
    }

    pub fn verify_message_blockchain(&self) -> bool {
        let ok = self.messages.verify_message_blockchain();
        record_verification("blockchain", ok);
        ok
    }

    pub fn get_blockchain_stats(&self) -> BlockchainStats {
        self.messages.get_blockchain_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ManualTimeSource, RiskLevel};
    use std::time::Duration;

    fn manager_at(start: u64) -> (SecurityManager, Arc<ManualTimeSource>) {
        let time = Arc::new(ManualTimeSource::new(start));
        let manager = SecurityManager::with_identity(
            AionetConfig::default(),
            DeviceIdentity::with_device_id("device-local"),
            time.clone(),
        )
        .unwrap();
        (manager, time)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AionetConfig {
            transaction_difficulty: 0,
            ..AionetConfig::default()
        };
        assert!(SecurityManager::new(config).is_err());
    }

    #[test]
    fn test_own_device_is_known() {
        let (manager, _) = manager_at(1_000_000);
        assert!(manager.trust_engine().is_known_device("device-local"));
        assert_eq!(manager.get_blockchain_stats().known_devices, 1);
    }

    #[test]
    fn test_pairing_registers_peer_and_expires() {
        let (manager, time) = manager_at(1_000_000);
        let peer = DeviceIdentity::with_device_id("device-peer");

        let pair = manager.establish_pair(peer.device_id(), peer.public_key());
        assert_eq!(manager.pair(&pair.session_id), Some(pair.clone()));
        assert_eq!(manager.get_blockchain_stats().known_devices, 2);
        assert!(manager.pair("no-such-session").is_none());

        time.advance(Duration::from_secs(29 * 60).as_millis() as u64);
        manager.cleanup_expired_pairs();
        assert_eq!(manager.active_pairs(), 1);

        time.advance(Duration::from_secs(2 * 60).as_millis() as u64);
        manager.cleanup_expired_pairs();
        assert_eq!(manager.active_pairs(), 0);
    }

    #[test]
    fn test_idle_devices_are_forgotten() {
        let (manager, time) = manager_at(1_000_000);
        manager.detect_cloning_attempt("device-stranger", None);
        manager.trust_score("device-stranger", None);
        assert_eq!(manager.trust_engine().tracked_devices(), 1);

        time.advance(Duration::from_secs(23 * 3600).as_millis() as u64);
        assert_eq!(manager.cleanup_inactive_devices(), 0);

        time.advance(Duration::from_secs(2 * 3600).as_millis() as u64);
        assert_eq!(manager.cleanup_inactive_devices(), 2);
        assert_eq!(manager.trust_engine().tracked_devices(), 0);
        assert!(manager.trust_engine().is_known_device("device-local"));
    }

    #[test]
    fn test_transactions_link_and_verify() {
        let (manager, _) = manager_at(1_000_000);

        let first = manager
            .create_secure_transaction(12.5, "Coffee", Some("device-shop"))
            .unwrap();
        let second = manager.create_secure_transaction(3.0, "Cookie", None).unwrap();

        assert!(manager.verify_transaction(&first, manager.public_key()));
        assert!(manager.verify_transaction(&second, manager.public_key()));
        assert_eq!(second.previous_hash.as_deref(), Some(first.hash.as_str()));
        assert!(manager.verify_transaction_chain());

        let receipt = manager.generate_secure_receipt(&first);
        assert!(receipt.contains(&first.id));
        assert!(receipt.contains("AIONET v1.2"));
    }

    #[test]
    fn test_tampered_transaction_fails() {
        let (manager, _) = manager_at(1_000_000);
        let mut tx = manager.create_secure_transaction(1.0, "Tea", None).unwrap();
        tx.amount = 100.0;
        assert!(!manager.verify_transaction(&tx, manager.public_key()));
    }

    #[test]
    fn test_messages_block_and_stats() {
        let (manager, _) = manager_at(1_000_000);
        assert!(manager.create_message_block().unwrap().is_none());

        let msg = manager
            .create_secure_message("device-peer", "hello", MessageType::Text, None, None)
            .unwrap();
        assert!(manager.verify_secure_message(&msg, manager.public_key()));

        let block = manager.create_message_block().unwrap().unwrap();
        assert_eq!(block.messages.len(), 1);
        assert!(manager.verify_message_blockchain());

        let stats = manager.get_blockchain_stats();
        assert_eq!(stats.total_blocks, 1);
        assert_eq!(stats.total_messages, 1);
        assert_eq!(stats.pending_messages, 0);
    }

    #[test]
    fn test_absent_telemetry_degrades() {
        let (manager, _) = manager_at(1_000_000);

        let verdict = manager.detect_cloning_attempt("device-unknown", None);
        assert!(!verdict.is_cloned);
        assert_eq!(verdict.risk_level, RiskLevel::High);

        let score = manager.trust_score("device-unknown", None);
        assert!((0.0..=100.0).contains(&score.overall_score));

        let fingerprint = manager.entropy_fingerprint(None);
        assert_eq!(fingerprint.overall_entropy, 0.0);
    }
}
