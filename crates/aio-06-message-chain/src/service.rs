//! Message blockchain service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aio_01_identity::DeviceIdentity;
use aio_02_entropy::EntropyAnalyzer;
use aio_04_trust_engine::TrustEngine;
use parking_lot::{Mutex, RwLock};
use shared_crypto::{
    hash_canonical, merkle_root, random_hex, seal_text, sha256_hex, CryptoError, ProofOfWork,
};
use shared_types::{stats::mean, DeviceId, InteractionData, TimeSource, ZERO_HASH};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::MessageChainConfig;
use crate::domain::{
    verify_blocks, verify_secure_message, BehavioralPatterns, BlockHeader, BlockchainProof,
    BlockchainStats, DynamicData, LivenessProof, MessageBlock, MessagePayload, MessageType,
    SecureMessage, ValidatorSignature, SYNTHETIC_VALIDATOR_COUNT,
};
use crate::error::{MessageChainError, Result};

/// Everything needed to seal one message.
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub recipient: DeviceId,
    pub content: String,
    pub message_type: MessageType,
    /// Encrypt the content under this secret when present.
    pub shared_secret: Option<String>,
    pub interaction: Option<InteractionData>,
}

impl MessageRequest {
    pub fn new(recipient: impl Into<DeviceId>, content: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            recipient: recipient.into(),
            content: content.into(),
            message_type,
            shared_secret: None,
            interaction: None,
        }
    }

    pub fn encrypted_with(mut self, shared_secret: impl Into<String>) -> Self {
        self.shared_secret = Some(shared_secret.into());
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionData) -> Self {
        self.interaction = Some(interaction);
        self
    }
}

/// Seals messages for the local device, queues them, and seals the queue into
/// blocks.
pub struct MessageBlockchain {
    config: MessageChainConfig,
    identity: Arc<DeviceIdentity>,
    analyzer: EntropyAnalyzer,
    trust: Arc<TrustEngine>,
    message_pow: ProofOfWork,
    block_pow: ProofOfWork,
    pending: Mutex<Vec<SecureMessage>>,
    chain: RwLock<Vec<MessageBlock>>,
    time: Arc<dyn TimeSource>,
}

impl MessageBlockchain {
    pub fn new(
        config: MessageChainConfig,
        identity: Arc<DeviceIdentity>,
        analyzer: EntropyAnalyzer,
        trust: Arc<TrustEngine>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        info!(
            device_id = identity.device_id(),
            message_difficulty = config.message_difficulty,
            block_difficulty = config.block_difficulty,
            "Message blockchain initialized"
        );
        Self {
            message_pow: ProofOfWork::new(config.message_difficulty, config.max_pow_iterations),
            block_pow: ProofOfWork::new(config.block_difficulty, config.max_pow_iterations),
            config,
            identity,
            analyzer,
            trust,
            pending: Mutex::new(Vec::new()),
            chain: RwLock::new(Vec::new()),
            time,
        }
    }

    pub fn config(&self) -> &MessageChainConfig {
        &self.config
    }

    /// Seal a message and queue it for the next block.
    pub fn create_secure_message(
        &self,
        recipient: &str,
        content: &str,
        message_type: MessageType,
        shared_secret: Option<&str>,
        interaction: Option<&InteractionData>,
    ) -> Result<SecureMessage> {
        let request = MessageRequest {
            recipient: recipient.to_string(),
            content: content.to_string(),
            message_type,
            shared_secret: shared_secret.map(str::to_string),
            interaction: interaction.cloned(),
        };
        self.seal_message(&request, None)
    }

    /// Seal a message, abandoning the nonce search once `cancel` is raised.
    pub fn seal_message(
        &self,
        request: &MessageRequest,
        cancel: Option<&AtomicBool>,
    ) -> Result<SecureMessage> {
        let id = Uuid::new_v4().to_string();
        let timestamp = self.time.now();
        let interaction = request.interaction.as_ref();

        let (content, encryption_nonce) = match request.shared_secret.as_deref() {
            Some("") => return Err(MessageChainError::EncryptionRequiresSecret),
            Some(secret) => {
                let sealed = seal_text(secret, &request.content)?;
                (sealed.ciphertext, Some(sealed.nonce))
            }
            None => (request.content.clone(), None),
        };

        let liveness_proof = self.liveness_proof(interaction)?;
        let dynamic_data = self.dynamic_data(timestamp, liveness_proof.entropy_fingerprint.overall_entropy);
        let trust_score = self
            .trust
            .trust_score(self.identity.device_id(), interaction)
            .overall_score;

        let payload = MessagePayload {
            id: &id,
            sender: self.identity.device_id(),
            recipient: &request.recipient,
            content: &content,
            message_type: request.message_type,
            encrypted: encryption_nonce.is_some(),
            encryption_nonce: encryption_nonce.as_deref(),
            timestamp,
            public_key: self.identity.public_key(),
            trust_score,
            dynamic_data: &dynamic_data,
            liveness_proof: &liveness_proof,
        };
        let hash = payload.hash()?;
        let signature = self.identity.keys().sign(&hash)?;
        let seal = self.message_pow.seal_with_cancel(&hash, cancel)?;

        let consensus_hash = payload.consensus_hash(SYNTHETIC_VALIDATOR_COUNT)?;
        let blockchain_proof = BlockchainProof {
            block_height: self.chain.read().len() as u64,
            merkle_root: merkle_root(&[hash.as_str()]),
            validator_signatures: vec![ValidatorSignature {
                validator: self.identity.device_id().to_string(),
                signature: self.identity.keys().sign(&consensus_hash)?,
            }],
            consensus_hash,
            validator_count: SYNTHETIC_VALIDATOR_COUNT,
        };

        let message = SecureMessage {
            id,
            sender: self.identity.device_id().to_string(),
            recipient: request.recipient.clone(),
            content,
            message_type: request.message_type,
            encrypted: encryption_nonce.is_some(),
            encryption_nonce,
            timestamp,
            public_key: self.identity.public_key().to_string(),
            trust_score,
            dynamic_data,
            liveness_proof,
            signature,
            hash,
            nonce: seal.nonce,
            blockchain_proof,
        };

        {
            let mut pending = self.pending.lock();
            discard_if_cancelled(cancel, seal.iterations)?;
            pending.push(message.clone());
        }
        info!(
            msg_id = %message.id,
            recipient = %message.recipient,
            nonce = message.nonce,
            encrypted = message.encrypted,
            "Secure message sealed"
        );
        Ok(message)
    }

    /// Check a message from `sender_public_key` at this chain's difficulty.
    pub fn verify_secure_message(&self, msg: &SecureMessage, sender_public_key: &str) -> bool {
        verify_secure_message(msg, sender_public_key, self.message_pow.difficulty())
    }

    /// Seal all pending messages into a block. `None` when nothing is pending.
    pub fn create_message_block(&self) -> Result<Option<MessageBlock>> {
        self.seal_block(None)
    }

    /// Seal all pending messages, abandoning the search once `cancel` is raised.
    ///
    /// The pending queue stays locked for the whole seal. On failure the queue
    /// is left as it was, including when the seal finishes after `cancel`.
    pub fn seal_block(&self, cancel: Option<&AtomicBool>) -> Result<Option<MessageBlock>> {
        let mut pending = self.pending.lock();
        if pending.is_empty() {
            return Ok(None);
        }

        let (index, previous_block_hash) = {
            let chain = self.chain.read();
            let previous = chain
                .last()
                .map(|b| b.block_hash.clone())
                .unwrap_or_else(|| ZERO_HASH.to_string());
            (chain.len() as u64, previous)
        };

        let hashes: Vec<&str> = pending.iter().map(|m| m.hash.as_str()).collect();
        let merkle = merkle_root(&hashes);
        let timestamp = self.time.now();
        let header_hash = BlockHeader {
            index,
            timestamp,
            previous_block_hash: &previous_block_hash,
            merkle_root: &merkle,
            validator: self.identity.device_id(),
        }
        .hash()?;
        let seal = self.block_pow.seal_with_cancel(&header_hash, cancel)?;
        discard_if_cancelled(cancel, seal.iterations)?;

        let block = MessageBlock {
            index,
            timestamp,
            messages: std::mem::take(&mut *pending),
            previous_block_hash,
            block_hash: seal.digest,
            nonce: seal.nonce,
            merkle_root: merkle,
            validator_device_id: self.identity.device_id().to_string(),
        };
        self.chain.write().push(block.clone());

        info!(
            index = block.index,
            messages = block.messages.len(),
            nonce = block.nonce,
            iterations = seal.iterations,
            "Message block sealed"
        );
        Ok(Some(block))
    }

    pub fn verify_message_blockchain(&self) -> bool {
        verify_blocks(&self.chain.read(), self.block_pow.difficulty())
    }

    pub fn get_blockchain_stats(&self) -> BlockchainStats {
        // Queue before chain, the same order block sealing takes them.
        let pending_messages = self.pending.lock().len();
        let chain = self.chain.read();
        BlockchainStats {
            total_blocks: chain.len(),
            total_messages: chain.iter().map(|b| b.messages.len()).sum(),
            pending_messages,
            known_devices: self.trust.known_device_count(),
        }
    }

    pub fn latest_block(&self) -> Option<MessageBlock> {
        self.chain.read().last().cloned()
    }

    pub fn block(&self, index: u64) -> Option<MessageBlock> {
        self.chain.read().get(usize::try_from(index).ok()?).cloned()
    }

    pub fn pending_messages(&self) -> Vec<SecureMessage> {
        self.pending.lock().clone()
    }

    /// Copy of every sealed block.
    pub fn blocks(&self) -> Vec<MessageBlock> {
        self.chain.read().clone()
    }

    fn liveness_proof(&self, interaction: Option<&InteractionData>) -> Result<LivenessProof> {
        let fingerprint = self.analyzer.fingerprint(interaction);
        let behavioral_patterns = interaction
            .map(|d| BehavioralPatterns {
                touch_count: d.touch_points.len(),
                swipe_count: d.swipe_gestures.len(),
                average_pressure: mean(&d.pressures()),
                average_velocity: mean(&d.velocities()),
            })
            .unwrap_or(BehavioralPatterns {
                touch_count: 0,
                swipe_count: 0,
                average_pressure: 0.0,
                average_velocity: 0.0,
            });
        Ok(LivenessProof {
            behavioral_patterns,
            interaction_proof: hash_canonical(&interaction)?,
            entropy_fingerprint: fingerprint,
            biometric_data: None,
        })
    }

    fn dynamic_data(&self, now: u64, entropy: f64) -> DynamicData {
        let challenge = random_hex(16);
        let response = sha256_hex(format!(
            "{challenge}{}{}",
            self.identity.device_id(),
            self.identity.public_key()
        ));
        DynamicData {
            challenge,
            response,
            nonce: random_hex(16),
            entropy,
            valid_from: now,
            valid_until: now + self.config.validity_window_ms,
        }
    }
}

/// A seal that finished after `cancel` was raised is not committed.
fn discard_if_cancelled(cancel: Option<&AtomicBool>, iterations: u64) -> Result<()> {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        debug!(iterations, "Seal finished after cancellation, discarded");
        return Err(CryptoError::ProofOfWorkCancelled { iterations }.into());
    }
    Ok(())
}
