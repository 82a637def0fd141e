//! Secure message entities and verification.

use aio_02_entropy::EntropyFingerprint;
use serde::{Deserialize, Serialize};
use shared_crypto::{
    hash_canonical, meets_difficulty, merkle_root, open_text, pow_digest, verify_signature,
    SealedText,
};
use shared_types::{DeviceId, HashHex, Timestamp};

use crate::error::{MessageChainError, Result};

/// Validator count folded into every consensus hash. There is one validator:
/// the sender.
pub const SYNTHETIC_VALIDATOR_COUNT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    PaymentRequest,
    PaymentConfirmation,
    Receipt,
    System,
}

/// Replay-resistance material, valid for a short window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicData {
    pub challenge: String,
    pub response: HashHex,
    pub nonce: String,
    /// Overall entropy of the interaction.
    pub entropy: f64,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
}

impl DynamicData {
    /// Whether `now` falls inside the validity window.
    pub fn is_fresh(&self, now: Timestamp) -> bool {
        (self.valid_from..=self.valid_until).contains(&now)
    }
}

/// Summary of the interaction that produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralPatterns {
    pub touch_count: usize,
    pub swipe_count: usize,
    pub average_pressure: f64,
    pub average_velocity: f64,
}

/// Evidence that a live human produced the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessProof {
    pub behavioral_patterns: BehavioralPatterns,
    /// Hash of the canonical interaction record.
    pub interaction_proof: HashHex,
    pub entropy_fingerprint: EntropyFingerprint,
    /// Reserved. Never populated.
    pub biometric_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSignature {
    pub validator: DeviceId,
    pub signature: String,
}

/// Single-message stand-in for consensus inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainProof {
    /// Chain length when the message was sealed.
    pub block_height: u64,
    /// Merkle root over the message hash alone.
    pub merkle_root: HashHex,
    pub consensus_hash: HashHex,
    pub validator_count: u32,
    pub validator_signatures: Vec<ValidatorSignature>,
}

/// A sealed message. Immutable once sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureMessage {
    pub id: String,
    pub sender: DeviceId,
    pub recipient: DeviceId,
    /// Plaintext, or hex ciphertext when `encrypted`.
    pub content: String,
    pub message_type: MessageType,
    pub encrypted: bool,
    /// Hex XChaCha20 nonce when `encrypted`.
    pub encryption_nonce: Option<String>,
    pub timestamp: Timestamp,
    pub public_key: String,
    /// Sender's overall trust score at sealing time.
    pub trust_score: f64,
    pub dynamic_data: DynamicData,
    pub liveness_proof: LivenessProof,
    pub signature: String,
    pub hash: HashHex,
    pub nonce: u64,
    pub blockchain_proof: BlockchainProof,
}

/// Every field except signature, nonce and blockchain proof.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload<'a> {
    pub id: &'a str,
    pub sender: &'a str,
    pub recipient: &'a str,
    pub content: &'a str,
    pub message_type: MessageType,
    pub encrypted: bool,
    pub encryption_nonce: Option<&'a str>,
    pub timestamp: Timestamp,
    pub public_key: &'a str,
    pub trust_score: f64,
    pub dynamic_data: &'a DynamicData,
    pub liveness_proof: &'a LivenessProof,
}

impl MessagePayload<'_> {
    pub fn hash(&self) -> shared_crypto::Result<HashHex> {
        hash_canonical(self)
    }

    /// Hash of the payload with the synthetic validator count folded in.
    pub fn consensus_hash(&self, validator_count: u32) -> shared_crypto::Result<HashHex> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| shared_crypto::CryptoError::Serialization(e.into()))?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("validatorCount".into(), validator_count.into());
        }
        hash_canonical(&value)
    }
}

impl SecureMessage {
    pub fn payload(&self) -> MessagePayload<'_> {
        MessagePayload {
            id: &self.id,
            sender: &self.sender,
            recipient: &self.recipient,
            content: &self.content,
            message_type: self.message_type,
            encrypted: self.encrypted,
            encryption_nonce: self.encryption_nonce.as_deref(),
            timestamp: self.timestamp,
            public_key: &self.public_key,
            trust_score: self.trust_score,
            dynamic_data: &self.dynamic_data,
            liveness_proof: &self.liveness_proof,
        }
    }

    pub fn meets_pow(&self, difficulty: usize) -> bool {
        meets_difficulty(&pow_digest(&self.hash, self.nonce), difficulty)
    }

    /// Recover the plaintext content.
    ///
    /// Unencrypted content is returned as is.
    pub fn decrypt_content(&self, shared_secret: &str) -> Result<String> {
        if !self.encrypted {
            return Ok(self.content.clone());
        }
        if shared_secret.is_empty() {
            return Err(MessageChainError::EncryptionRequiresSecret);
        }
        let nonce = self
            .encryption_nonce
            .clone()
            .ok_or_else(|| MessageChainError::MissingEncryptionNonce {
                id: self.id.clone(),
            })?;
        let sealed = SealedText {
            ciphertext: self.content.clone(),
            nonce,
        };
        Ok(open_text(shared_secret, &sealed)?)
    }
}

/// Recompute hash, signature, proof-of-work and blockchain proof.
///
/// Time-independent: freshness of the dynamic data is not checked here.
pub fn verify_secure_message(
    msg: &SecureMessage,
    sender_public_key: &str,
    difficulty: usize,
) -> bool {
    let payload = msg.payload();
    let Ok(expected_hash) = payload.hash() else {
        return false;
    };
    if expected_hash != msg.hash {
        tracing::debug!(msg_id = %msg.id, "Message hash mismatch");
        return false;
    }
    if !verify_signature(&msg.hash, &msg.signature, sender_public_key) {
        tracing::debug!(msg_id = %msg.id, "Message signature mismatch");
        return false;
    }
    if !msg.meets_pow(difficulty) {
        tracing::debug!(msg_id = %msg.id, "Message proof-of-work invalid");
        return false;
    }

    let proof = &msg.blockchain_proof;
    if proof.merkle_root != merkle_root(&[msg.hash.as_str()]) {
        tracing::debug!(msg_id = %msg.id, "Blockchain proof merkle root mismatch");
        return false;
    }
    let Ok(expected_consensus) = payload.consensus_hash(proof.validator_count) else {
        return false;
    };
    if proof.consensus_hash != expected_consensus {
        tracing::debug!(msg_id = %msg.id, "Consensus hash mismatch");
        return false;
    }
    if proof.validator_signatures.is_empty()
        || !proof
            .validator_signatures
            .iter()
            .all(|v| verify_signature(&proof.consensus_hash, &v.signature, sender_public_key))
    {
        tracing::debug!(msg_id = %msg.id, "Validator signature mismatch");
        return false;
    }
    true
}
