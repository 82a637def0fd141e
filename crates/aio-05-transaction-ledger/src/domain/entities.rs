//! Transaction entities and verification.

use serde::{Deserialize, Serialize};
use shared_crypto::{hash_canonical, meets_difficulty, pow_digest, verify_signature};
use shared_types::{DeviceId, HashHex, Timestamp};

/// A sealed payment transaction. Immutable once sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureTransaction {
    pub id: String,
    pub amount: f64,
    pub item_name: String,
    pub timestamp: Timestamp,
    pub device_id: DeviceId,
    pub public_key: String,
    pub signature: String,
    pub hash: HashHex,
    pub previous_hash: Option<HashHex>,
    pub nonce: u64,
    pub recipient_device_id: Option<DeviceId>,
}

/// Every field except signature and nonce. This is what gets hashed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload<'a> {
    pub id: &'a str,
    pub amount: f64,
    pub item_name: &'a str,
    pub timestamp: Timestamp,
    pub device_id: &'a str,
    pub public_key: &'a str,
    pub previous_hash: Option<&'a str>,
    pub recipient_device_id: Option<&'a str>,
}

impl TransactionPayload<'_> {
    pub fn hash(&self) -> shared_crypto::Result<HashHex> {
        hash_canonical(self)
    }
}

impl SecureTransaction {
    pub fn payload(&self) -> TransactionPayload<'_> {
        TransactionPayload {
            id: &self.id,
            amount: self.amount,
            item_name: &self.item_name,
            timestamp: self.timestamp,
            device_id: &self.device_id,
            public_key: &self.public_key,
            previous_hash: self.previous_hash.as_deref(),
            recipient_device_id: self.recipient_device_id.as_deref(),
        }
    }

    /// Whether `hash` still covers the payload. A transaction sealed without
    /// a predecessor and linked by the chain afterwards is hashed over
    /// `previous_hash: None`.
    pub fn is_payload_intact(&self) -> bool {
        let mut payload = self.payload();
        if payload.hash().map_or(false, |h| h == self.hash) {
            return true;
        }
        if payload.previous_hash.is_none() {
            return false;
        }
        payload.previous_hash = None;
        payload.hash().map_or(false, |h| h == self.hash)
    }

    /// Whether `hash ++ nonce` meets `difficulty`.
    pub fn meets_pow(&self, difficulty: usize) -> bool {
        meets_difficulty(&pow_digest(&self.hash, self.nonce), difficulty)
    }

    /// Required fields present and well-formed.
    pub fn is_structurally_complete(&self) -> bool {
        !self.id.is_empty()
            && self.amount.is_finite()
            && !self.device_id.is_empty()
            && !self.public_key.is_empty()
            && !self.signature.is_empty()
            && is_hash_hex(&self.hash)
            && self.previous_hash.as_deref().map_or(true, is_hash_hex)
    }
}

fn is_hash_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Recompute hash, signature and proof-of-work. Never fails, only says no.
pub fn verify_transaction(tx: &SecureTransaction, sender_public_key: &str, difficulty: usize) -> bool {
    let Ok(expected_hash) = tx.payload().hash() else {
        return false;
    };
    if expected_hash != tx.hash {
        tracing::debug!(tx_id = %tx.id, "Transaction hash mismatch");
        return false;
    }
    if !verify_signature(&tx.hash, &tx.signature, sender_public_key) {
        tracing::debug!(tx_id = %tx.id, "Transaction signature mismatch");
        return false;
    }
    if !tx.meets_pow(difficulty) {
        tracing::debug!(tx_id = %tx.id, "Transaction proof-of-work invalid");
        return false;
    }
    true
}
