//! Message blocks and chain verification.

use serde::{Deserialize, Serialize};
use shared_crypto::{hash_canonical, meets_difficulty, merkle_root, pow_digest};
use shared_types::{DeviceId, HashHex, Timestamp, ZERO_HASH};

use super::SecureMessage;

/// A sealed batch of messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBlock {
    pub index: u64,
    pub timestamp: Timestamp,
    pub messages: Vec<SecureMessage>,
    pub previous_block_hash: HashHex,
    /// `SHA-256(header_hash ++ nonce)`.
    pub block_hash: HashHex,
    pub nonce: u64,
    pub merkle_root: HashHex,
    pub validator_device_id: DeviceId,
}

/// The hashed part of a block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader<'a> {
    pub index: u64,
    pub timestamp: Timestamp,
    pub previous_block_hash: &'a str,
    pub merkle_root: &'a str,
    pub validator: &'a str,
}

impl BlockHeader<'_> {
    pub fn hash(&self) -> shared_crypto::Result<HashHex> {
        hash_canonical(self)
    }
}

impl MessageBlock {
    pub fn header(&self) -> BlockHeader<'_> {
        BlockHeader {
            index: self.index,
            timestamp: self.timestamp,
            previous_block_hash: &self.previous_block_hash,
            merkle_root: &self.merkle_root,
            validator: &self.validator_device_id,
        }
    }

    /// Merkle root recomputed from the carried messages.
    pub fn computed_merkle_root(&self) -> HashHex {
        let hashes: Vec<&str> = self.messages.iter().map(|m| m.hash.as_str()).collect();
        merkle_root(&hashes)
    }

    /// `block_hash` matches the header and meets `difficulty`.
    pub fn has_valid_seal(&self, difficulty: usize) -> bool {
        let Ok(header_hash) = self.header().hash() else {
            return false;
        };
        let digest = pow_digest(&header_hash, self.nonce);
        digest == self.block_hash && meets_difficulty(&digest, difficulty)
    }

    pub fn is_genesis_linked(&self) -> bool {
        self.previous_block_hash == ZERO_HASH
    }
}

/// Chain-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainStats {
    pub total_blocks: usize,
    pub total_messages: usize,
    pub pending_messages: usize,
    pub known_devices: usize,
}

/// Linkage after the first block, seal and Merkle root for every block.
pub fn verify_blocks(blocks: &[MessageBlock], difficulty: usize) -> bool {
    for (position, block) in blocks.iter().enumerate() {
        if position > 0 && block.previous_block_hash != blocks[position - 1].block_hash {
            tracing::warn!(index = block.index, "Block linkage broken");
            return false;
        }
        if !block.has_valid_seal(difficulty) {
            tracing::warn!(index = block.index, "Block seal invalid");
            return false;
        }
        if block.computed_merkle_root() != block.merkle_root {
            tracing::warn!(index = block.index, "Block merkle root mismatch");
            return false;
        }
    }
    true
}
