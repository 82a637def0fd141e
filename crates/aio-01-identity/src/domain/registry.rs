//! Pairing registry.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{TimeSource, Timestamp};

use super::{DeviceIdentity, DevicePair};

/// Default pair lifetime: 30 minutes.
pub const DEFAULT_PAIR_TTL_MS: u64 = 30 * 60 * 1000;

/// Registry of active pairs keyed by session id.
pub struct PairRegistry {
    identity: Arc<DeviceIdentity>,
    pairs: RwLock<HashMap<String, DevicePair>>,
    ttl_ms: u64,
    time: Arc<dyn TimeSource>,
}

impl PairRegistry {
    pub fn new(identity: Arc<DeviceIdentity>, ttl_ms: u64, time: Arc<dyn TimeSource>) -> Self {
        Self {
            identity,
            pairs: RwLock::new(HashMap::new()),
            ttl_ms,
            time,
        }
    }

    /// Pair with a peer. Derives the shared secret from the local private key
    /// and `other_public_key`, and stores the pair under a fresh session id.
    pub fn establish_pair(&self, other_device_id: &str, other_public_key: &str) -> DevicePair {
        let pair = DevicePair {
            device_a: self.identity.device_id().to_string(),
            device_b: other_device_id.to_string(),
            shared_secret: self.identity.keys().derive_shared_secret(other_public_key),
            session_id: uuid::Uuid::new_v4().to_string(),
            established_at: self.time.now(),
        };

        self.pairs
            .write()
            .insert(pair.session_id.clone(), pair.clone());

        tracing::info!(
            peer = %other_device_id,
            session_id = %pair.session_id,
            "device pair established"
        );
        pair
    }

    /// Remove every pair older than the TTL at `now`.
    pub fn cleanup_expired_pairs(&self, now: Timestamp) {
        let mut pairs = self.pairs.write();
        let before = pairs.len();
        pairs.retain(|_, pair| !pair.is_expired(now, self.ttl_ms));
        let removed = before - pairs.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = pairs.len(), "expired device pairs purged");
        }
    }

    /// Look up a pair by session id.
    pub fn get(&self, session_id: &str) -> Option<DevicePair> {
        self.pairs.read().get(session_id).cloned()
    }

    /// All pairs involving `device_id`.
    pub fn find_by_device(&self, device_id: &str) -> Vec<DevicePair> {
        self.pairs
            .read()
            .values()
            .filter(|pair| pair.involves(device_id))
            .cloned()
            .collect()
    }

    /// Distinct peer device ids with an active pair.
    pub fn paired_devices(&self) -> BTreeSet<String> {
        self.pairs
            .read()
            .values()
            .map(|pair| pair.device_b.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }
}
