//! Identity entities.

use serde::{Deserialize, Serialize};
use shared_crypto::{random_hex, DeviceKeyPair};
use shared_types::{DeviceId, Timestamp};

/// Prefix of generated device ids.
const DEVICE_ID_PREFIX: &str = "AIONET_";

/// The local device: id plus key pair. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    device_id: DeviceId,
    keys: DeviceKeyPair,
}

impl DeviceIdentity {
    /// Generate a random device id and key pair.
    pub fn create() -> Self {
        let device_id = format!("{DEVICE_ID_PREFIX}{}", random_hex(16).to_uppercase());
        Self::with_device_id(device_id)
    }

    /// Use a device id supplied by the device/storage layer with a fresh key pair.
    pub fn with_device_id(device_id: impl Into<DeviceId>) -> Self {
        Self::from_parts(device_id, DeviceKeyPair::generate())
    }

    /// Assemble an identity from existing parts.
    pub fn from_parts(device_id: impl Into<DeviceId>, keys: DeviceKeyPair) -> Self {
        let device_id = device_id.into();
        tracing::debug!(device_id = %device_id, "device identity created");
        Self { device_id, keys }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn public_key(&self) -> &str {
        self.keys.public_key()
    }

    pub fn private_key_hex(&self) -> String {
        self.keys.private_key_hex()
    }

    pub fn keys(&self) -> &DeviceKeyPair {
        &self.keys
    }
}

/// A pairing between the local device and a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePair {
    pub device_a: DeviceId,
    pub device_b: DeviceId,
    /// Never leaves the process in serialized form.
    #[serde(skip)]
    pub shared_secret: String,
    pub session_id: String,
    pub established_at: Timestamp,
}

impl DevicePair {
    /// Whether the pair has outlived `ttl_ms` at time `now`.
    pub fn is_expired(&self, now: Timestamp, ttl_ms: u64) -> bool {
        now.saturating_sub(self.established_at) > ttl_ms
    }

    /// Whether `device_id` is one of the two ends.
    pub fn involves(&self, device_id: &str) -> bool {
        self.device_a == device_id || self.device_b == device_id
    }
}
