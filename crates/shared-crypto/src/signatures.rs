//! # Device Keys and Signing
//!
//! Device key pair and the keyed-hash signature used by AIONET artifacts.
//!
//! ## Construction
//!
//! - private key: 32 random bytes
//! - public key: `SHA-256(private key bytes)`, hex
//! - signature: `HMAC-SHA256(key = public key, message = artifact hash)`, hex
//! - shared secret with a peer: `SHA-256(private key hex ++ peer public key)`
//!
//! Verification only needs the public key, which is also all a forger needs.
//! This is a stand-in for an asymmetric scheme and gives tamper detection only.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{sha256_hex, CryptoError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Private key bytes, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct PrivateKey([u8; 32]);

/// Device key pair.
#[derive(Clone)]
pub struct DeviceKeyPair {
    private_key: PrivateKey,
    public_key: String,
}

impl DeviceKeyPair {
    /// Generate a fresh key pair from the thread CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let pair = Self::from_private_bytes(bytes);
        bytes.zeroize();
        pair
    }

    /// Rebuild a key pair from raw private key bytes.
    pub fn from_private_bytes(bytes: [u8; 32]) -> Self {
        let public_key = sha256_hex(bytes);
        Self {
            private_key: PrivateKey(bytes),
            public_key,
        }
    }

    /// Rebuild a key pair from a hex private key.
    pub fn from_private_hex(private_hex: &str) -> Result<Self> {
        let decoded = hex::decode(private_hex)?;
        let bytes: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: 32,
                actual: decoded.len(),
            })?;
        Ok(Self::from_private_bytes(bytes))
    }

    /// Hex public key.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Hex private key. Handle with care.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key.0)
    }

    /// Sign an artifact hash.
    pub fn sign(&self, message_hash: &str) -> Result<String> {
        sign_with_public_key(message_hash, &self.public_key)
    }

    /// Shared secret with a peer, derived from this device's private key and
    /// the peer's public key.
    pub fn derive_shared_secret(&self, peer_public_key: &str) -> String {
        sha256_hex(format!("{}{}", self.private_key_hex(), peer_public_key))
    }
}

impl std::fmt::Debug for DeviceKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Compute the signature expected for `message_hash` under `public_key`.
pub fn sign_with_public_key(message_hash: &str, public_key: &str) -> Result<String> {
    let mut mac =
        HmacSha256::new_from_slice(public_key.as_bytes()).map_err(|_| CryptoError::InvalidKey)?;
    mac.update(message_hash.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check `signature_hex` against `message_hash` and `public_key`.
///
/// Malformed hex or keys yield `false`. Uses constant-time comparison.
pub fn verify_signature(message_hash: &str, signature_hex: &str, public_key: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(public_key.as_bytes()) else {
        return false;
    };
    mac.update(message_hash.as_bytes());
    mac.verify_slice(&signature).is_ok()
}
