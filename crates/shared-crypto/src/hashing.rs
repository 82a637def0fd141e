//! # Hashing
//!
//! Every AIONET artifact hash is a lowercase hex SHA-256 digest. Structured
//! payloads go through `shared_types::canonical_json` first so the digest does
//! not depend on field order.

use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use shared_types::{canonical_json, HashHex};

use crate::Result;

/// SHA-256 of `data`, hex encoded.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> HashHex {
    hex::encode(Sha256::digest(data.as_ref()))
}

/// SHA-256 over the concatenation of `inputs`, hex encoded.
pub fn sha256_hex_many(inputs: &[&[u8]]) -> HashHex {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input);
    }
    hex::encode(hasher.finalize())
}

/// SHA-256 of the canonical JSON form of `value`.
pub fn hash_canonical<T: Serialize + ?Sized>(value: &T) -> Result<HashHex> {
    let canonical = canonical_json(value)?;
    Ok(sha256_hex(canonical))
}

/// `len` random bytes from the thread CSPRNG, hex encoded.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Derive a 32-byte key from context and input key material.
pub fn blake3_derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    *hasher.finalize().as_bytes()
}
