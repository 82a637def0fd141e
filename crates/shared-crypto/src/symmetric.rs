//! # Symmetric Encryption
//!
//! XChaCha20-Poly1305 encryption of message content under a pairing shared
//! secret. The 256-bit key is derived from the secret with BLAKE3's KDF.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit random nonce, authenticated
//! - Decrypting with a different secret fails instead of yielding garbage

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{blake3_derive_key, CryptoError, Result};

/// KDF context for message content keys.
const CONTENT_KEY_CONTEXT: &str = "aionet 2024 secure message content v1";

/// XChaCha20 nonce length in bytes.
const NONCE_LEN: usize = 24;

/// Secret key (256-bit).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the content key for a pairing shared secret.
    pub fn from_shared_secret(shared_secret: &str) -> Self {
        Self(blake3_derive_key(CONTENT_KEY_CONTEXT, shared_secret.as_bytes()))
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Hex ciphertext plus the nonce needed to open it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedText {
    pub ciphertext: String,
    pub nonce: String,
}

/// Encrypt raw bytes. Returns `(ciphertext, nonce)`.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok((ciphertext, nonce))
}

/// Decrypt raw bytes.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::DecryptionFailed(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Encrypt UTF-8 text under a shared secret.
pub fn seal_text(shared_secret: &str, plaintext: &str) -> Result<SealedText> {
    let key = SecretKey::from_shared_secret(shared_secret);
    let (ciphertext, nonce) = encrypt(&key, plaintext.as_bytes())?;
    Ok(SealedText {
        ciphertext: hex::encode(ciphertext),
        nonce: hex::encode(nonce),
    })
}

/// Decrypt text sealed with [`seal_text`].
pub fn open_text(shared_secret: &str, sealed: &SealedText) -> Result<String> {
    let key = SecretKey::from_shared_secret(shared_secret);
    let ciphertext = hex::decode(&sealed.ciphertext)?;
    let nonce = hex::decode(&sealed.nonce)?;
    let plaintext = decrypt(&key, &ciphertext, &nonce)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
