//! # Shared Crypto - AIONET Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 (hex), BLAKE3 KDF | Artifact hashes, key derivation |
//! | `signatures` | HMAC-SHA256 keyed by public key | Signing stand-in for device keys |
//! | `symmetric` | XChaCha20-Poly1305 | Message content encryption |
//! | `merkle` | Pairwise SHA-256 | Block message roots |
//! | `pow` | Leading-zero hex target | Sealing transactions, messages, blocks |
//!
//! ## Security Properties
//!
//! - Key material and nonces come from the OS-seeded `rand::thread_rng` CSPRNG.
//! - The signing scheme is NOT asymmetric: anyone holding the public key can
//!   produce a valid signature. It preserves the sign/verify round-trip and
//!   tamper detection only. Swap in Ed25519 for genuine authenticity.
//! - Proof-of-work search is always bounded by an iteration budget and can be
//!   cancelled through an `AtomicBool`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod merkle;
pub mod pow;
pub mod signatures;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake3_derive_key, hash_canonical, random_hex, sha256_hex, sha256_hex_many};
pub use merkle::merkle_root;
pub use pow::{meets_difficulty, pow_digest, PowSeal, ProofOfWork};
pub use signatures::{sign_with_public_key, verify_signature, DeviceKeyPair};
pub use symmetric::{open_text, seal_text, SealedText, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
