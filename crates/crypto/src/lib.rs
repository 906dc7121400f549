//! Cryptographic primitives for the Courier secure envelope.
//!
//! This crate provides the leaf services the envelope protocol is assembled
//! from. Each service is a thin wrapper around a vetted RustCrypto
//! implementation that enforces its parameter contract (key and IV lengths,
//! key encodings) and reports misuse through [`CryptoError`].
//!
//! # Core Capabilities
//!
//! - **Hashing**: SHA-256 digests with constant-time verification
//! - **Symmetric Encryption**: AES-256 bodies with a fresh IV per call
//! - **Asymmetric Encryption**: RSA-2048 OAEP for one-time key exchange
//! - **Digital Signatures**: RSASSA-PKCS1-v1_5 over SHA-256
//!
//! # Fixed Algorithms
//!
//! Primitive choices are fixed, not configurable:
//! - **Hashing**: SHA-256 (32-byte digests)
//! - **Symmetric**: AES-256-CTR, 32-byte keys, 16-byte IVs
//! - **Asymmetric**: RSA-2048, OAEP with SHA-256, keys as PEM (SPKI / PKCS#8)
//! - **Signatures**: PKCS#1 v1.5 with SHA-256
//!
//! # Security Principles
//!
//! - Never roll custom cryptographic primitives
//! - Secrets must never be logged or hardcoded
//! - Digest comparison is constant-time
//! - One-time keys and private key encodings are zeroized after use

pub mod asymmetric;
pub mod error;
pub mod hash;
pub mod signing;
pub mod symmetric;

pub use asymmetric::{KeyPair, KEY_BITS};
pub use error::{CryptoError, CryptoResult};
pub use hash::DIGEST_LENGTH;
pub use symmetric::{SymmetricCiphertext, IV_LENGTH, KEY_LENGTH};

/// Stable short identifier for a public key, safe to log.
///
/// The first 16 bytes of the BLAKE3 hash of the key encoding, hex-encoded.
pub fn key_fingerprint(public_key: &str) -> String {
    let hash = blake3::hash(public_key.as_bytes());
    hex::encode(&hash.as_bytes()[..16])
}
