//! Error types for the primitive services.

use thiserror::Error;

/// Errors raised by the primitive services.
///
/// Parameter errors mean the caller misused a primitive and are never
/// silently coerced. `Decryption` is the only cryptographic mismatch error;
/// callers in the receive path are expected to catch it.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length: {actual} (expected {expected})")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid IV length: {actual} (expected {expected})")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Key encoding error: {0}")]
    KeyEncoding(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Result type for primitive operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
