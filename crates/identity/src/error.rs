//! Error types for Courier identity operations.
//!
//! This module covers certificate handling, principal preconditions and the
//! trust-domain registry. Validation failures of a received envelope are not
//! errors; they are reported through [`crate::ReceiveOutcome`].

use courier_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur in identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The sending principal has no bound certificate
    #[error("Principal has no certificate: {principal}")]
    MissingCertificate { principal: String },

    /// The receiving principal has no bound certificate
    #[error("Recipient has no certificate: {recipient}")]
    RecipientMissingCertificate { recipient: String },

    /// Certificate record is missing fields or has fields of the wrong shape
    #[error("Malformed certificate: {0}")]
    MalformedCertificate(String),

    /// Envelope field cannot be decoded
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Name not registered in the trust domain
    #[error("Unknown principal: {name}")]
    UnknownPrincipal { name: String },

    /// Trust domain cannot be built from the given parameters
    #[error("Invalid trust domain: {0}")]
    InvalidDomain(String),

    /// Cryptographic errors
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
