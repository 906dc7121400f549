//! Secure message envelope and the structured result of receiving one.
//!
//! Binary fields travel as standard base64 so the envelope can be carried as
//! JSON by any transport without modification.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::pki::CertificateRecord;
use crate::{IdentityError, IdentityResult};

/// Error reported when the signature over the ciphertext does not verify.
pub const SIGNATURE_INVALID: &str = "signature invalid - message may have been tampered with";

/// Error reported when the decrypted plaintext does not match its digest.
pub const INTEGRITY_COMPROMISED: &str = "hash mismatch - integrity compromised";

/// Replacement body an interceptor substitutes in [`SecureEnvelope::tampered`].
pub const TAMPERED_PAYLOAD: &[u8] = b"TAMPERED MESSAGE";

/// The package transmitted from sender to receiver for one message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecureEnvelope {
    pub from: String,
    pub to: String,
    /// Symmetric-encrypted body (base64)
    pub ciphertext: String,
    /// IV for the body cipher (base64)
    pub iv: String,
    /// One-time key encrypted under the recipient's public key (base64)
    pub encrypted_symmetric_key: String,
    /// Sender signature over the ciphertext bytes (base64)
    pub signature: String,
    /// Digest of the original plaintext (base64)
    pub message_hash: String,
    pub sender_certificate: CertificateRecord,
    /// RFC 3339 creation time
    pub timestamp: String,
}

impl SecureEnvelope {
    pub fn to_json(&self) -> IdentityResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> IdentityResult<Self> {
        serde_json::from_str(json).map_err(|e| IdentityError::MalformedEnvelope(e.to_string()))
    }

    /// Copy of this envelope with the ciphertext swapped for [`TAMPERED_PAYLOAD`].
    ///
    /// Every other field, the signature included, is left untouched. This is
    /// the interception an attacker without the sender's private key can do.
    pub fn tampered(&self) -> Self {
        Self {
            ciphertext: STANDARD.encode(TAMPERED_PAYLOAD),
            ..self.clone()
        }
    }
}

/// Per-stage verdicts of a receive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    pub certificate_valid: bool,
    pub signature_valid: bool,
    pub integrity_valid: bool,
}

/// Structured result of [`crate::Principal::receive_secure_message`].
///
/// `message` is only set when every stage passed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub validations: Validations,
    pub errors: Vec<String>,
}

pub(crate) fn encode_field(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn decode_field(field: &str, value: &str) -> IdentityResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| IdentityError::MalformedEnvelope(format!("{} is not valid base64: {}", field, e)))
}
