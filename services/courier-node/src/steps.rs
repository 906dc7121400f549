//! Human-readable step logs returned alongside API results.
//!
//! These narrate the protocol for the demo client. They describe what each
//! stage did, never the key material or plaintext involved.

use courier_identity::{ReceiveOutcome, INTEGRITY_COMPROMISED};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Info,
    Crypto,
    Validation,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepLog {
    pub step: u32,
    pub action: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
}

/// Numbers entries in the order they are recorded.
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<StepLog>,
}

impl StepRecorder {
    pub fn record(
        &mut self,
        kind: StepKind,
        action: impl Into<String>,
        description: impl Into<String>,
    ) {
        let step = self.steps.len() as u32 + 1;
        self.steps.push(StepLog {
            step,
            action: action.into(),
            description: description.into(),
            kind,
        });
    }

    pub fn finish(self) -> Vec<StepLog> {
        self.steps
    }
}

pub fn send_steps(sender: &str, recipient: &str) -> Vec<StepLog> {
    let mut steps = StepRecorder::default();
    steps.record(
        StepKind::Info,
        "Starting send",
        format!("{} is preparing a message for {}", sender, recipient),
    );
    steps.record(
        StepKind::Crypto,
        "SHA-256 digest computed",
        "Digest of the original message kept for the integrity check",
    );
    steps.record(
        StepKind::Crypto,
        "AES-256 key generated",
        "Fresh random 256-bit key used for this message only",
    );
    steps.record(
        StepKind::Crypto,
        "Message encrypted with AES-256-CTR",
        "Plaintext turned into ciphertext under the one-time key",
    );
    steps.record(
        StepKind::Crypto,
        "Symmetric key wrapped with RSA-OAEP",
        format!("One-time key encrypted under {}'s public key", recipient),
    );
    steps.record(
        StepKind::Crypto,
        "Digital signature created",
        format!("{} signed the ciphertext with their private key", sender),
    );
    steps.record(
        StepKind::Success,
        "Envelope assembled",
        "Ciphertext, wrapped key, signature, digest and certificate packaged together",
    );
    steps.finish()
}

pub fn receive_steps(recipient: &str, outcome: &ReceiveOutcome) -> Vec<StepLog> {
    let mut steps = StepRecorder::default();
    let errors = outcome.errors.join(", ");

    steps.record(
        StepKind::Info,
        "Envelope received",
        format!("{} received an encrypted envelope", recipient),
    );
    steps.record(
        StepKind::Validation,
        "Validating sender certificate",
        "Checking issuer signature and validity period",
    );
    if !outcome.validations.certificate_valid {
        steps.record(StepKind::Error, "Certificate invalid", errors);
        return steps.finish();
    }
    steps.record(
        StepKind::Success,
        "Certificate valid",
        "Sender certificate verified",
    );

    steps.record(
        StepKind::Validation,
        "Verifying digital signature",
        "Checking the ciphertext against the sender's public key",
    );
    if !outcome.validations.signature_valid {
        steps.record(StepKind::Error, "Signature invalid", errors);
        return steps.finish();
    }
    steps.record(
        StepKind::Success,
        "Signature valid",
        "Sender authenticated and ciphertext unmodified",
    );

    // Unwrap or decryption failed before the digest could be compared
    let processed = outcome.validations.integrity_valid
        || outcome.errors.iter().any(|e| e == INTEGRITY_COMPROMISED);
    if !processed {
        steps.record(StepKind::Error, "Processing failed", errors);
        return steps.finish();
    }

    steps.record(
        StepKind::Crypto,
        "Unwrapping symmetric key",
        format!("{} used their RSA private key to recover the AES key", recipient),
    );
    steps.record(
        StepKind::Crypto,
        "Decrypting message",
        "AES key and IV used to recover the plaintext",
    );
    steps.record(
        StepKind::Validation,
        "Checking integrity",
        "Comparing the SHA-256 digest of the recovered plaintext",
    );
    if !outcome.validations.integrity_valid {
        steps.record(StepKind::Error, "Integrity check failed", errors);
        return steps.finish();
    }
    steps.record(
        StepKind::Success,
        "Integrity verified",
        "Digest matches the original message",
    );
    steps.record(
        StepKind::Success,
        "Message decrypted",
        "Every validation passed",
    );
    steps.finish()
}
