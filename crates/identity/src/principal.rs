//! Principals: named holders of a key pair and an identity certificate.
//!
//! A principal is assembled once through [`PrincipalBuilder`]: the key pair is
//! generated when the builder is created, the CA issues a certificate for the
//! builder's public key, and [`PrincipalBuilder::build`] freezes both. A built
//! principal has no way to swap its certificate.
//!
//! # Envelope Protocol
//!
//! Sending: digest the plaintext, encrypt it under a one-time symmetric key,
//! wrap that key for the recipient, sign the ciphertext.
//!
//! Receiving validates in strict order and stops at the first failure:
//! certificate, signature over the ciphertext, key unwrap, body decryption,
//! digest. Nothing is decrypted before the signature has been confirmed.

use chrono::Utc;
use courier_crypto::{asymmetric, hash, key_fingerprint, signing, symmetric, KeyPair};
use zeroize::Zeroizing;

use crate::envelope::{
    decode_field, encode_field, ReceiveOutcome, SecureEnvelope, INTEGRITY_COMPROMISED,
    SIGNATURE_INVALID,
};
use crate::pki::{format_timestamp, Certificate};
use crate::{IdentityError, IdentityResult};

/// Staging area for a principal whose certificate has not been issued yet.
#[derive(Debug)]
pub struct PrincipalBuilder {
    name: String,
    keys: KeyPair,
    certificate: Option<Certificate>,
}

impl PrincipalBuilder {
    /// Start a principal, generating its key pair.
    pub fn new(name: impl Into<String>) -> IdentityResult<Self> {
        let name = name.into();
        let keys = asymmetric::generate_key_pair()?;
        Ok(Self {
            name,
            keys,
            certificate: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// PEM public key to present to the certificate authority.
    pub fn public_key(&self) -> &str {
        &self.keys.public_key
    }

    /// Bind the certificate issued for this principal.
    pub fn certificate(mut self, certificate: Certificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    /// Freeze the principal.
    ///
    /// Fails with [`IdentityError::MalformedCertificate`] if the bound
    /// certificate was issued for a different public key.
    pub fn build(self) -> IdentityResult<Principal> {
        if let Some(certificate) = &self.certificate {
            if certificate.subject_public_key() != self.keys.public_key {
                tracing::warn!(
                    principal = %self.name,
                    subject = %certificate.subject(),
                    "Bound certificate does not certify this principal's key"
                );
                return Err(IdentityError::MalformedCertificate(format!(
                    "certificate for {} does not certify the key of {}",
                    certificate.subject(),
                    self.name
                )));
            }
        }

        tracing::debug!(
            principal = %self.name,
            key_id = %key_fingerprint(&self.keys.public_key),
            certified = self.certificate.is_some(),
            "Principal built"
        );

        Ok(Principal {
            name: self.name,
            keys: self.keys,
            certificate: self.certificate,
        })
    }
}

/// A named party that can send and receive secure envelopes.
#[derive(Debug, Clone)]
pub struct Principal {
    name: String,
    keys: KeyPair,
    certificate: Option<Certificate>,
}

impl Principal {
    /// Shorthand for [`PrincipalBuilder::new`].
    pub fn builder(name: impl Into<String>) -> IdentityResult<PrincipalBuilder> {
        PrincipalBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_key(&self) -> &str {
        &self.keys.public_key
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    pub fn is_certified(&self) -> bool {
        self.certificate.is_some()
    }

    /// Seal `plaintext` for `recipient`.
    ///
    /// Both parties must hold a certificate; this is checked before any
    /// cryptographic work starts.
    pub fn send_secure_message(
        &self,
        plaintext: &str,
        recipient: &Principal,
    ) -> IdentityResult<SecureEnvelope> {
        let certificate = self
            .certificate
            .as_ref()
            .ok_or_else(|| IdentityError::MissingCertificate {
                principal: self.name.clone(),
            })?;
        if recipient.certificate.is_none() {
            return Err(IdentityError::RecipientMissingCertificate {
                recipient: recipient.name.clone(),
            });
        }

        let message_hash = hash::digest(plaintext);
        let key = symmetric::generate_key();
        let sealed = symmetric::encrypt(plaintext.as_bytes(), key.as_slice())?;
        let encrypted_key = asymmetric::encrypt(key.as_slice(), &recipient.keys.public_key)?;
        let signature = signing::sign(&sealed.ciphertext, &self.keys.private_key)?;

        tracing::debug!(
            from = %self.name,
            to = %recipient.name,
            ciphertext_len = sealed.ciphertext.len(),
            "Envelope sealed"
        );

        Ok(SecureEnvelope {
            from: self.name.clone(),
            to: recipient.name.clone(),
            ciphertext: encode_field(&sealed.ciphertext),
            iv: encode_field(&sealed.iv),
            encrypted_symmetric_key: encode_field(&encrypted_key),
            signature: encode_field(&signature),
            message_hash: encode_field(&message_hash),
            sender_certificate: certificate.to_record(),
            timestamp: format_timestamp(Utc::now()),
        })
    }

    /// Open an envelope addressed to this principal.
    ///
    /// Never fails: every rejection, including malformed input and decryption
    /// errors, is reported in the returned [`ReceiveOutcome`].
    pub fn receive_secure_message(&self, envelope: &SecureEnvelope) -> ReceiveOutcome {
        let mut outcome = ReceiveOutcome::default();

        if envelope.to != self.name {
            tracing::debug!(
                principal = %self.name,
                addressed_to = %envelope.to,
                "Envelope addressed to another principal"
            );
        }

        let certificate = match Certificate::from_record(&envelope.sender_certificate) {
            Ok(certificate) => certificate,
            Err(e) => {
                tracing::warn!(principal = %self.name, from = %envelope.from, error = %e, "Rejected envelope");
                outcome.errors.push(e.to_string());
                return outcome;
            }
        };

        let validation = certificate.validate();
        outcome.validations.certificate_valid = validation.valid;
        if !validation.valid {
            tracing::warn!(
                principal = %self.name,
                from = %envelope.from,
                serial = %certificate.serial_number(),
                "Rejected envelope: sender certificate invalid"
            );
            outcome.errors.extend(validation.errors());
            return outcome;
        }
        tracing::debug!(principal = %self.name, subject = %certificate.subject(), "Sender certificate valid");

        if let Err(e) = self.open(envelope, &certificate, &mut outcome) {
            tracing::warn!(principal = %self.name, from = %envelope.from, error = %e, "Failed to process envelope");
            outcome.errors.push(format!("failed to process message: {}", e));
        }

        outcome
    }

    /// Signature, key unwrap, decryption and digest stages.
    fn open(
        &self,
        envelope: &SecureEnvelope,
        certificate: &Certificate,
        outcome: &mut ReceiveOutcome,
    ) -> IdentityResult<()> {
        let ciphertext = decode_field("ciphertext", &envelope.ciphertext)?;
        let iv = decode_field("iv", &envelope.iv)?;
        let encrypted_key = decode_field("encryptedSymmetricKey", &envelope.encrypted_symmetric_key)?;
        let signature = decode_field("signature", &envelope.signature)?;
        let message_hash = decode_field("messageHash", &envelope.message_hash)?;

        outcome.validations.signature_valid =
            signing::verify(&ciphertext, &signature, certificate.subject_public_key());
        if !outcome.validations.signature_valid {
            tracing::warn!(principal = %self.name, from = %envelope.from, "Rejected envelope: signature invalid");
            outcome.errors.push(SIGNATURE_INVALID.to_string());
            return Ok(());
        }
        tracing::debug!(principal = %self.name, "Envelope signature valid");

        let key = Zeroizing::new(asymmetric::decrypt(&encrypted_key, &self.keys.private_key)?);
        let plaintext = Zeroizing::new(symmetric::decrypt(&ciphertext, key.as_slice(), &iv)?);

        outcome.validations.integrity_valid = hash::verify(plaintext.as_slice(), &message_hash);
        if !outcome.validations.integrity_valid {
            tracing::warn!(principal = %self.name, from = %envelope.from, "Rejected envelope: digest mismatch");
            outcome.errors.push(INTEGRITY_COMPROMISED.to_string());
            return Ok(());
        }

        let message = String::from_utf8(plaintext.to_vec())
            .map_err(|e| IdentityError::MalformedEnvelope(format!("plaintext is not UTF-8: {}", e)))?;

        tracing::info!(principal = %self.name, from = %envelope.from, "Envelope accepted");
        outcome.success = true;
        outcome.message = Some(message);
        Ok(())
    }
}
