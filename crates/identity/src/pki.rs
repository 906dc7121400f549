//! Public Key Infrastructure (PKI) for Courier identities.
//!
//! A single certificate authority binds principal names to RSA public keys.
//! Certificates are self-contained: each one embeds the issuer's public key so
//! a receiver can verify it without any other distribution channel.
//!
//! # Canonical Form
//!
//! The issuer signs the compact JSON object
//! `{subject, issuer, publicKey, serialNumber, issuedAt, expiresAt}` with the
//! fields in exactly that order and timestamps rendered as RFC 3339 UTC with
//! millisecond precision. Timestamps are truncated to milliseconds at issuance
//! so the rendered form survives a round trip through the wire record.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use courier_crypto::{asymmetric, signing, KeyPair};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{IdentityError, IdentityResult};

/// Random bytes per serial number (128 bits).
pub const SERIAL_BYTES: usize = 16;

/// Default validity period for issued certificates.
pub const DEFAULT_VALIDITY_DAYS: i64 = 365;

/// Signed binding of a subject name to its public key.
///
/// Immutable after issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    subject: String,
    issuer: String,
    subject_public_key: String,
    serial_number: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    signature: Vec<u8>,
    issuer_public_key: String,
}

/// Wire form of a [`Certificate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub subject: String,
    pub issuer: String,
    pub public_key: String,
    pub serial_number: String,
    pub issued_at: String,
    pub expires_at: String,
    /// Base64 issuer signature
    pub signature: String,
    pub ca_public_key: String,
}

/// Fields covered by the issuer signature, in signing order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalCertificate<'a> {
    subject: &'a str,
    issuer: &'a str,
    public_key: &'a str,
    serial_number: &'a str,
    issued_at: String,
    expires_at: String,
}

/// A single reason a certificate failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateFault {
    Expired,
    NotYetValid,
    InvalidSignature,
}

impl std::fmt::Display for CertificateFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            CertificateFault::Expired => "certificate expired",
            CertificateFault::NotYetValid => "certificate not yet valid",
            CertificateFault::InvalidSignature => "certificate has invalid signature",
        };
        f.write_str(text)
    }
}

/// Result of [`Certificate::validate`]. Every applicable fault is listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateValidation {
    pub valid: bool,
    pub faults: Vec<CertificateFault>,
}

impl CertificateValidation {
    /// Human-readable fault messages, in check order.
    pub fn errors(&self) -> Vec<String> {
        self.faults.iter().map(ToString::to_string).collect()
    }
}

impl Certificate {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// PEM public key of the certified subject.
    pub fn subject_public_key(&self) -> &str {
        &self.subject_public_key
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// PEM public key of the issuing authority, embedded at issuance.
    pub fn issuer_public_key(&self) -> &str {
        &self.issuer_public_key
    }

    /// Validate against the current time.
    pub fn validate(&self) -> CertificateValidation {
        self.validate_at(Utc::now())
    }

    /// Validate as of `at`.
    ///
    /// Checks do not short-circuit: expiry, not-yet-valid and the issuer
    /// signature are all evaluated and every failure is reported.
    pub fn validate_at(&self, at: DateTime<Utc>) -> CertificateValidation {
        let mut faults = Vec::new();

        if at > self.expires_at {
            faults.push(CertificateFault::Expired);
        }

        if at < self.issued_at {
            faults.push(CertificateFault::NotYetValid);
        }

        let signature_ok = self
            .canonical_bytes()
            .map(|bytes| signing::verify(&bytes, &self.signature, &self.issuer_public_key))
            .unwrap_or(false);
        if !signature_ok {
            faults.push(CertificateFault::InvalidSignature);
        }

        CertificateValidation {
            valid: faults.is_empty(),
            faults,
        }
    }

    /// Convert to the wire record.
    pub fn to_record(&self) -> CertificateRecord {
        CertificateRecord {
            subject: self.subject.clone(),
            issuer: self.issuer.clone(),
            public_key: self.subject_public_key.clone(),
            serial_number: self.serial_number.clone(),
            issued_at: format_timestamp(self.issued_at),
            expires_at: format_timestamp(self.expires_at),
            signature: STANDARD.encode(&self.signature),
            ca_public_key: self.issuer_public_key.clone(),
        }
    }

    /// Reconstruct from a wire record, checking every field's presence and shape.
    pub fn from_record(record: &CertificateRecord) -> IdentityResult<Self> {
        require_non_empty("subject", &record.subject)?;
        require_non_empty("issuer", &record.issuer)?;
        require_non_empty("publicKey", &record.public_key)?;
        require_non_empty("caPublicKey", &record.ca_public_key)?;

        if record.serial_number.len() != SERIAL_BYTES * 2
            || !record.serial_number.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(IdentityError::MalformedCertificate(format!(
                "serialNumber must be {} hex characters",
                SERIAL_BYTES * 2
            )));
        }

        let issued_at = parse_timestamp("issuedAt", &record.issued_at)?;
        let expires_at = parse_timestamp("expiresAt", &record.expires_at)?;

        let signature = STANDARD.decode(&record.signature).map_err(|e| {
            IdentityError::MalformedCertificate(format!("signature is not valid base64: {}", e))
        })?;
        if signature.is_empty() {
            return Err(IdentityError::MalformedCertificate(
                "signature must not be empty".to_string(),
            ));
        }

        Ok(Self {
            subject: record.subject.clone(),
            issuer: record.issuer.clone(),
            subject_public_key: record.public_key.clone(),
            serial_number: record.serial_number.clone(),
            issued_at,
            expires_at,
            signature,
            issuer_public_key: record.ca_public_key.clone(),
        })
    }

    /// Serialize the wire record as JSON.
    pub fn to_json(&self) -> IdentityResult<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    /// Parse a JSON wire record and reconstruct the certificate.
    pub fn from_json(json: &str) -> IdentityResult<Self> {
        let record: CertificateRecord = serde_json::from_str(json)
            .map_err(|e| IdentityError::MalformedCertificate(e.to_string()))?;
        Self::from_record(&record)
    }

    fn canonical_bytes(&self) -> IdentityResult<Vec<u8>> {
        canonical_bytes(
            &self.subject,
            &self.issuer,
            &self.subject_public_key,
            &self.serial_number,
            self.issued_at,
            self.expires_at,
        )
    }
}

/// Certificate Authority issuing certificates for one trust domain.
#[derive(Debug)]
pub struct CertificateAuthority {
    /// CA name, stamped as issuer
    name: String,
    /// CA key pair
    keys: KeyPair,
}

impl CertificateAuthority {
    /// Create a new certificate authority with a fresh key pair.
    pub fn new(name: impl Into<String>) -> IdentityResult<Self> {
        let name = name.into();
        let keys = asymmetric::generate_key_pair()?;
        tracing::info!(
            ca = %name,
            key_id = %courier_crypto::key_fingerprint(&keys.public_key),
            "Certificate authority created"
        );
        Ok(Self { name, keys })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// PEM public key of this authority.
    pub fn public_key(&self) -> &str {
        &self.keys.public_key
    }

    /// Issue a certificate binding `subject` to `subject_public_key`.
    ///
    /// A non-positive `validity` is accepted and yields a certificate that is
    /// already expired.
    pub fn issue_certificate(
        &self,
        subject: &str,
        subject_public_key: &str,
        validity: Duration,
    ) -> IdentityResult<Certificate> {
        let mut serial = [0u8; SERIAL_BYTES];
        OsRng.fill_bytes(&mut serial);
        let serial_number = hex::encode(serial);

        let issued_at = Utc::now().trunc_subsecs(3);
        let expires_at = issued_at
            .checked_add_signed(validity)
            .ok_or_else(|| {
                IdentityError::MalformedCertificate(
                    "validity period overflows the timestamp range".to_string(),
                )
            })?
            .trunc_subsecs(3);

        let canonical = canonical_bytes(
            subject,
            &self.name,
            subject_public_key,
            &serial_number,
            issued_at,
            expires_at,
        )?;
        let signature = signing::sign(&canonical, &self.keys.private_key)?;

        tracing::info!(
            ca = %self.name,
            subject = %subject,
            serial = %serial_number,
            expires_at = %format_timestamp(expires_at),
            "Certificate issued"
        );

        Ok(Certificate {
            subject: subject.to_string(),
            issuer: self.name.clone(),
            subject_public_key: subject_public_key.to_string(),
            serial_number,
            issued_at,
            expires_at,
            signature,
            issuer_public_key: self.keys.public_key.clone(),
        })
    }

    /// Issue a certificate valid for `days` days.
    pub fn issue_certificate_for_days(
        &self,
        subject: &str,
        subject_public_key: &str,
        days: i64,
    ) -> IdentityResult<Certificate> {
        let validity = Duration::try_days(days).ok_or_else(|| {
            IdentityError::MalformedCertificate(format!("validity of {} days is out of range", days))
        })?;
        self.issue_certificate(subject, subject_public_key, validity)
    }
}

fn canonical_bytes(
    subject: &str,
    issuer: &str,
    public_key: &str,
    serial_number: &str,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> IdentityResult<Vec<u8>> {
    let canonical = CanonicalCertificate {
        subject,
        issuer,
        public_key,
        serial_number,
        issued_at: format_timestamp(issued_at),
        expires_at: format_timestamp(expires_at),
    };
    Ok(serde_json::to_vec(&canonical)?)
}

/// RFC 3339, UTC, millisecond precision, `Z` suffix.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(field: &str, value: &str) -> IdentityResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| IdentityError::MalformedCertificate(format!("{} is not RFC 3339: {}", field, e)))
}

fn require_non_empty(field: &str, value: &str) -> IdentityResult<()> {
    if value.trim().is_empty() {
        return Err(IdentityError::MalformedCertificate(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}
