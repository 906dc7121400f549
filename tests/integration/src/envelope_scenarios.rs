//! Envelope protocol scenarios across the crypto and identity crates.
//!
//! The envelope fields are checked against the primitives directly, so a
//! change in how the identity crate composes them shows up here.

use crate::test_utils::{alice_and_bob, certified_by, init_tracing};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};
use courier_crypto::{hash, signing, symmetric, DIGEST_LENGTH, IV_LENGTH};
use courier_identity::{
    Certificate, CertificateAuthority, CertificateFault, SecureEnvelope, DEFAULT_VALIDITY_DAYS,
};

fn decode(value: &str) -> Vec<u8> {
    STANDARD.decode(value).expect("field is not base64")
}

#[test]
fn test_envelope_fields_match_primitives() {
    init_tracing();
    let domain = alice_and_bob();
    let envelope = domain.send("Alice", "Bob", "hello").unwrap();

    // Digest of the plaintext, not of the ciphertext
    let digest = decode(&envelope.message_hash);
    assert_eq!(digest.len(), DIGEST_LENGTH);
    assert!(hash::verify("hello", &digest));

    assert_eq!(decode(&envelope.iv).len(), IV_LENGTH);

    // Signature covers exactly the ciphertext bytes under Alice's key
    let alice = domain.principal("Alice").unwrap();
    let ciphertext = decode(&envelope.ciphertext);
    let signature = decode(&envelope.signature);
    assert!(signing::verify(&ciphertext, &signature, alice.public_key()));
    assert!(!signing::verify(b"hello", &signature, alice.public_key()));

    // Wrapped key is a full RSA-2048 block
    assert_eq!(decode(&envelope.encrypted_symmetric_key).len(), 256);
}

#[test]
fn test_symmetric_wrong_key_yields_garbage_not_error() {
    let key = symmetric::generate_key();
    let other = symmetric::generate_key();
    let sealed = symmetric::encrypt(b"attack at dawn", key.as_slice()).unwrap();

    let garbage = symmetric::decrypt(&sealed.ciphertext, other.as_slice(), &sealed.iv).unwrap();
    assert_ne!(garbage, b"attack at dawn");
    assert!(!hash::verify(&garbage, &hash::digest("attack at dawn")));
}

#[test]
fn test_certificate_lifecycle() {
    let ca = CertificateAuthority::new("Academic CA").unwrap();
    let alice = certified_by(&ca, "Alice", DEFAULT_VALIDITY_DAYS);
    let cert = alice.certificate().unwrap();

    assert!(cert.validate().valid);
    assert_eq!(cert.expires_at() - cert.issued_at(), Duration::days(365));

    // Evaluated just past expiry
    let later = cert.validate_at(cert.expires_at() + Duration::seconds(1));
    assert!(!later.valid);
    assert_eq!(later.faults, vec![CertificateFault::Expired]);

    // Evaluated before issuance
    let earlier = cert.validate_at(cert.issued_at() - Duration::seconds(1));
    assert_eq!(earlier.errors(), vec!["certificate not yet valid".to_string()]);

    let expired = certified_by(&ca, "Old", -1);
    let verdict = expired.certificate().unwrap().validate_at(Utc::now());
    assert!(!verdict.valid);
    assert!(verdict.errors().contains(&"certificate expired".to_string()));
}

#[test]
fn test_validation_verdict_survives_serialization() {
    let ca = CertificateAuthority::new("Academic CA").unwrap();
    for days in [365, -1] {
        let principal = certified_by(&ca, "Subject", days);
        let cert = principal.certificate().unwrap();
        let restored = Certificate::from_json(&cert.to_json().unwrap()).unwrap();
        assert_eq!(restored.validate(), cert.validate());
    }

    // Forged field invalidates the issuer signature after a round trip
    let mut record = certified_by(&ca, "Alice", 365).certificate().unwrap().to_record();
    record.subject = "Mallory".to_string();
    let forged = Certificate::from_record(&record).unwrap();
    assert_eq!(forged.validate().faults, vec![CertificateFault::InvalidSignature]);
}

#[test]
fn test_envelope_json_roundtrip_then_receive() {
    let domain = alice_and_bob();
    let envelope = domain.send("Bob", "Alice", "olá, 世界 🌍").unwrap();

    let wire = serde_json::to_string(&envelope).unwrap();
    let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
    assert!(value.get("encryptedSymmetricKey").is_some());
    assert!(value["senderCertificate"].get("caPublicKey").is_some());

    let restored = SecureEnvelope::from_json(&wire).unwrap();
    let outcome = domain.receive("Alice", &restored).unwrap();
    assert_eq!(outcome.message.as_deref(), Some("olá, 世界 🌍"));
}

#[test]
fn test_many_messages_each_open() {
    let domain = alice_and_bob();
    for i in 0..5 {
        let text = format!("message {}", i);
        let envelope = domain.send("Alice", "Bob", &text).unwrap();
        let outcome = domain.receive("Bob", &envelope).unwrap();
        assert_eq!(outcome.message.as_deref(), Some(text.as_str()));
    }
}
