//! Adversarial envelopes
//!
//! An attacker on the wire can read, drop, replay and rewrite envelope fields
//! but holds no private key of the domain.
//!
//! # Test Scenarios
//!
//! 1. **Ciphertext replacement**: signature check fails before decryption
//! 2. **Certificate transplant**: attacker's envelope relabelled with the victim's certificate
//! 3. **Foreign authority**: certificate from another CA is self-consistent
//! 4. **Digest substitution**: caught by the integrity check
//! 5. **Redirected envelope**: envelope for Bob delivered to Alice
//! 6. **Truncated fields**: decoding failures become processing errors

use crate::test_utils::{alice_and_bob, certified_by, init_tracing};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use courier_identity::{CertificateAuthority, INTEGRITY_COMPROMISED, SIGNATURE_INVALID};

#[test]
fn test_ciphertext_replacement_detected() {
    init_tracing();
    let domain = alice_and_bob();
    let envelope = domain.send("Alice", "Bob", "hello").unwrap();
    let tampered = domain.tamper_ciphertext(&envelope);

    assert_eq!(STANDARD.decode(&tampered.ciphertext).unwrap(), b"TAMPERED MESSAGE");
    assert_eq!(tampered.signature, envelope.signature);

    let outcome = domain.receive("Bob", &tampered).unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.is_none());
    assert!(outcome.validations.certificate_valid);
    assert!(!outcome.validations.signature_valid);
    assert!(!outcome.validations.integrity_valid);
    assert_eq!(outcome.errors, vec![SIGNATURE_INVALID.to_string()]);
}

#[test]
fn test_certificate_transplant_detected() {
    let domain = alice_and_bob();
    let ca = CertificateAuthority::new("Shadow CA").unwrap();
    let mallory = certified_by(&ca, "Mallory", 365);

    // Mallory seals for Bob, then relabels the envelope with Alice's
    // certificate; her signature cannot verify under Alice's key
    let mut envelope = mallory
        .send_secure_message("send the keys", domain.principal("Bob").unwrap())
        .unwrap();
    envelope.from = "Alice".to_string();
    envelope.sender_certificate = domain
        .principal("Alice")
        .unwrap()
        .certificate()
        .unwrap()
        .to_record();

    let outcome = domain.receive("Bob", &envelope).unwrap();
    assert!(outcome.validations.certificate_valid);
    assert!(!outcome.validations.signature_valid);
    assert_eq!(outcome.errors, vec![SIGNATURE_INVALID.to_string()]);
}

#[test]
fn test_foreign_authority_certificate_is_self_consistent() {
    // No trust anchor: validation only checks the certificate against the
    // CA key it carries
    let domain = alice_and_bob();
    let shadow = CertificateAuthority::new("Shadow CA").unwrap();
    let mallory = certified_by(&shadow, "Mallory", 365);

    let envelope = mallory
        .send_secure_message("hi Bob", domain.principal("Bob").unwrap())
        .unwrap();
    let outcome = domain.receive("Bob", &envelope).unwrap();
    assert!(outcome.success);
    assert_eq!(envelope.sender_certificate.issuer, "Shadow CA");
    assert_ne!(
        envelope.sender_certificate.ca_public_key,
        domain.ca().public_key()
    );
}

#[test]
fn test_substituted_digest_fails_integrity() {
    // Signature covers only the ciphertext, so a swapped digest gets past it
    let domain = alice_and_bob();
    let ca = CertificateAuthority::new("Academic CA").unwrap();
    let eve = certified_by(&ca, "Eve", 365);
    let mut envelope = eve
        .send_secure_message("original", domain.principal("Bob").unwrap())
        .unwrap();
    let forged_plain = eve
        .send_secure_message("forged!!", domain.principal("Bob").unwrap())
        .unwrap();
    envelope.message_hash = forged_plain.message_hash;

    let outcome = domain.receive("Bob", &envelope).unwrap();
    assert!(outcome.validations.signature_valid);
    assert!(!outcome.validations.integrity_valid);
    assert_eq!(outcome.errors, vec![INTEGRITY_COMPROMISED.to_string()]);
}

#[test]
fn test_redirected_envelope_cannot_be_opened() {
    let domain = alice_and_bob();
    let envelope = domain.send("Alice", "Bob", "for Bob only").unwrap();

    let outcome = domain.receive("Alice", &envelope).unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.is_none());
    assert!(outcome.validations.signature_valid);
    assert!(outcome.errors[0].starts_with("failed to process message"));
}

#[test]
fn test_truncated_fields_become_processing_errors() {
    let domain = alice_and_bob();
    let envelope = domain.send("Alice", "Bob", "hello").unwrap();

    let mut bad_key = envelope.clone();
    bad_key.encrypted_symmetric_key = STANDARD.encode([0u8; 8]);
    let outcome = domain.receive("Bob", &bad_key).unwrap();
    assert!(!outcome.success);
    assert!(outcome.validations.signature_valid);
    assert!(outcome.errors[0].starts_with("failed to process message"));

    let mut bad_signature = envelope.clone();
    bad_signature.signature = STANDARD.encode([1u8; 3]);
    let outcome = domain.receive("Bob", &bad_signature).unwrap();
    assert!(!outcome.validations.signature_valid);
    assert_eq!(outcome.errors, vec![SIGNATURE_INVALID.to_string()]);

    let mut bad_iv = envelope;
    bad_iv.iv = STANDARD.encode([2u8; 4]);
    let outcome = domain.receive("Bob", &bad_iv).unwrap();
    assert!(!outcome.success);
    assert!(outcome.errors[0].starts_with("failed to process message"));
}
