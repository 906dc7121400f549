//! Identity binding and the secure envelope protocol for Courier.
//!
//! This crate provides the certificate trust model and the principals that
//! exchange secure envelopes. Every envelope is bound to a certificate issued
//! by the domain's authority, so a receiver can authenticate the sender before
//! it touches the ciphertext.
//!
//! # Core Concepts
//!
//! - **Certificate Authority**: Issues signed name-to-key bindings
//! - **Certificate**: Self-contained binding, verifiable with its embedded CA key
//! - **Principal**: Key pair plus certificate; seals and opens envelopes
//! - **Trust Domain**: One authority and the principals it certified
//!
//! # Security Model
//!
//! Receiving validates certificate, then signature, then decrypts, then
//! checks the plaintext digest, stopping at the first failure. Tampering is
//! an expected input: rejections are reported as a [`ReceiveOutcome`], never
//! as a panic or an error.

pub mod domain;
pub mod envelope;
pub mod error;
pub mod pki;
pub mod principal;

pub use domain::TrustDomain;
pub use envelope::{
    ReceiveOutcome, SecureEnvelope, Validations, INTEGRITY_COMPROMISED, SIGNATURE_INVALID,
    TAMPERED_PAYLOAD,
};
pub use error::{IdentityError, IdentityResult};
pub use pki::{
    Certificate, CertificateAuthority, CertificateFault, CertificateRecord,
    CertificateValidation, DEFAULT_VALIDITY_DAYS,
};
pub use principal::{Principal, PrincipalBuilder};
