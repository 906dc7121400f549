//! Trust domain: one certificate authority and the principals it certified.
//!
//! Owns all demo state explicitly. Re-initialising means bootstrapping a new
//! domain and dropping the old one; there is no ambient global.

use std::collections::BTreeMap;

use crate::envelope::{ReceiveOutcome, SecureEnvelope};
use crate::pki::CertificateAuthority;
use crate::principal::Principal;
use crate::{IdentityError, IdentityResult};

#[derive(Debug)]
pub struct TrustDomain {
    ca: CertificateAuthority,
    principals: BTreeMap<String, Principal>,
}

impl TrustDomain {
    /// Create a CA named `ca_name` and one certified principal per name.
    pub fn bootstrap<I, S>(ca_name: &str, names: I, validity_days: i64) -> IdentityResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if ca_name.trim().is_empty() {
            return Err(IdentityError::InvalidDomain(
                "CA name must not be empty".to_string(),
            ));
        }

        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(IdentityError::InvalidDomain(
                "at least one principal is required".to_string(),
            ));
        }

        let mut domain = Self {
            ca: CertificateAuthority::new(ca_name)?,
            principals: BTreeMap::new(),
        };

        for name in names {
            let builder = Principal::builder(name.clone())?;
            let certificate =
                domain
                    .ca
                    .issue_certificate_for_days(&name, builder.public_key(), validity_days)?;
            domain.register(builder.certificate(certificate).build()?)?;
        }

        tracing::info!(
            ca = %ca_name,
            principals = domain.principals.len(),
            "Trust domain bootstrapped"
        );
        Ok(domain)
    }

    /// Add a principal built outside the domain (for example one left uncertified).
    pub fn register(&mut self, principal: Principal) -> IdentityResult<()> {
        if self.principals.contains_key(principal.name()) {
            return Err(IdentityError::InvalidDomain(format!(
                "duplicate principal name: {}",
                principal.name()
            )));
        }
        self.principals
            .insert(principal.name().to_string(), principal);
        Ok(())
    }

    pub fn ca(&self) -> &CertificateAuthority {
        &self.ca
    }

    pub fn principal(&self, name: &str) -> Option<&Principal> {
        self.principals.get(name)
    }

    /// Registered principal names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.principals.keys().map(String::as_str)
    }

    /// Seal `plaintext` from `sender` to `recipient`.
    pub fn send(
        &self,
        sender: &str,
        recipient: &str,
        plaintext: &str,
    ) -> IdentityResult<SecureEnvelope> {
        let from = self.lookup(sender)?;
        let to = self.lookup(recipient)?;
        from.send_secure_message(plaintext, to)
    }

    /// Deliver `envelope` to `recipient`.
    pub fn receive(
        &self,
        recipient: &str,
        envelope: &SecureEnvelope,
    ) -> IdentityResult<ReceiveOutcome> {
        Ok(self.lookup(recipient)?.receive_secure_message(envelope))
    }

    /// Interceptor's view of `envelope`: ciphertext replaced, signature kept.
    pub fn tamper_ciphertext(&self, envelope: &SecureEnvelope) -> SecureEnvelope {
        tracing::info!(from = %envelope.from, to = %envelope.to, "Ciphertext replaced in transit");
        envelope.tampered()
    }

    fn lookup(&self, name: &str) -> IdentityResult<&Principal> {
        self.principals
            .get(name)
            .ok_or_else(|| IdentityError::UnknownPrincipal {
                name: name.to_string(),
            })
    }
}
