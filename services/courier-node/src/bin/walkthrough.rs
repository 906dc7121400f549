//! Walks through the envelope protocol end to end without a network.
//!
//! Scenarios: the first configured principal sends to the second, the reply
//! comes back, an interceptor replaces the ciphertext in transit, and an
//! uncertified principal tries to send.

use anyhow::{bail, Context};
use courier_core::{logging, Config};
use courier_identity::{IdentityError, Principal, TrustDomain};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init_with(&config.logging);

    let domain = &config.domain;
    let mut trust = TrustDomain::bootstrap(
        &domain.ca_name,
        domain.principals.clone(),
        domain.validity_days,
    )
    .context("bootstrapping trust domain")?;
    let [alice, bob] = match domain.principals.as_slice() {
        [first, second, ..] => [first.as_str(), second.as_str()],
        _ => bail!("walkthrough needs two principals"),
    };
    info!(
        ca = %trust.ca().name(),
        principals = ?trust.names().collect::<Vec<_>>(),
        "Scenario 0: trust domain ready"
    );

    let envelope = trust.send(alice, bob, "hello")?;
    info!(
        from = %envelope.from,
        to = %envelope.to,
        serial = %envelope.sender_certificate.serial_number,
        "Scenario 1: envelope sealed"
    );
    let outcome = trust.receive(bob, &envelope)?;
    if !outcome.success {
        bail!("delivery failed: {}", outcome.errors.join(", "));
    }
    info!(validations = ?outcome.validations, "Scenario 1: envelope opened");

    let reply = trust.send(bob, alice, "hello back")?;
    let outcome = trust.receive(alice, &reply)?;
    if !outcome.success {
        bail!("reply failed: {}", outcome.errors.join(", "));
    }
    info!(validations = ?outcome.validations, "Scenario 2: reply opened");

    let tampered = trust.tamper_ciphertext(&envelope);
    let outcome = trust.receive(bob, &tampered)?;
    if outcome.success {
        bail!("tampered envelope was accepted");
    }
    warn!(
        validations = ?outcome.validations,
        errors = ?outcome.errors,
        "Scenario 3: tampered envelope rejected"
    );

    let outsider = "Charlie";
    if trust.principal(outsider).is_some() {
        info!(principal = outsider, "Scenario 4 skipped: principal is certified here");
    } else {
        trust.register(Principal::builder(outsider)?.build()?)?;
        match trust.send(outsider, bob, "let me in") {
            Err(e @ IdentityError::MissingCertificate { .. }) => {
                warn!(error = %e, "Scenario 4: uncertified sender refused");
            }
            Err(e) => return Err(e.into()),
            Ok(_) => bail!("uncertified sender was able to seal an envelope"),
        }
    }

    info!("Walkthrough complete");
    Ok(())
}
