use courier_core::config::{Config, DomainConfig};
use courier_identity::TrustDomain;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::error::{NodeError, NodeResult};

pub struct AppState {
    pub config: Config,
    domain: RwLock<TrustDomain>,
}

impl AppState {
    pub async fn new(config: Config) -> NodeResult<Self> {
        let domain = bootstrap(config.domain.clone()).await?;
        Ok(AppState {
            config,
            domain: RwLock::new(domain),
        })
    }

    pub async fn domain(&self) -> RwLockReadGuard<'_, TrustDomain> {
        self.domain.read().await
    }

    /// Replace the CA and every principal with freshly generated ones.
    ///
    /// Envelopes issued before the reset no longer open.
    pub async fn reset(&self) -> NodeResult<()> {
        let fresh = bootstrap(self.config.domain.clone()).await?;
        *self.domain.write().await = fresh;
        tracing::info!(ca = %self.config.domain.ca_name, "Trust domain reset");
        Ok(())
    }
}

/// RSA key generation runs on the blocking pool.
async fn bootstrap(config: DomainConfig) -> NodeResult<TrustDomain> {
    let domain = tokio::task::spawn_blocking(move || {
        TrustDomain::bootstrap(&config.ca_name, config.principals, config.validity_days)
    })
    .await
    .map_err(|e| NodeError::Internal(e.to_string()))??;
    Ok(domain)
}
