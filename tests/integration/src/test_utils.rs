//! Test utilities for cross-crate integration tests

use courier_core::Config;
use courier_identity::{CertificateAuthority, Principal, TrustDomain};
use courier_node::{router, AppState};
use std::sync::{Arc, Once};
use tokio::time::Duration;

static TRACING: Once = Once::new();

/// Install a test subscriber once per process. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Two certified principals, Alice and Bob, under "Academic CA".
pub fn alice_and_bob() -> TrustDomain {
    TrustDomain::bootstrap("Academic CA", ["Alice", "Bob"], 365)
        .expect("Failed to bootstrap trust domain")
}

/// Principal certified by `ca` for `days` (negative yields an expired certificate).
pub fn certified_by(ca: &CertificateAuthority, name: &str, days: i64) -> Principal {
    let builder = Principal::builder(name).expect("Failed to generate key pair");
    let certificate = ca
        .issue_certificate_for_days(name, builder.public_key(), days)
        .expect("Failed to issue certificate");
    builder
        .certificate(certificate)
        .build()
        .expect("Certificate does not match key pair")
}

/// Start a test node on an ephemeral port and return its base URL.
pub async fn start_node(config: Config) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let local_addr = listener.local_addr().unwrap();
    let server_url = format!("http://{}", local_addr);

    let state = AppState::new(config).await.expect("Failed to bootstrap node");
    let app = router(Arc::new(state));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    server_url
}
