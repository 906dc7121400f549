//! Node API over a real TCP listener.

use crate::test_utils::{init_tracing, start_node};
use courier_core::Config;
use courier_identity::SIGNATURE_INVALID;
use serde_json::{json, Value};

async fn post(client: &reqwest::Client, url: &str, body: Value) -> (u16, Value) {
    let response = client.post(url).json(&body).send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_alice_to_bob_over_http() {
    init_tracing();
    let base = start_node(Config::default_config()).await;
    let client = reqwest::Client::new();

    let (status, sent) = post(
        &client,
        &format!("{}/api/send-message", base),
        json!({ "message": "hello", "sender": "Alice", "recipient": "Bob" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(sent["success"], true);

    let (status, received) = post(
        &client,
        &format!("{}/api/receive-message", base),
        json!({ "messagePackage": sent["messagePackage"], "recipient": "Bob" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(received["success"], true);
    assert_eq!(received["message"], "hello");
}

#[tokio::test]
async fn test_tamper_flow_over_http() {
    let base = start_node(Config::default_config()).await;
    let client = reqwest::Client::new();

    let (_, sent) = post(
        &client,
        &format!("{}/api/send-message", base),
        json!({ "message": "wire transfer", "sender": "Alice", "recipient": "Bob" }),
    )
    .await;

    let (status, tampered) = post(
        &client,
        &format!("{}/api/tamper-message", base),
        json!({ "messagePackage": sent["messagePackage"] }),
    )
    .await;
    assert_eq!(status, 200);

    let (_, received) = post(
        &client,
        &format!("{}/api/receive-message", base),
        json!({ "messagePackage": tampered["tamperedPackage"], "recipient": "Bob" }),
    )
    .await;
    assert_eq!(
        received["validations"],
        json!({ "certificateValid": true, "signatureValid": false, "integrityValid": false })
    );
    assert_eq!(received["errors"], json!([SIGNATURE_INVALID]));
}

#[tokio::test]
async fn test_configured_domain_is_used() {
    let mut config = Config::default_config();
    config.domain.ca_name = "Campus CA".to_string();
    config.domain.principals = vec!["Dana".to_string(), "Erin".to_string()];

    let base = start_node(config).await;
    let client = reqwest::Client::new();

    let (status, sent) = post(
        &client,
        &format!("{}/api/send-message", base),
        json!({ "message": "hi", "sender": "Dana", "recipient": "Erin" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(sent["messagePackage"]["senderCertificate"]["issuer"], "Campus CA");

    let (status, body) = post(
        &client,
        &format!("{}/api/send-message", base),
        json!({ "message": "hi", "sender": "Alice", "recipient": "Bob" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health_over_http() {
    let base = start_node(Config::default_config()).await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
}
