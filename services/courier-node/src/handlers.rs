use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use chrono::Utc;
use courier_identity::{ReceiveOutcome, SecureEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::NodeResult;
use crate::state::AppState;
use crate::steps::{receive_steps, send_steps, StepLog};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    pub message: String,
    pub sender: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub message_package: SecureEnvelope,
    pub logs: Vec<StepLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveRequest {
    pub message_package: SecureEnvelope,
    pub recipient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveResponse {
    #[serde(flatten)]
    pub outcome: ReceiveOutcome,
    pub logs: Vec<StepLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TamperRequest {
    pub message_package: SecureEnvelope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TamperResponse {
    pub success: bool,
    pub tampered_package: SecureEnvelope,
    pub original_ciphertext: String,
    pub warning: String,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "courier-node",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

pub async fn reset(State(state): State<Arc<AppState>>) -> NodeResult<Json<Value>> {
    state.reset().await?;
    Ok(Json(json!({
        "success": true,
        "message": "Trust domain reset"
    })))
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> NodeResult<Json<SendResponse>> {
    let Json(request) = payload?;

    let envelope = state
        .domain()
        .await
        .send(&request.sender, &request.recipient, &request.message)?;

    info!(
        from = %envelope.from,
        to = %envelope.to,
        ciphertext_len = envelope.ciphertext.len(),
        serial = %envelope.sender_certificate.serial_number,
        "Envelope created"
    );

    Ok(Json(SendResponse {
        success: true,
        logs: send_steps(&request.sender, &request.recipient),
        message_package: envelope,
    }))
}

pub async fn receive_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReceiveRequest>, JsonRejection>,
) -> NodeResult<Json<ReceiveResponse>> {
    let Json(request) = payload?;

    let outcome = state
        .domain()
        .await
        .receive(&request.recipient, &request.message_package)?;

    info!(
        recipient = %request.recipient,
        from = %request.message_package.from,
        success = outcome.success,
        certificate_valid = outcome.validations.certificate_valid,
        signature_valid = outcome.validations.signature_valid,
        integrity_valid = outcome.validations.integrity_valid,
        "Envelope processed"
    );

    Ok(Json(ReceiveResponse {
        logs: receive_steps(&request.recipient, &outcome),
        outcome,
    }))
}

pub async fn tamper_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TamperRequest>, JsonRejection>,
) -> NodeResult<Json<TamperResponse>> {
    let Json(request) = payload?;

    let tampered = state.domain().await.tamper_ciphertext(&request.message_package);

    Ok(Json(TamperResponse {
        success: true,
        original_ciphertext: request.message_package.ciphertext,
        tampered_package: tampered,
        warning: "Ciphertext replaced in transit; the signature no longer matches".to_string(),
    }))
}
