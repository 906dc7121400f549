//! Error responses for the node API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use courier_identity::IdentityError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the node's HTTP handlers.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Request body could not be read as the expected JSON shape
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Trust domain operation failed
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Background task failed
    #[error("internal error: {0}")]
    Internal(String),
}

impl NodeError {
    /// Returns the HTTP status code for this error.
    ///
    /// - Caller mistakes (bad body, unknown or uncertified principal,
    ///   malformed envelope): 400 Bad Request
    /// - Everything else: 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Identity(
                IdentityError::UnknownPrincipal { .. }
                | IdentityError::MissingCertificate { .. }
                | IdentityError::RecipientMissingCertificate { .. }
                | IdentityError::MalformedEnvelope(_)
                | IdentityError::MalformedCertificate(_),
            ) => StatusCode::BAD_REQUEST,
            Self::Identity(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for NodeError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

pub type NodeResult<T> = Result<T, NodeError>;
