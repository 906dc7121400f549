//! HTTP demo node for the Courier secure envelope protocol.
//!
//! The node owns one [`courier_identity::TrustDomain`] and ferries envelope
//! records between the client and the principals unmodified. Every send and
//! receive response carries a step log narrating the protocol.

pub mod error;
pub mod handlers;
pub mod state;
pub mod steps;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

pub use error::{NodeError, NodeResult};
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/reset", post(handlers::reset))
        .route("/api/send-message", post(handlers::send_message))
        .route("/api/receive-message", post(handlers::receive_message))
        .route("/api/tamper-message", post(handlers::tamper_message))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(middleware::from_fn(log_request)))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::debug!(%method, %path, status = %response.status(), "Request handled");
    response
}
