//! Error-to-response mapping for the HTTP API.
//!
//! # Responsibilities
//! - Translate [`RegistryError`] variants into HTTP status codes
//! - Render a stable JSON error body (`error` kind + human message)
//! - Log server-side failures without leaking internals to clients
//!
//! # Design Decisions
//! - Validation failures map to 400, missing records to 404
//! - On-chain reverts map to 409: the request conflicted with contract state
//! - A confirmation timeout maps to 504 because the transaction may still
//!   land after the response is sent; clients must treat it as ambiguous
//! - RPC and event-decoding failures map to 502 (the upstream node misbehaved)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::registry::RegistryError;

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match &self {
            RegistryError::ContractNotConfigured | RegistryError::GasPriceTooHigh { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RegistryError::InvalidIdentifier(_)
            | RegistryError::InvalidAddress(_)
            | RegistryError::InvalidCredential(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Reverted(_) => StatusCode::CONFLICT,
            RegistryError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RegistryError::EventNotEmitted(_) | RegistryError::Rpc(_) => StatusCode::BAD_GATEWAY,
            RegistryError::ChainMismatch { .. } | RegistryError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(
                kind = self.kind(),
                status = status.as_u16(),
                error = %self,
                "Request failed"
            );
        }

        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
