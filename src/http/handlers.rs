//! Request handlers for the registry API.
//!
//! # Responsibilities
//! - Decode and validate request payloads
//! - Invoke [`RegistryClient`] operations
//! - Shape domain results into wire responses
//!
//! # Design Decisions
//! - Handlers stay thin: validation and chain logic live in the registry
//!   and chain layers, logging in the tracing middleware
//! - Contract availability is checked before credentials are parsed, so an
//!   unconfigured deployment answers 503 regardless of the request body
//! - Write operations answer 201 with the confirmed on-chain record

use alloy::primitives::Address;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::chain::Credential;
use crate::http::server::AppState;
use crate::http::types::{
    HealthResponse, ListModelsParams, ModelResponse, RecordValidationRequest,
    RegisterModelRequest, StatusResponse, ValidationReceipt, ValidationResponse,
};
use crate::registry::{ModelId, RegistryError, RegistryResult};

/// Liveness probe. Answers regardless of chain or contract state.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness report: contract binding presence and chain reachability.
pub async fn service_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        contract_initialized: state.registry.is_contract_initialized(),
        chain_connected: state.registry.is_chain_connected().await,
    })
}

/// Register a model and wait for on-chain confirmation.
pub async fn register_model(
    State(state): State<AppState>,
    Json(request): Json<RegisterModelRequest>,
) -> RegistryResult<(StatusCode, Json<ModelResponse>)> {
    require_contract(&state)?;
    let credential = Credential::from_hex(&request.private_key)?;

    let registered = state
        .registry
        .register_model(
            &request.name,
            &request.version,
            &request.metadata_uri,
            &credential,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(registered.into())))
}

/// Fetch a single model by identifier.
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RegistryResult<Json<ModelResponse>> {
    let id = ModelId::parse(&id)?;
    let record = state.registry.model(id).await?;
    Ok(Json(record.into()))
}

/// List models in registration order, optionally filtered by owner.
pub async fn list_models(
    State(state): State<AppState>,
    Query(params): Query<ListModelsParams>,
) -> RegistryResult<Json<Vec<ModelResponse>>> {
    let owner = params
        .owner
        .map(|raw| {
            raw.parse::<Address>()
                .map_err(|e| RegistryError::InvalidAddress(format!("owner '{}': {}", raw, e)))
        })
        .transpose()?;

    let records = state.registry.list_models(owner).await?;
    Ok(Json(records.into_iter().map(ModelResponse::from).collect()))
}

/// Append a validation to a model and wait for on-chain confirmation.
pub async fn record_validation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RecordValidationRequest>,
) -> RegistryResult<(StatusCode, Json<ValidationReceipt>)> {
    require_contract(&state)?;
    let id = ModelId::parse(&id)?;
    let credential = Credential::from_hex(&request.private_key)?;

    let recorded = state
        .registry
        .record_validation(id, request.is_valid, &request.comments, &credential)
        .await?;

    Ok((StatusCode::CREATED, Json(recorded.into())))
}

/// Fetch the full validation history for a model.
pub async fn list_validations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RegistryResult<Json<Vec<ValidationResponse>>> {
    let id = ModelId::parse(&id)?;
    let history = state.registry.validation_history(id).await?;
    Ok(Json(history.into_iter().map(ValidationResponse::from).collect()))
}

fn require_contract(state: &AppState) -> RegistryResult<()> {
    if state.registry.is_contract_initialized() {
        Ok(())
    } else {
        Err(RegistryError::ContractNotConfigured)
    }
}
