use axum::{extract::State, routing::{get, post}, Json, Router};
use raffle_reservation::parse_number_spec;
use raffle_shared::{TicketNumber, TicketRecord, TicketStatus};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// e.g. "1577,1579,1600-1605"
    pub numbers: String,
    pub status: TicketStatus,
}

#[derive(Debug, Serialize)]
pub struct ChangeStatusResponse {
    pub updated: usize,
    pub not_found: Vec<TicketNumber>,
    pub rejected_tokens: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub released: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/tickets", get(list_records))
        .route("/v1/admin/status", post(change_status))
        .route("/v1/admin/sweep", post(sweep_now))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/admin/tickets
async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<TicketRecord>>, AppError> {
    let records = state.store.read_all().await.map_err(raffle_core::CoreError::from)?;
    Ok(Json(records))
}

/// POST /v1/admin/status
async fn change_status(
    State(state): State<AppState>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<ChangeStatusResponse>, AppError> {
    let parsed = parse_number_spec(&req.numbers);
    if parsed.numbers.is_empty() {
        return Err(AppError::ValidationError("No valid ticket numbers given".into()));
    }

    let outcome = state
        .override_engine()
        .apply_state_transition(&parsed.numbers, req.status)
        .await?;

    Ok(Json(ChangeStatusResponse {
        updated: outcome.updated,
        not_found: outcome.not_found,
        rejected_tokens: parsed.rejected,
    }))
}

/// POST /v1/admin/sweep
async fn sweep_now(State(state): State<AppState>) -> Result<Json<SweepResponse>, AppError> {
    let released = state.sweeper().sweep(state.clock.now()).await?;
    Ok(Json(SweepResponse { released }))
}
