use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use raffle_reservation::{OccupancySnapshot, SelectionSession};
use raffle_shared::{TicketNumber, TicketRecord};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub owner: String,
    pub requested_count: u32,
    pub numbers: Vec<TicketNumber>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub records: Vec<TicketRecord>,
    pub amount: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/reservations", post(create_reservation))
}

/// POST /v1/reservations
///
/// The client keeps its selection locally and submits it whole; the server
/// replays it through a session against fresh occupancy, then commits.
async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    state.sweeper().sweep(state.clock.now()).await?;
    let snapshot = OccupancySnapshot::fetch(state.store.as_ref()).await?;

    let mut session = SelectionSession::new(state.catalog.clone(), state.limits);
    session.set_owner_name(&req.owner);
    session.set_requested_count(req.requested_count)?;

    let taken: Vec<TicketNumber> = req.numbers.iter().copied().filter(|n| snapshot.contains(*n)).collect();
    if !taken.is_empty() {
        return Err(raffle_core::CoreError::NumberUnavailable(taken).into());
    }
    for number in &req.numbers {
        session.toggle(*number, &snapshot)?;
    }

    let records = state.committer().commit(&mut session).await?;
    let amount = state.pricing.amount_for(records.len());

    Ok((StatusCode::CREATED, Json(ReservationResponse { records, amount })))
}
