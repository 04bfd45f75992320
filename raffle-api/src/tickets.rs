use axum::{extract::State, routing::get, Json, Router};
use raffle_catalog::TicketRange;
use raffle_reservation::{Availability, OccupancySnapshot, SalesSummary};
use raffle_shared::TicketNumber;
use serde::Serialize;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TicketView {
    pub number: TicketNumber,
    pub state: Availability,
}

#[derive(Debug, Serialize)]
pub struct TicketBoardResponse {
    pub ranges: Vec<TicketRange>,
    pub tickets: Vec<TicketView>,
    pub summary: SalesSummary,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets", get(ticket_board))
        .route("/v1/summary", get(summary))
}

/// GET /v1/tickets
///
/// Sweeps expired reservations first so freed numbers show as selectable.
async fn ticket_board(State(state): State<AppState>) -> Result<Json<TicketBoardResponse>, AppError> {
    state.sweeper().sweep(state.clock.now()).await?;

    let records = state.store.read_all().await.map_err(raffle_core::CoreError::from)?;
    let snapshot = OccupancySnapshot::from_records(&records);

    let tickets = snapshot
        .availability(&state.catalog)
        .into_iter()
        .map(|(number, availability)| TicketView { number, state: availability })
        .collect();

    Ok(Json(TicketBoardResponse {
        ranges: state.catalog.ranges().to_vec(),
        tickets,
        summary: SalesSummary::from_records(&records, &state.catalog, &state.pricing),
    }))
}

/// GET /v1/summary
async fn summary(State(state): State<AppState>) -> Result<Json<SalesSummary>, AppError> {
    let records = state.store.read_all().await.map_err(raffle_core::CoreError::from)?;
    Ok(Json(SalesSummary::from_records(&records, &state.catalog, &state.pricing)))
}
