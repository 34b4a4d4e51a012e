use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use gate_catalog::Flight;
use gate_core::FlightStatusView;
use serde::Serialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct FlightsResponse {
    pub flights: Vec<Flight>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights))
        .route("/flight-status/{flight_number}", get(flight_status))
}

/// GET /api/flights
pub async fn list_flights(State(state): State<AppState>) -> Json<FlightsResponse> {
    Json(FlightsResponse {
        flights: state.scheduler.list_flights().await,
    })
}

/// GET /api/flight-status/{flight_number}
pub async fn flight_status(
    State(state): State<AppState>,
    Path(flight_number): Path<String>,
) -> Result<Json<FlightStatusView>, AppError> {
    Ok(Json(state.scheduler.flight_status(&flight_number).await?))
}
