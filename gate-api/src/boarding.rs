use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use gate_core::BoardingStatusView;
use gate_shared::{BoardingUpdateEvent, Passenger, PassengerId};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBoardingRequest {
    #[serde(alias = "flight_number")]
    pub flight_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBoardingResponse {
    pub success: bool,
    pub flight_number: String,
    pub admitted: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPassengerRequest {
    #[serde(alias = "passenger_id")]
    pub passenger_id: PassengerId,
}

#[derive(Debug, Serialize)]
pub struct BoardPassengerResponse {
    pub success: bool,
    pub passenger: Option<Passenger>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/start-boarding", post(start_boarding))
        .route("/boarding/{id}", get(boarding_status))
        .route("/board-passenger", post(board_passenger))
        .route("/board-next", post(board_next))
        .route("/gate-control", get(gate_control))
}

/// POST /api/start-boarding
/// Admit every pending passenger of a flight into the boarding queue
pub async fn start_boarding(
    State(state): State<AppState>,
    payload: Result<Json<StartBoardingRequest>, JsonRejection>,
) -> Result<Json<StartBoardingResponse>, AppError> {
    let Json(req) = payload?;
    let flight_number = req.flight_number.trim().to_string();

    let (admitted, change) = state.scheduler.admit_flight(&flight_number).await.into_parts();
    state.broadcast(&change).await;

    Ok(Json(StartBoardingResponse {
        success: true,
        flight_number,
        admitted,
    }))
}

/// GET /api/boarding/{id}
pub async fn boarding_status(
    State(state): State<AppState>,
    Path(id): Path<PassengerId>,
) -> Result<Json<BoardingStatusView>, AppError> {
    Ok(Json(state.scheduler.boarding_status(id).await?))
}

/// POST /api/board-passenger
pub async fn board_passenger(
    State(state): State<AppState>,
    payload: Result<Json<BoardPassengerRequest>, JsonRejection>,
) -> Result<Json<BoardPassengerResponse>, AppError> {
    let Json(req) = payload?;

    let (passenger, change) = state
        .scheduler
        .board_passenger(req.passenger_id)
        .await?
        .into_parts();
    state.broadcast(&change).await;

    Ok(Json(BoardPassengerResponse {
        success: true,
        passenger: Some(passenger),
    }))
}

/// POST /api/board-next
/// Board the first passenger in line; `passenger` is null when the flight's queue is empty
pub async fn board_next(
    State(state): State<AppState>,
    payload: Result<Json<StartBoardingRequest>, JsonRejection>,
) -> Result<Json<BoardPassengerResponse>, AppError> {
    let Json(req) = payload?;

    let Some(changed) = state.scheduler.board_next(req.flight_number.trim()).await else {
        return Ok(Json(BoardPassengerResponse {
            success: true,
            passenger: None,
        }));
    };

    let (passenger, change) = changed.into_parts();
    state.broadcast(&change).await;

    Ok(Json(BoardPassengerResponse {
        success: true,
        passenger: Some(passenger),
    }))
}

/// GET /api/gate-control
/// Same payload as the `boarding_update` broadcast
pub async fn gate_control(State(state): State<AppState>) -> Json<BoardingUpdateEvent> {
    Json(state.scheduler.board_state().await)
}
