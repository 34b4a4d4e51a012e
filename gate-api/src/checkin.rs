use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gate_catalog::Flight;
use gate_core::PassengerDetails;
use gate_shared::{Passenger, PassengerId};
use serde::Serialize;
use serde_json::Value;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub success: bool,
    pub passenger_id: PassengerId,
    pub boarding_pass: String,
    pub passenger: Passenger,
    pub flight: Flight,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check-in", post(check_in))
        .route("/passenger/{id}", get(passenger_details))
}

/// POST /api/check-in
///
/// Field validation happens in the scheduler so that every rejection carries the
/// list of valid flight numbers; a body that is not JSON is validated as an empty payload.
pub async fn check_in(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckInResponse>), AppError> {
    let payload = payload.map(|Json(v)| v).unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection, "Check-in body is not JSON");
        Value::Null
    });

    let (receipt, change) = state.scheduler.check_in_payload(&payload).await?.into_parts();
    state.broadcast(&change).await;

    Ok((
        StatusCode::CREATED,
        Json(CheckInResponse {
            success: true,
            passenger_id: receipt.passenger.id,
            boarding_pass: receipt.passenger.boarding_pass.clone(),
            passenger: receipt.passenger,
            flight: receipt.flight,
        }),
    ))
}

/// GET /api/passenger/{id}
pub async fn passenger_details(
    State(state): State<AppState>,
    Path(id): Path<PassengerId>,
) -> Result<Json<PassengerDetails>, AppError> {
    Ok(Json(state.scheduler.passenger_details(id).await?))
}
