use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gate_core::CoreError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Core(CoreError::Validation { message, valid_flights }) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "validFlights": valid_flights }),
            ),
            AppError::Core(err @ CoreError::InvalidFlight { .. }) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": err.to_string(), "validFlights": err.valid_flights() }),
            ),
            AppError::Core(CoreError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Passenger not found", "passengerId": id }),
            ),
            AppError::Core(err @ CoreError::InvalidTransition { .. }) => {
                (StatusCode::CONFLICT, json!({ "error": err.to_string() }))
            }
            AppError::BadRequest(msg) => {
                tracing::debug!(error = %msg, "Malformed request");
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
