use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use raffle_core::CoreError;
use raffle_shared::TicketNumber;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    ConflictError {
        message: String,
        numbers: Vec<TicketNumber>,
    },
    StoreUnavailable(String),
    StoreFailure(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": msg })),
            AppError::ConflictError { message, numbers } => {
                (StatusCode::CONFLICT, json!({ "error": message, "numbers": numbers }))
            }
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Ticket store unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "Ticket store unavailable, try again" }))
            }
            AppError::StoreFailure(msg) => {
                tracing::error!("Ticket store failure: {}", msg);
                (StatusCode::BAD_GATEWAY, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NumberUnavailable(numbers) => AppError::ConflictError {
                message: CoreError::NumberUnavailable(numbers.clone()).to_string(),
                numbers,
            },
            CoreError::StoreUnavailable(msg) => AppError::StoreUnavailable(msg),
            CoreError::StoreError(msg) => AppError::StoreFailure(msg),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
