use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for booking operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Booking not found")]
    NotFound,

    #[error("Ride not found")]
    RideNotFound,

    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientCapacity { requested: i32, available: i32 },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid booking state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::DatabaseError(err.to_string())
    }
}

impl From<crate::distance::DistanceError> for BookingError {
    fn from(err: crate::distance::DistanceError) -> Self {
        BookingError::ExternalService(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            BookingError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            BookingError::NotFound => (StatusCode::NOT_FOUND, "Booking not found".to_string()),
            BookingError::RideNotFound => (StatusCode::NOT_FOUND, "Ride not found".to_string()),
            BookingError::InsufficientCapacity {
                requested,
                available,
            } => (
                StatusCode::CONFLICT,
                format!(
                    "Not enough seats available: requested {}, available {}",
                    requested, available
                ),
            ),
            BookingError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            BookingError::InvalidTransition(msg) => (StatusCode::CONFLICT, msg),
            BookingError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg),
            BookingError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            BookingError::ExternalService(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
