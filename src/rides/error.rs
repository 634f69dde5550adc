use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;

/// Error types for ride operations
#[derive(Debug, thiserror::Error)]
pub enum RideError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Ride not found")]
    NotFound,

    #[error("Price exceeds the maximum allowed fare of {ceiling} for this route.")]
    PriceAboveCeiling { ceiling: Decimal },

    #[error("Route not serviced: {0}")]
    RouteNotServiced(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid ride state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for RideError {
    fn from(err: sqlx::Error) -> Self {
        RideError::DatabaseError(err.to_string())
    }
}

impl From<crate::distance::DistanceError> for RideError {
    fn from(err: crate::distance::DistanceError) -> Self {
        RideError::RouteNotServiced(err.to_string())
    }
}

impl IntoResponse for RideError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RideError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            RideError::NotFound => (StatusCode::NOT_FOUND, "Ride not found".to_string()),
            RideError::PriceAboveCeiling { ceiling } => (
                StatusCode::CONFLICT,
                format!(
                    "Price exceeds the maximum allowed fare of {} for this route.",
                    ceiling
                ),
            ),
            RideError::RouteNotServiced(msg) => (StatusCode::BAD_GATEWAY, msg),
            RideError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            RideError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg),
            RideError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
