use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error types for review operations
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Ride not found")]
    RideNotFound,

    #[error("You have already reviewed this booking")]
    DuplicateReview,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for ReviewError {
    fn from(err: sqlx::Error) -> Self {
        ReviewError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ReviewError::DatabaseError(msg) => {
                error!("Database error in reviews: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ReviewError::BookingNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ReviewError::RideNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ReviewError::DuplicateReview => (StatusCode::CONFLICT, self.to_string()),
            ReviewError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ReviewError::InvalidState(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ReviewError::ValidationError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
