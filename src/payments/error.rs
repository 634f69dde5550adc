use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for payment operations
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Payment not found")]
    NotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Payment gateway error: {0}")]
    GatewayError(String),
}

impl From<sqlx::Error> for PaymentError {
    fn from(err: sqlx::Error) -> Self {
        PaymentError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            PaymentError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            PaymentError::NotFound => (StatusCode::NOT_FOUND, "Payment not found".to_string()),
            PaymentError::BookingNotFound => {
                (StatusCode::NOT_FOUND, "Booking not found".to_string())
            }
            PaymentError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            PaymentError::GatewayError(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
