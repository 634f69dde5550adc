use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for notification operations
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification not found")]
    NotFound,
}

impl From<sqlx::Error> for NotificationError {
    fn from(err: sqlx::Error) -> Self {
        NotificationError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            NotificationError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            NotificationError::NotFound => {
                (StatusCode::NOT_FOUND, "Notification not found".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
