use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A message delivered to a user's in-app inbox
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub recipient_email: String,
    pub message: String,
    pub category: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
