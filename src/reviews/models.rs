use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A rating left by one party of a completed booking for the other
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub booking_id: Uuid,
    pub reviewer_email: String,
    pub reviewee_email: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for submitting a review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 1000, message = "Comment must not exceed 1000 characters"))]
    pub comment: Option<String>,
}

/// Aggregate rating for a user across every review they have received
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RatingSummary {
    pub user_email: String,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}
