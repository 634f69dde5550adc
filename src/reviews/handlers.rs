// HTTP handlers for review endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::reviews::{CreateReviewRequest, RatingSummary, Review, ReviewError};

/// Handler for POST /api/reviews
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review submitted", body = Review),
        (status = 400, description = "Booking not completed or invalid rating"),
        (status = 403, description = "Caller is not a party to the booking"),
        (status = 409, description = "Booking already reviewed by this caller"),
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn create_review_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ReviewError> {
    request
        .validate()
        .map_err(|e| ReviewError::ValidationError(e.to_string()))?;

    let review = state
        .review_service
        .submit_review(&user.into(), request)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Handler for GET /api/reviews/user/:email
/// Lists the reviews a user has received
pub async fn user_reviews_handler(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Review>>, ReviewError> {
    let reviews = state.review_service.reviews_for(&email).await?;
    Ok(Json(reviews))
}

/// Handler for GET /api/reviews/user/:email/summary
/// Returns a user's aggregate rating
pub async fn rating_summary_handler(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
) -> Result<Json<RatingSummary>, ReviewError> {
    let summary = state.review_service.rating_summary(&email).await?;
    Ok(Json(summary))
}
