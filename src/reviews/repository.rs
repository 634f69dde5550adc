// Database access for reviews

use sqlx::PgPool;
use uuid::Uuid;

use crate::reviews::models::Review;

const REVIEW_COLUMNS: &str =
    "id, booking_id, reviewer_email, reviewee_email, rating, comment, created_at";

/// Repository for review persistence
#[derive(Clone)]
pub struct ReviewsRepository {
    pool: PgPool,
}

impl ReviewsRepository {
    /// Create a new ReviewsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a review.
    ///
    /// One review per reviewer per booking; returns Ok(None) when the
    /// reviewer has already reviewed this booking.
    pub async fn insert(
        &self,
        booking_id: Uuid,
        reviewer_email: &str,
        reviewee_email: &str,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let result = sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (booking_id, reviewer_email, reviewee_email, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            REVIEW_COLUMNS
        ))
        .bind(booking_id)
        .bind(reviewer_email)
        .bind(reviewee_email)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(review) => Ok(Some(review)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List reviews received by a user, newest first
    pub async fn list_for_user(&self, reviewee_email: &str) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews
             WHERE LOWER(reviewee_email) = LOWER($1)
             ORDER BY created_at DESC",
            REVIEW_COLUMNS
        ))
        .bind(reviewee_email)
        .fetch_all(&self.pool)
        .await
    }

    /// All rating values a user has received
    pub async fn ratings_for(&self, reviewee_email: &str) -> Result<Vec<i16>, sqlx::Error> {
        let ratings: Vec<(i16,)> = sqlx::query_as(
            "SELECT rating FROM reviews WHERE LOWER(reviewee_email) = LOWER($1)",
        )
        .bind(reviewee_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings.into_iter().map(|(r,)| r).collect())
    }
}
