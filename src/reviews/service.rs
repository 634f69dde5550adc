use tracing::info;

use crate::auth::policy::Caller;
use crate::bookings::repository::BookingsRepository;
use crate::bookings::BookingStatus;
use crate::notifications::NotificationService;
use crate::reviews::error::ReviewError;
use crate::reviews::models::{CreateReviewRequest, RatingSummary, Review};
use crate::reviews::rating::RatingCalculator;
use crate::reviews::repository::ReviewsRepository;
use crate::rides::repository::RidesRepository;

/// Service for review business logic
#[derive(Clone)]
pub struct ReviewService {
    reviews_repo: ReviewsRepository,
    bookings_repo: BookingsRepository,
    rides_repo: RidesRepository,
    rating_calculator: RatingCalculator,
    notifications: NotificationService,
}

impl ReviewService {
    /// Create a new ReviewService
    pub fn new(
        reviews_repo: ReviewsRepository,
        bookings_repo: BookingsRepository,
        rides_repo: RidesRepository,
        rating_calculator: RatingCalculator,
        notifications: NotificationService,
    ) -> Self {
        Self {
            reviews_repo,
            bookings_repo,
            rides_repo,
            rating_calculator,
            notifications,
        }
    }

    /// Submit a review for a completed booking.
    ///
    /// The passenger reviews the driver and the driver reviews the
    /// passenger; each party may review a booking once. The reviewee is
    /// notified of the new review.
    pub async fn submit_review(
        &self,
        caller: &Caller,
        request: CreateReviewRequest,
    ) -> Result<Review, ReviewError> {
        let booking = self
            .bookings_repo
            .find_by_id(request.booking_id)
            .await?
            .ok_or(ReviewError::BookingNotFound)?;

        if booking.status != BookingStatus::Completed {
            return Err(ReviewError::InvalidState(format!(
                "Booking is {} and cannot be reviewed yet",
                booking.status
            )));
        }

        let ride = self
            .rides_repo
            .find_by_id(booking.ride_id)
            .await?
            .ok_or(ReviewError::RideNotFound)?;

        let reviewee_email = if caller.is(&booking.user_email) {
            ride.driver_email.clone()
        } else if caller.is(&ride.driver_email) {
            booking.user_email.clone()
        } else {
            return Err(ReviewError::Forbidden(
                "Only the booking's passenger or driver may review it".to_string(),
            ));
        };

        let review = self
            .reviews_repo
            .insert(
                booking.id,
                &caller.email,
                &reviewee_email,
                request.rating,
                request.comment.as_deref(),
            )
            .await?
            .ok_or(ReviewError::DuplicateReview)?;

        info!(
            "Review {} submitted by {} for {} ({} stars)",
            review.id, review.reviewer_email, review.reviewee_email, review.rating
        );

        self.notifications
            .notify(
                &review.reviewee_email,
                &format!(
                    "You received a {}-star review from {} for the ride from {} to {}.",
                    review.rating, review.reviewer_email, ride.origin, ride.destination
                ),
                "review",
            )
            .await;

        Ok(review)
    }

    /// List reviews a user has received, newest first
    pub async fn reviews_for(&self, user_email: &str) -> Result<Vec<Review>, ReviewError> {
        Ok(self.reviews_repo.list_for_user(user_email).await?)
    }

    /// Aggregate rating summary for a user
    pub async fn rating_summary(&self, user_email: &str) -> Result<RatingSummary, ReviewError> {
        self.rating_calculator.summary_for(user_email).await
    }
}
