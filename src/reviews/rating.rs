use crate::reviews::error::ReviewError;
use crate::reviews::models::RatingSummary;
use crate::reviews::repository::ReviewsRepository;

/// Computes aggregate ratings over the reviews a user has received
#[derive(Clone)]
pub struct RatingCalculator {
    repo: ReviewsRepository,
}

impl RatingCalculator {
    /// Create a new RatingCalculator
    pub fn new(repo: ReviewsRepository) -> Self {
        Self { repo }
    }

    /// Aggregate every rating a user has received into a summary
    pub async fn summary_for(&self, user_email: &str) -> Result<RatingSummary, ReviewError> {
        let ratings = self.repo.ratings_for(user_email).await?;

        Ok(RatingSummary {
            user_email: user_email.to_string(),
            average_rating: Self::mean(&ratings),
            review_count: ratings.len() as i64,
        })
    }

    /// Arithmetic mean of a set of ratings; None when there are none
    fn mean(ratings: &[i16]) -> Option<f64> {
        if ratings.is_empty() {
            return None;
        }

        let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        Some(sum as f64 / ratings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_no_ratings_is_none() {
        assert_eq!(RatingCalculator::mean(&[]), None);
    }

    #[test]
    fn test_mean_single_rating() {
        assert_eq!(RatingCalculator::mean(&[5]), Some(5.0));
    }

    #[test]
    fn test_mean_mixed_ratings() {
        assert_eq!(RatingCalculator::mean(&[5, 4, 3]), Some(4.0));
        assert_eq!(RatingCalculator::mean(&[5, 4]), Some(4.5));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// The mean of valid ratings always stays within the rating scale
    #[test]
    fn prop_mean_within_rating_scale() {
        proptest!(|(ratings in proptest::collection::vec(1i16..=5, 1..50))| {
            let mean = RatingCalculator::mean(&ratings).unwrap();
            prop_assert!((1.0..=5.0).contains(&mean));
        });
    }

    /// The mean of identical ratings is that rating
    #[test]
    fn prop_mean_of_identical_ratings() {
        proptest!(|(rating in 1i16..=5, count in 1usize..50)| {
            let ratings = vec![rating; count];
            prop_assert_eq!(RatingCalculator::mean(&ratings), Some(f64::from(rating)));
        });
    }
}
