// Reviews module: post-ride ratings between passengers and drivers

pub mod error;
pub mod handlers;
pub mod models;
pub mod rating;
pub mod repository;
pub mod service;

pub use error::ReviewError;
pub use models::{CreateReviewRequest, RatingSummary, Review};
pub use rating::RatingCalculator;
pub use repository::ReviewsRepository;
pub use service::ReviewService;
