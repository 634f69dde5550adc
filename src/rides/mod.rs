// Rides module: posted rides, seat inventory and the ride lifecycle

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::RideError;
pub use models::{CreateRideRequest, Ride, RideStatus, UpdateRideRequest};
pub use repository::RidesRepository;
pub use service::RideService;
