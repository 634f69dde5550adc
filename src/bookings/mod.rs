// Bookings module: seat reservation, fare computation and the
// reservation/settlement lifecycle

pub mod error;
pub mod fare;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod status_machine;

pub use error::BookingError;
pub use fare::{FareCalculator, FareQuote};
pub use models::{
    Booking, BookingStatus, CreateBookingRequest, EstimateRequest, EstimateResponse, NewBooking,
    PaymentMethod, PaymentStatus, UpdateStatusRequest,
};
pub use repository::BookingsRepository;
pub use service::ReservationService;
pub use status_machine::StatusMachine;
