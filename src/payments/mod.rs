// Payments module: gateway intents, confirmation and reconciliation
// against bookings

pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::PaymentError;
pub use gateway::{PaymentGateway, PaymentIntent, SimulatedGateway};
pub use models::{
    ConfirmPaymentRequest, CreateIntentRequest, CreateIntentResponse, NewPayment, Payment,
    PaymentRecordStatus, SimulatePaymentRequest,
};
pub use repository::PaymentsRepository;
pub use service::PaymentService;
