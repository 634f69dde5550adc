// Notifications module: in-app inbox fed by booking, ride and payment events

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::NotificationError;
pub use models::Notification;
pub use repository::NotificationsRepository;
pub use service::NotificationService;
