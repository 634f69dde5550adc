// Authentication and authorization module

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use middleware::AuthenticatedUser;
pub use models::{Role, User, UserResponse};
pub use service::{seed_admin_bootstrap, AuthService};
