mod auth;
mod bookings;
mod db;
mod distance;
mod error;
mod notifications;
mod payments;
mod reviews;
mod rides;
mod validation;

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde_json::json;
use sqlx::PgPool;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use auth::repository::{TokenRepository, UserRepository};
use auth::token::TokenService;
use auth::AuthService;
use bookings::repository::BookingsRepository;
use bookings::ReservationService;
use distance::{DistanceProvider, PgDistanceProvider};
use error::ApiError;
use notifications::{NotificationService, NotificationsRepository};
use payments::{PaymentGateway, PaymentService, PaymentsRepository, SimulatedGateway};
use reviews::{RatingCalculator, ReviewService, ReviewsRepository};
use rides::{RideService, RidesRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        rides::handlers::create_ride_handler,
        rides::handlers::list_rides_handler,
        rides::handlers::complete_ride_handler,
        bookings::handlers::create_booking_handler,
        bookings::handlers::update_booking_status_handler,
        bookings::handlers::estimate_handler,
        payments::handlers::create_intent_handler,
        payments::handlers::confirm_payment_handler,
        reviews::handlers::create_review_handler,
    ),
    components(
        schemas(
            rides::Ride,
            rides::RideStatus,
            rides::CreateRideRequest,
            rides::UpdateRideRequest,
            bookings::Booking,
            bookings::BookingStatus,
            bookings::PaymentMethod,
            bookings::PaymentStatus,
            bookings::CreateBookingRequest,
            bookings::UpdateStatusRequest,
            bookings::EstimateRequest,
            bookings::EstimateResponse,
            payments::Payment,
            payments::PaymentRecordStatus,
            payments::CreateIntentRequest,
            payments::CreateIntentResponse,
            payments::ConfirmPaymentRequest,
            payments::SimulatePaymentRequest,
            reviews::Review,
            reviews::CreateReviewRequest,
            reviews::RatingSummary,
            notifications::Notification,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "rides", description = "Ride posting and lifecycle endpoints"),
        (name = "bookings", description = "Seat reservation and settlement endpoints"),
        (name = "payments", description = "Payment intent and reconciliation endpoints"),
        (name = "reviews", description = "Post-ride rating endpoints")
    ),
    info(
        title = "RideConnect API",
        version = "1.0.0",
        description = "Reservation and settlement engine for shared rides",
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: AuthService,
    pub ride_service: RideService,
    pub reservation_service: ReservationService,
    pub payment_service: PaymentService,
    pub review_service: ReviewService,
    pub notification_service: NotificationService,
}

/// Wire up repositories and services over a pool and the external ports
fn build_state(
    db: PgPool,
    jwt_secret: String,
    distance: Arc<dyn DistanceProvider>,
    gateway: Arc<dyn PaymentGateway>,
) -> AppState {
    let users_repo = UserRepository::new(db.clone());
    let tokens_repo = TokenRepository::new(db.clone());
    let rides_repo = RidesRepository::new(db.clone());
    let bookings_repo = BookingsRepository::new(db.clone());
    let payments_repo = PaymentsRepository::new(db.clone());
    let reviews_repo = ReviewsRepository::new(db.clone());
    let notifications_repo = NotificationsRepository::new(db.clone());

    let notification_service = NotificationService::new(notifications_repo);
    let auth_service = AuthService::new(
        users_repo.clone(),
        tokens_repo,
        TokenService::new(jwt_secret),
    );
    let reservation_service = ReservationService::new(
        bookings_repo.clone(),
        rides_repo.clone(),
        users_repo.clone(),
        distance.clone(),
        notification_service.clone(),
    );
    let ride_service = RideService::new(
        rides_repo.clone(),
        users_repo,
        distance,
        reservation_service.clone(),
    );
    let payment_service = PaymentService::new(
        payments_repo,
        bookings_repo.clone(),
        rides_repo.clone(),
        notification_service.clone(),
        gateway,
    );
    let review_service = ReviewService::new(
        reviews_repo.clone(),
        bookings_repo,
        rides_repo,
        RatingCalculator::new(reviews_repo),
        notification_service.clone(),
    );

    AppState {
        db,
        auth_service,
        ride_service,
        reservation_service,
        payment_service,
        review_service,
        notification_service,
    }
}

/// Handler for GET /health
/// Verifies the process is up and the database is reachable
async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    sqlx::query("SELECT 1").execute(&state.db).await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handlers::register_handler))
        .route("/api/auth/login", post(auth::handlers::login_handler))
        .route("/api/auth/refresh", post(auth::handlers::refresh_handler))
        .route("/api/auth/logout", post(auth::handlers::logout_handler))
        .route("/api/auth/me", get(auth::handlers::me_handler))
        .route(
            "/api/auth/admin/users",
            get(auth::handlers::list_users_handler),
        )
        .route(
            "/api/auth/admin/users/:user_id/approve",
            post(auth::handlers::approve_admin_handler),
        )
        .route(
            "/api/auth/admin/users/:user_id/revoke",
            post(auth::handlers::revoke_admin_handler),
        )
        // Rides
        .route("/api/rides", post(rides::handlers::create_ride_handler))
        .route("/api/rides", get(rides::handlers::list_rides_handler))
        .route("/api/rides/mine", get(rides::handlers::driver_posts_handler))
        .route("/api/rides/:ride_id", get(rides::handlers::get_ride_handler))
        .route("/api/rides/:ride_id", put(rides::handlers::update_ride_handler))
        .route(
            "/api/rides/:ride_id",
            delete(rides::handlers::delete_ride_handler),
        )
        .route(
            "/api/rides/:ride_id/complete",
            post(rides::handlers::complete_ride_handler),
        )
        .route(
            "/api/rides/:ride_id/cancel",
            post(rides::handlers::cancel_ride_handler),
        )
        // Bookings
        .route(
            "/api/bookings",
            post(bookings::handlers::create_booking_handler),
        )
        .route("/api/bookings", get(bookings::handlers::my_bookings_handler))
        .route(
            "/api/bookings/driver",
            get(bookings::handlers::driver_bookings_handler),
        )
        .route(
            "/api/bookings/all",
            get(bookings::handlers::all_bookings_handler),
        )
        .route(
            "/api/bookings/estimate",
            post(bookings::handlers::estimate_handler),
        )
        .route(
            "/api/bookings/remediate",
            post(bookings::handlers::remediate_handler),
        )
        .route(
            "/api/bookings/:booking_id/status",
            patch(bookings::handlers::update_booking_status_handler),
        )
        .route(
            "/api/bookings/:booking_id/confirm-dropoff",
            post(bookings::handlers::confirm_dropoff_handler),
        )
        .route(
            "/api/bookings/:booking_id/confirm-cash",
            post(bookings::handlers::confirm_cash_handler),
        )
        // Payments
        .route(
            "/api/payments/create-payment-intent",
            post(payments::handlers::create_intent_handler),
        )
        .route(
            "/api/payments/confirm",
            post(payments::handlers::confirm_payment_handler),
        )
        .route(
            "/api/payments/simulate",
            post(payments::handlers::simulate_payment_handler),
        )
        .route("/api/payments", get(payments::handlers::my_payments_handler))
        .route(
            "/api/payments/driver",
            get(payments::handlers::driver_payments_handler),
        )
        // Reviews
        .route("/api/reviews", post(reviews::handlers::create_review_handler))
        .route(
            "/api/reviews/user/:email",
            get(reviews::handlers::user_reviews_handler),
        )
        .route(
            "/api/reviews/user/:email/summary",
            get(reviews::handlers::rating_summary_handler),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::handlers::list_notifications_handler),
        )
        .route(
            "/api/notifications/:id/read",
            patch(notifications::handlers::mark_read_handler),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("RideConnect API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Seed the first-admin bootstrap counter before serving requests
    let admin_count = db::count_admins(&db_pool)
        .await
        .expect("Failed to count admin accounts");
    auth::seed_admin_bootstrap(admin_count);
    tracing::info!("Admin bootstrap seeded with {} existing admin(s)", admin_count);

    let distance: Arc<dyn DistanceProvider> = Arc::new(PgDistanceProvider::new(db_pool.clone()));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway::new());
    let state = build_state(db_pool, jwt_secret, distance, gateway);

    // Create the application router
    let app = create_router(state);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("RideConnect API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
