// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::bookings::{
    Booking, BookingError, CreateBookingRequest, EstimateRequest, EstimateResponse,
    UpdateStatusRequest,
};

/// Handler for POST /api/bookings
/// Creates a booking on a ride, reserving its seats
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 404, description = "Ride not found"),
        (status = 409, description = "Not enough seats available"),
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn create_booking_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    let booking = state
        .reservation_service
        .create_booking(&user.into(), request)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/bookings
/// Lists the authenticated passenger's bookings
pub async fn my_bookings_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Booking>>, BookingError> {
    let bookings = state.reservation_service.my_bookings(&user.into()).await?;
    Ok(Json(bookings))
}

/// Handler for GET /api/bookings/driver
/// Lists bookings on every ride the authenticated driver has posted
pub async fn driver_bookings_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Booking>>, BookingError> {
    let bookings = state
        .reservation_service
        .driver_bookings(&user.into())
        .await?;
    Ok(Json(bookings))
}

/// Handler for GET /api/bookings/all
/// Lists every booking in the system (admin only)
pub async fn all_bookings_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Booking>>, BookingError> {
    let bookings = state.reservation_service.all_bookings(&user.into()).await?;
    Ok(Json(bookings))
}

/// Handler for PATCH /api/bookings/{booking_id}/status
/// Applies a status transition to a booking
#[utoipa::path(
    patch,
    path = "/api/bookings/{booking_id}/status",
    params(("booking_id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Invalid status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn update_booking_status_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state
        .reservation_service
        .update_status(&user.into(), booking_id, request.status)
        .await?;
    Ok(Json(booking))
}

/// Handler for POST /api/bookings/{booking_id}/confirm-dropoff
/// Passenger confirmation that the ride dropped them off
pub async fn confirm_dropoff_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state
        .reservation_service
        .confirm_dropoff(&user.into(), booking_id)
        .await?;
    Ok(Json(booking))
}

/// Handler for POST /api/bookings/{booking_id}/confirm-cash
/// Driver confirmation that cash was collected
pub async fn confirm_cash_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state
        .reservation_service
        .confirm_cash(&user.into(), booking_id)
        .await?;
    Ok(Json(booking))
}

/// Handler for POST /api/bookings/estimate
/// Quotes a fare without creating a booking
#[utoipa::path(
    post,
    path = "/api/bookings/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Fare estimate", body = EstimateResponse),
        (status = 502, description = "Route not serviced"),
    ),
    tag = "bookings"
)]
pub async fn estimate_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    let estimate = state.reservation_service.estimate(request).await?;
    Ok(Json(estimate))
}

/// Handler for POST /api/bookings/remediate
/// Forces stuck bookings to completed and paid (admin only)
pub async fn remediate_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>, BookingError> {
    let remediated = state
        .reservation_service
        .remediate_stuck(&user.into())
        .await?;
    Ok(Json(json!({ "remediated": remediated })))
}
