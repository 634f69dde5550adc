// HTTP handlers for ride endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::rides::{CreateRideRequest, Ride, RideError, UpdateRideRequest};

/// Query parameters for ride search
#[derive(Debug, Deserialize)]
pub struct RideSearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// Handler for POST /api/rides
/// Posts a new ride
#[utoipa::path(
    post,
    path = "/api/rides",
    request_body = CreateRideRequest,
    responses(
        (status = 201, description = "Ride posted", body = Ride),
        (status = 403, description = "Caller is not a driver"),
        (status = 409, description = "Price exceeds the fare ceiling"),
    ),
    security(("bearer_auth" = [])),
    tag = "rides"
)]
pub async fn create_ride_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateRideRequest>,
) -> Result<(StatusCode, Json<Ride>), RideError> {
    request
        .validate()
        .map_err(|e| RideError::ValidationError(e.to_string()))?;

    let ride = state.ride_service.create_post(&user.into(), request).await?;
    Ok((StatusCode::CREATED, Json(ride)))
}

/// Handler for GET /api/rides
/// Lists open rides, optionally filtered by route
#[utoipa::path(
    get,
    path = "/api/rides",
    params(
        ("origin" = Option<String>, Query, description = "Origin filter"),
        ("destination" = Option<String>, Query, description = "Destination filter"),
    ),
    responses(
        (status = 200, description = "Open rides", body = Vec<Ride>),
    ),
    tag = "rides"
)]
pub async fn list_rides_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<RideSearchQuery>,
) -> Result<Json<Vec<Ride>>, RideError> {
    let rides = match (query.origin, query.destination) {
        (Some(origin), Some(destination)) => {
            state.ride_service.search(&origin, &destination).await?
        }
        _ => state.ride_service.list_open().await?,
    };

    Ok(Json(rides))
}

/// Handler for GET /api/rides/{ride_id}
pub async fn get_ride_handler(
    State(state): State<crate::AppState>,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<Ride>, RideError> {
    let ride = state.ride_service.get_ride(ride_id).await?;
    Ok(Json(ride))
}

/// Handler for GET /api/rides/mine
/// Lists the authenticated driver's posted rides
pub async fn driver_posts_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Ride>>, RideError> {
    let rides = state.ride_service.driver_posts(&user.into()).await?;
    Ok(Json(rides))
}

/// Handler for PUT /api/rides/{ride_id}
pub async fn update_ride_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(ride_id): Path<Uuid>,
    Json(request): Json<UpdateRideRequest>,
) -> Result<Json<Ride>, RideError> {
    request
        .validate()
        .map_err(|e| RideError::ValidationError(e.to_string()))?;

    let ride = state
        .ride_service
        .update_ride(&user.into(), ride_id, request)
        .await?;
    Ok(Json(ride))
}

/// Handler for DELETE /api/rides/{ride_id}
pub async fn delete_ride_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(ride_id): Path<Uuid>,
) -> Result<StatusCode, RideError> {
    state.ride_service.delete_ride(&user.into(), ride_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/rides/{ride_id}/complete
/// Completes a ride and moves its accepted bookings into settlement
#[utoipa::path(
    post,
    path = "/api/rides/{ride_id}/complete",
    params(("ride_id" = Uuid, Path, description = "Ride ID")),
    responses(
        (status = 200, description = "Ride completed", body = Ride),
        (status = 400, description = "Ride is not open"),
        (status = 403, description = "Caller is not the ride's driver"),
    ),
    security(("bearer_auth" = [])),
    tag = "rides"
)]
pub async fn complete_ride_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<Ride>, RideError> {
    let ride = state
        .ride_service
        .complete_ride(&user.into(), ride_id)
        .await?;
    Ok(Json(ride))
}

/// Handler for POST /api/rides/{ride_id}/cancel
pub async fn cancel_ride_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<Ride>, RideError> {
    let ride = state
        .ride_service
        .cancel_ride(&user.into(), ride_id)
        .await?;
    Ok(Json(ride))
}
