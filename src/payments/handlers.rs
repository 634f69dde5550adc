// HTTP handlers for payment endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::bookings::Booking;
use crate::payments::{
    ConfirmPaymentRequest, CreateIntentRequest, CreateIntentResponse, Payment, PaymentError,
    SimulatePaymentRequest,
};

/// Handler for POST /api/payments/create-payment-intent
///
/// Tolerates anonymous callers; card collection pages run before login in
/// some client flows.
#[utoipa::path(
    post,
    path = "/api/payments/create-payment-intent",
    request_body = CreateIntentRequest,
    responses(
        (status = 201, description = "Intent created", body = CreateIntentResponse),
        (status = 400, description = "Invalid amount"),
        (status = 502, description = "Payment gateway error"),
    ),
    tag = "payments"
)]
pub async fn create_intent_handler(
    State(state): State<crate::AppState>,
    user: Option<AuthenticatedUser>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<(StatusCode, Json<CreateIntentResponse>), PaymentError> {
    request
        .validate()
        .map_err(|e| PaymentError::ValidationError(e.to_string()))?;

    let caller_email = user.as_ref().map(|u| u.email.as_str());
    let response = state
        .payment_service
        .create_intent(caller_email, request)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /api/payments/confirm
/// Confirms a payment intent; idempotent per intent reference
#[utoipa::path(
    post,
    path = "/api/payments/confirm",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment confirmed", body = Payment),
        (status = 404, description = "Unknown payment intent"),
    ),
    tag = "payments"
)]
pub async fn confirm_payment_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<Payment>, PaymentError> {
    request
        .validate()
        .map_err(|e| PaymentError::ValidationError(e.to_string()))?;

    let payment = state.payment_service.confirm(request).await?;
    Ok(Json(payment))
}

/// Handler for POST /api/payments/simulate
/// Mints a confirmed payment for a booking and returns the settled booking
pub async fn simulate_payment_handler(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<SimulatePaymentRequest>,
) -> Result<(StatusCode, Json<Booking>), PaymentError> {
    let booking = state.payment_service.simulate(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/payments
/// Lists the authenticated user's payments
pub async fn my_payments_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Payment>>, PaymentError> {
    let payments = state.payment_service.my_history(&user.into()).await?;
    Ok(Json(payments))
}

/// Handler for GET /api/payments/driver
/// Lists payments received on the authenticated driver's rides
pub async fn driver_payments_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Payment>>, PaymentError> {
    let payments = state.payment_service.driver_history(&user.into()).await?;
    Ok(Json(payments))
}
