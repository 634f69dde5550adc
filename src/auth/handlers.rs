// HTTP handlers for authentication endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{AuthResponse, LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest, UserResponse},
};
use crate::AppState;

/// Handler for POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state
        .auth_service
        .register(
            &request.email,
            &request.password,
            &request.name,
            request.phone.as_deref(),
            request.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(response))
}

/// Handler for POST /api/auth/refresh
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state
        .auth_service
        .refresh_tokens(&request.refresh_token)
        .await?;

    Ok(Json(response))
}

/// Handler for POST /api/auth/logout
pub async fn logout_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, AuthError> {
    state.auth_service.logout(&request.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/auth/me
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, AuthError> {
    let response = state.auth_service.get_current_user(user.user_id).await?;
    Ok(Json(response))
}

/// Handler for GET /api/auth/admin/users
/// Lists every account (admin only)
pub async fn list_users_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    let users = state.auth_service.list_users(&user.into()).await?;
    Ok(Json(users))
}

/// Handler for POST /api/auth/admin/users/:id/approve
/// Grants Admin to a pending admin request (admin only)
pub async fn approve_admin_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, AuthError> {
    let approved = state
        .auth_service
        .approve_admin(&user.into(), user_id)
        .await?;
    Ok(Json(approved))
}

/// Handler for POST /api/auth/admin/users/:id/revoke
/// Demotes an admin or rejects a pending request (admin only)
pub async fn revoke_admin_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, AuthError> {
    let revoked = state
        .auth_service
        .revoke_admin(&user.into(), user_id)
        .await?;
    Ok(Json(revoked))
}
