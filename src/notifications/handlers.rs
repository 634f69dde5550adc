// HTTP handlers for notification endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::notifications::error::NotificationError;
use crate::notifications::models::Notification;

/// Handler for GET /api/notifications
/// Lists the authenticated user's notifications
pub async fn list_notifications_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Notification>>, NotificationError> {
    let notifications = state.notification_service.list(&user.email).await?;
    Ok(Json(notifications))
}

/// Handler for PATCH /api/notifications/{id}/read
/// Marks one of the user's notifications as read
pub async fn mark_read_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Notification>, NotificationError> {
    let notification = state
        .notification_service
        .mark_read(id, &user.email)
        .await?;
    Ok(Json(notification))
}
