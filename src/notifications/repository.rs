// Database access for notifications

use sqlx::PgPool;

use crate::notifications::models::Notification;

const NOTIFICATION_COLUMNS: &str = "id, recipient_email, message, category, read, created_at";

/// Repository for notification persistence
#[derive(Clone)]
pub struct NotificationsRepository {
    pool: PgPool,
}

impl NotificationsRepository {
    /// Create a new NotificationsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification
    pub async fn insert(
        &self,
        recipient_email: &str,
        message: &str,
        category: &str,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (recipient_email, message, category)
             VALUES ($1, $2, $3)
             RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(recipient_email)
        .bind(message)
        .bind(category)
        .fetch_one(&self.pool)
        .await
    }

    /// List a user's notifications, newest first
    pub async fn list_for(&self, recipient_email: &str) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications
             WHERE LOWER(recipient_email) = LOWER($1)
             ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        ))
        .bind(recipient_email)
        .fetch_all(&self.pool)
        .await
    }

    /// Mark a notification as read; scoped to the recipient so users cannot
    /// touch each other's inboxes
    pub async fn mark_read(
        &self,
        id: i32,
        recipient_email: &str,
    ) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET read = TRUE
             WHERE id = $1 AND LOWER(recipient_email) = LOWER($2)
             RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .bind(recipient_email)
        .fetch_optional(&self.pool)
        .await
    }
}
