use tracing::warn;

use crate::notifications::error::NotificationError;
use crate::notifications::models::Notification;
use crate::notifications::repository::NotificationsRepository;

/// Service for delivering in-app notifications
#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationsRepository,
}

impl NotificationService {
    /// Create a new NotificationService
    pub fn new(repo: NotificationsRepository) -> Self {
        Self { repo }
    }

    /// Deliver a notification, fire-and-forget.
    ///
    /// A failed delivery must never fail the operation that triggered it;
    /// failures are logged and swallowed.
    pub async fn notify(&self, recipient_email: &str, message: &str, category: &str) {
        if let Err(e) = self.repo.insert(recipient_email, message, category).await {
            warn!(
                "Failed to deliver notification to {}: {}",
                recipient_email, e
            );
        }
    }

    /// List a user's notifications, newest first
    pub async fn list(&self, recipient_email: &str) -> Result<Vec<Notification>, NotificationError> {
        Ok(self.repo.list_for(recipient_email).await?)
    }

    /// Mark one of the user's notifications as read
    pub async fn mark_read(
        &self,
        id: i32,
        recipient_email: &str,
    ) -> Result<Notification, NotificationError> {
        self.repo
            .mark_read(id, recipient_email)
            .await?
            .ok_or(NotificationError::NotFound)
    }
}
