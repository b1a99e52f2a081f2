use crate::domain::notification::entity::Notification;
use crate::domain::post::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, DomainError>;

    /// Most recent notifications for a user, newest first.
    async fn list_latest(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, DomainError>;

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, DomainError>;

    /// Marks a single notification as read. Returns false when the
    /// notification does not exist or belongs to another user.
    async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<bool, DomainError>;

    /// Marks every unread notification for the user as read, returning the
    /// number of rows touched.
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError>;
}
