use crate::domain::{
    notification::{entity::Notification, repository::NotificationRepository},
    post::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SqlxNotificationRepository {
    pub pool: PgPool,
}

impl SqlxNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqlxNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification, DomainError> {
        let created = sqlx::query_as::<_, Notification>(
            r#"INSERT INTO notifications (id, user_id, kind, payload)
               VALUES ($1, $2, $3, $4)
               RETURNING id, user_id, kind, payload, read_at, created_at"#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.kind)
        .bind(&notification.payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(created)
    }

    async fn list_latest(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"SELECT id, user_id, kind, payload, read_at, created_at
               FROM notifications
               WHERE user_id = $1
               ORDER BY created_at DESC
               LIMIT $2"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(rows)
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, DomainError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(count)
    }

    async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<bool, DomainError> {
        // COALESCE keeps the first read timestamp, so re-reading is a no-op
        // that still reports success.
        let result = sqlx::query(
            r#"UPDATE notifications SET read_at = COALESCE(read_at, NOW())
               WHERE id = $1 AND user_id = $2"#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
