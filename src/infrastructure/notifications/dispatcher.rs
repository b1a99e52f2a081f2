use crate::domain::notification::{
    entity::Notification, events::NotificationEvent, repository::NotificationRepository,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Delivers notification events to users after the triggering state change
/// has committed.
///
/// Delivery is fire-and-forget: a failed write is logged and dropped, it
/// never propagates to the caller and never rolls the state change back.
pub struct NotificationDispatcher {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationDispatcher {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn notify(&self, recipient: Uuid, event: NotificationEvent) {
        let notification = Notification {
            id: Uuid::now_v7(),
            user_id: recipient,
            kind: event.kind().to_string(),
            payload: event.payload(),
            read_at: None,
            created_at: chrono::Utc::now(),
        };

        if let Err(e) = self.repository.create(&notification).await {
            warn!(
                recipient = %recipient,
                kind = event.kind(),
                error = %e,
                "Failed to deliver notification"
            );
        }
    }
}
