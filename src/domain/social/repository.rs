use crate::domain::post::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait SocialRepository: Send + Sync {
    /// Flips the like state for (user, post) and returns `(liked, new_count)`.
    ///
    /// Atomic per pair: the unique constraint on (user_id, post_id) is the
    /// backstop, and a lost insert race is reported as "already liked"
    /// rather than an error.
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(bool, i32), DomainError>;

    async fn has_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;

    async fn get_likes_count(&self, post_id: Uuid) -> Result<i32, DomainError>;

    /// Counts a view only while the post is approved and not hidden.
    /// Returns the current view count whether or not this call counted.
    async fn record_view(&self, post_id: Uuid) -> Result<i32, DomainError>;
}
