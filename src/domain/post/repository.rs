use super::entity::{FeedPost, Post};
use super::errors::DomainError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Who is reading a listing; decides which flag combinations are served.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedViewer {
    Anonymous,
    User(Uuid),
    Moderator,
}

/// Moderation work queues, selected by the admin listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModerationQueue {
    /// Posts that never cleared approval (`is_approved = false`)
    Pending,
    /// Posts with at least one racism report attached
    Flagged,
    /// Posts currently hidden
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LeaderboardSort {
    #[default]
    Score,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// One leaderboard row: a user ranked by the racism score of their output.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub total_racism_score: f64,
    pub flagged_posts_count: i64,
}

/// Aggregate statistics over one author's posts, shown on profiles.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct AuthorStats {
    pub cumulative_racism_score: f64,
    pub flagged_posts_count: i64,
    pub total_likes_received: i64,
    pub total_views: i64,
    pub posts_count: i64,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn find_feed_post(&self, id: Uuid) -> Result<Option<FeedPost>, DomainError>;

    /// Writes the creation-time moderation outcome: score plus both flags.
    async fn apply_moderation(
        &self,
        id: Uuid,
        score: f64,
        is_approved: bool,
        is_hidden: bool,
    ) -> Result<Post, DomainError>;

    /// Writes a report-driven rescore: score and the hidden flag only.
    async fn apply_rescore(&self, id: Uuid, score: f64, is_hidden: bool)
    -> Result<Post, DomainError>;

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<Post, DomainError>;
    async fn set_hidden(&self, id: Uuid, hidden: bool) -> Result<Post, DomainError>;

    /// Replaces the content as a moderator. The first edit captures the
    /// previous content into `original_content`; later edits never touch it.
    async fn apply_admin_edit(
        &self,
        id: Uuid,
        content: &str,
        editor_id: Uuid,
    ) -> Result<Post, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    async fn list_feed(
        &self,
        viewer: FeedViewer,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FeedPost>, i64), DomainError>;

    async fn list_queue(
        &self,
        queue: ModerationQueue,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FeedPost>, i64), DomainError>;

    async fn list_by_author(
        &self,
        author_id: Uuid,
        include_non_public: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FeedPost>, i64), DomainError>;

    async fn leaderboard(
        &self,
        sort: LeaderboardSort,
        direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LeaderboardEntry>, i64), DomainError>;

    async fn author_stats(&self, author_id: Uuid) -> Result<AuthorStats, DomainError>;

    /// Storage connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), DomainError>;
}
