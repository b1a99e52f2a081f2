use crate::domain::post::{
    entity::{FeedPost, Post},
    errors::DomainError,
    repository::{
        AuthorStats, FeedViewer, LeaderboardEntry, LeaderboardSort, ModerationQueue,
        PostRepository, SortDirection,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxPostRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    /// Inserts the pending row of a new post.
    ///
    /// Score and visibility flags stay at their column defaults here; the
    /// moderation update that follows creation writes them in a second pass.
    #[instrument(skip(self, post), fields(post_id = %post.id, author_id = %post.user_id))]
    async fn create(&self, post: &Post) -> Result<Post, DomainError> {
        let created = sqlx::query_as::<_, Post>(
            r#"INSERT INTO posts (id, user_id, content)
               VALUES ($1, $2, $3)
               RETURNING id, user_id, content, racism_score, is_approved, is_hidden,
                         edited_by_admin, original_content, admin_editor_id, admin_edited_at,
                         likes_count, views_count, created_at, updated_at"#,
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create post {}: {}", post.id, e);
            DomainError::InfrastructureError(format!("Failed to create post: {}", e))
        })?;

        info!("Created pending post {} by {}", created.id, created.user_id);
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, Post>(
            r#"SELECT id, user_id, content, racism_score, is_approved, is_hidden,
                      edited_by_admin, original_content, admin_editor_id, admin_edited_at,
                      likes_count, views_count, created_at, updated_at
               FROM posts WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(row)
    }

    async fn find_feed_post(&self, id: Uuid) -> Result<Option<FeedPost>, DomainError> {
        let row = sqlx::query_as::<_, FeedPost>(
            r#"SELECT p.id, p.user_id, u.username AS author_username,
                      u.display_name AS author_display_name, p.content, p.racism_score,
                      p.is_approved, p.is_hidden, p.edited_by_admin,
                      p.likes_count, p.views_count, p.created_at, p.updated_at
               FROM posts p
               JOIN users u ON u.id = p.user_id
               WHERE p.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(row)
    }

    async fn apply_moderation(
        &self,
        id: Uuid,
        score: f64,
        is_approved: bool,
        is_hidden: bool,
    ) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET racism_score = $2, is_approved = $3, is_hidden = $4, updated_at = NOW()
               WHERE id = $1
               RETURNING id, user_id, content, racism_score, is_approved, is_hidden,
                         edited_by_admin, original_content, admin_editor_id, admin_edited_at,
                         likes_count, views_count, created_at, updated_at"#,
        )
        .bind(id)
        .bind(score)
        .bind(is_approved)
        .bind(is_hidden)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        row.ok_or_else(|| DomainError::NotFound("Post not found".into()))
    }

    async fn apply_rescore(
        &self,
        id: Uuid,
        score: f64,
        is_hidden: bool,
    ) -> Result<Post, DomainError> {
        // Deliberately leaves is_approved alone; only creation-time
        // moderation and explicit admin action touch it.
        let row = sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET racism_score = $2, is_hidden = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING id, user_id, content, racism_score, is_approved, is_hidden,
                         edited_by_admin, original_content, admin_editor_id, admin_edited_at,
                         likes_count, views_count, created_at, updated_at"#,
        )
        .bind(id)
        .bind(score)
        .bind(is_hidden)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        row.ok_or_else(|| DomainError::NotFound("Post not found".into()))
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET is_approved = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING id, user_id, content, racism_score, is_approved, is_hidden,
                         edited_by_admin, original_content, admin_editor_id, admin_edited_at,
                         likes_count, views_count, created_at, updated_at"#,
        )
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        row.ok_or_else(|| DomainError::NotFound("Post not found".into()))
    }

    async fn set_hidden(&self, id: Uuid, hidden: bool) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET is_hidden = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING id, user_id, content, racism_score, is_approved, is_hidden,
                         edited_by_admin, original_content, admin_editor_id, admin_edited_at,
                         likes_count, views_count, created_at, updated_at"#,
        )
        .bind(id)
        .bind(hidden)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        row.ok_or_else(|| DomainError::NotFound("Post not found".into()))
    }

    /// Replaces post content as a moderator.
    ///
    /// The CASE guard makes the original_content capture first-edit-only at
    /// the SQL level, so concurrent edits cannot overwrite the original text.
    #[instrument(skip(self, content), fields(post_id = %id, editor_id = %editor_id))]
    async fn apply_admin_edit(
        &self,
        id: Uuid,
        content: &str,
        editor_id: Uuid,
    ) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET original_content = CASE WHEN edited_by_admin THEN original_content ELSE content END,
                   content = $2,
                   edited_by_admin = TRUE,
                   admin_editor_id = $3,
                   admin_edited_at = NOW(),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, user_id, content, racism_score, is_approved, is_hidden,
                         edited_by_admin, original_content, admin_editor_id, admin_edited_at,
                         likes_count, views_count, created_at, updated_at"#,
        )
        .bind(id)
        .bind(content)
        .bind(editor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to edit post {}: {}", id, e);
            DomainError::InfrastructureError(format!("Failed to edit post: {}", e))
        })?;

        row.ok_or_else(|| DomainError::NotFound("Post not found".into()))
    }

    #[instrument(skip(self), fields(post_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete post {}: {}", id, e);
                DomainError::InfrastructureError(format!("Failed to delete post: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Post not found".into()));
        }

        info!("Deleted post {}", id);
        Ok(())
    }

    async fn list_feed(
        &self,
        viewer: FeedViewer,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FeedPost>, i64), DomainError> {
        let (viewer_id, see_all) = match viewer {
            FeedViewer::Anonymous => (None, false),
            FeedViewer::User(id) => (Some(id), false),
            FeedViewer::Moderator => (None, true),
        };

        let rows = sqlx::query_as::<_, FeedPost>(
            r#"SELECT p.id, p.user_id, u.username AS author_username,
                      u.display_name AS author_display_name, p.content, p.racism_score,
                      p.is_approved, p.is_hidden, p.edited_by_admin,
                      p.likes_count, p.views_count, p.created_at, p.updated_at
               FROM posts p
               JOIN users u ON u.id = p.user_id
               WHERE (p.is_approved AND NOT p.is_hidden) OR p.user_id = $1 OR $2
               ORDER BY p.created_at DESC
               LIMIT $3 OFFSET $4"#,
        )
        .bind(viewer_id)
        .bind(see_all)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM posts p
               WHERE (p.is_approved AND NOT p.is_hidden) OR p.user_id = $1 OR $2"#,
        )
        .bind(viewer_id)
        .bind(see_all)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        debug!("Feed query returned {} of {} posts", rows.len(), total);
        Ok((rows, total))
    }

    async fn list_queue(
        &self,
        queue: ModerationQueue,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FeedPost>, i64), DomainError> {
        let filter = match queue {
            ModerationQueue::Pending => "NOT p.is_approved",
            ModerationQueue::Flagged => {
                "EXISTS (SELECT 1 FROM content_reports r WHERE r.post_id = p.id AND r.is_racism_report)"
            }
            ModerationQueue::Hidden => "p.is_hidden",
        };

        let query = format!(
            r#"SELECT p.id, p.user_id, u.username AS author_username,
                      u.display_name AS author_display_name, p.content, p.racism_score,
                      p.is_approved, p.is_hidden, p.edited_by_admin,
                      p.likes_count, p.views_count, p.created_at, p.updated_at
               FROM posts p
               JOIN users u ON u.id = p.user_id
               WHERE {}
               ORDER BY p.created_at DESC
               LIMIT $1 OFFSET $2"#,
            filter
        );

        let rows = sqlx::query_as::<_, FeedPost>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        let count_query = format!("SELECT COUNT(*) FROM posts p WHERE {}", filter);
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok((rows, total))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        include_non_public: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FeedPost>, i64), DomainError> {
        let rows = sqlx::query_as::<_, FeedPost>(
            r#"SELECT p.id, p.user_id, u.username AS author_username,
                      u.display_name AS author_display_name, p.content, p.racism_score,
                      p.is_approved, p.is_hidden, p.edited_by_admin,
                      p.likes_count, p.views_count, p.created_at, p.updated_at
               FROM posts p
               JOIN users u ON u.id = p.user_id
               WHERE p.user_id = $1 AND ((p.is_approved AND NOT p.is_hidden) OR $2)
               ORDER BY p.created_at DESC
               LIMIT $3 OFFSET $4"#,
        )
        .bind(author_id)
        .bind(include_non_public)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM posts p
               WHERE p.user_id = $1 AND ((p.is_approved AND NOT p.is_hidden) OR $2)"#,
        )
        .bind(author_id)
        .bind(include_non_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok((rows, total))
    }

    /// Ranks users by the racism output of their posting history.
    ///
    /// A post counts as flagged once its score is above zero; users without
    /// a single flagged post never appear, whatever the sort.
    async fn leaderboard(
        &self,
        sort: LeaderboardSort,
        direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LeaderboardEntry>, i64), DomainError> {
        let order_column = match sort {
            LeaderboardSort::Score => "total_racism_score",
            LeaderboardSort::Count => "flagged_posts_count",
        };
        let order_direction = match direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };

        let query = format!(
            r#"SELECT u.id AS user_id, u.username, u.display_name,
                      SUM(p.racism_score) AS total_racism_score,
                      COUNT(*) FILTER (WHERE p.racism_score > 0) AS flagged_posts_count
               FROM users u
               JOIN posts p ON p.user_id = u.id
               GROUP BY u.id, u.username, u.display_name
               HAVING COUNT(*) FILTER (WHERE p.racism_score > 0) > 0
               ORDER BY {} {}, u.username ASC
               LIMIT $1 OFFSET $2"#,
            order_column, order_direction
        );

        let rows = sqlx::query_as::<_, LeaderboardEntry>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM (
                   SELECT u.id FROM users u
                   JOIN posts p ON p.user_id = u.id
                   GROUP BY u.id
                   HAVING COUNT(*) FILTER (WHERE p.racism_score > 0) > 0
               ) ranked"#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok((rows, total))
    }

    async fn author_stats(&self, author_id: Uuid) -> Result<AuthorStats, DomainError> {
        let stats = sqlx::query_as::<_, AuthorStats>(
            r#"SELECT COALESCE(SUM(p.racism_score), 0) AS cumulative_racism_score,
                      COUNT(*) FILTER (WHERE p.racism_score > 0) AS flagged_posts_count,
                      COALESCE(SUM(p.likes_count), 0) AS total_likes_received,
                      COALESCE(SUM(p.views_count), 0) AS total_views,
                      COUNT(*) AS posts_count
               FROM posts p
               WHERE p.user_id = $1"#,
        )
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok(stats)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(())
    }
}
