use crate::domain::{post::errors::DomainError, social::repository::SocialRepository};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

pub struct SqlxSocialRepository {
    pub pool: PgPool,
}

impl SqlxSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialRepository for SqlxSocialRepository {
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(bool, i32), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)"#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        let liked = if exists {
            sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
            sqlx::query(
                "UPDATE posts SET likes_count = GREATEST(0, likes_count - 1) WHERE id = $1",
            )
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
            false
        } else {
            // ON CONFLICT absorbs the race where another request inserted the
            // same (user, post) pair between our existence check and here.
            // Zero rows affected means they won; report "already liked".
            let inserted = sqlx::query(
                r#"INSERT INTO likes (id, user_id, post_id) VALUES ($1, $2, $3)
                   ON CONFLICT (user_id, post_id) DO NOTHING"#,
            )
            .bind(Uuid::now_v7())
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

            if inserted.rows_affected() == 1 {
                sqlx::query("UPDATE posts SET likes_count = likes_count + 1 WHERE id = $1")
                    .bind(post_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
            } else {
                debug!("Like insert lost a race for post {}, treating as already liked", post_id);
            }
            true
        };

        let new_count = sqlx::query_scalar::<_, i32>("SELECT likes_count FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        Ok((liked, new_count))
    }

    async fn has_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)"#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(exists)
    }

    async fn get_likes_count(&self, post_id: Uuid) -> Result<i32, DomainError> {
        let count = sqlx::query_scalar::<_, i32>("SELECT likes_count FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(count)
    }

    async fn record_view(&self, post_id: Uuid) -> Result<i32, DomainError> {
        // Single conditional update: only visible posts accumulate views.
        let counted = sqlx::query_scalar::<_, i32>(
            r#"UPDATE posts SET views_count = views_count + 1
               WHERE id = $1 AND is_approved AND NOT is_hidden
               RETURNING views_count"#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        if let Some(count) = counted {
            return Ok(count);
        }

        let current = sqlx::query_scalar::<_, i32>("SELECT views_count FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        current.ok_or_else(|| DomainError::NotFound("Post not found".into()))
    }
}
