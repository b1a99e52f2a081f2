use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::post::entity::FeedPost,
    presentation::http::{
        errors::AppError, middleware::user::decode_optional_user_claims, state::AppState,
    },
};

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ProfileStats {
    pub cumulative_racism_score: f64,
    pub flagged_posts_count: i64,
    pub total_likes_received: i64,
    pub total_views: i64,
    pub posts_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub stats: ProfileStats,
    pub recent_posts: Vec<FeedPost>,
}

/// Public profile: identity, aggregate stats, and recent posts filtered by
/// the viewer's visibility. Owners and moderators also see non-public posts.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<ProfileQuery>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let claims = decode_optional_user_claims(&headers, &state.config.jwt_secret);
    let include_non_public = claims
        .as_ref()
        .map(|c| c.role().can_moderate() || c.sub == user.id.to_string())
        .unwrap_or(false);

    let stats = state.posts.author_stats(user.id).await?;
    let (recent_posts, _) = state
        .posts
        .list_by_author(
            user.id,
            include_non_public,
            params.limit.clamp(1, 50),
            params.offset.max(0),
        )
        .await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        created_at: user.created_at,
        stats: ProfileStats {
            cumulative_racism_score: (stats.cumulative_racism_score * 100.0).round() / 100.0,
            flagged_posts_count: stats.flagged_posts_count,
            total_likes_received: stats.total_likes_received,
            total_views: stats.total_views,
            posts_count: stats.posts_count,
        },
        recent_posts,
    }))
}
