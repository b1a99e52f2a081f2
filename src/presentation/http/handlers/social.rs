use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    domain::notification::events::NotificationEvent,
    infrastructure::cache::traits::likes_count_key,
    presentation::http::{
        errors::AppError, middleware::user::decode_required_user_claims, state::AppState,
    },
};

/// Flips the like state for the caller.
///
/// Liking is not gated on visibility; only a missing post is an error. After
/// the toggle commits, the cached counter for this post is dropped and the
/// author gets a `post_liked` notification on the like direction.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let (liked, count) = state.social.toggle_like(id, user_id).await?;

    // Post-commit hook: the stored counter changed, drop the cached copy.
    state.cache.invalidate(&likes_count_key(id)).await;

    if liked && post.user_id != user_id {
        state
            .notifier
            .notify(post.user_id, NotificationEvent::post_liked(&post, &claims.username))
            .await;
    }

    Ok(Json(json!({ "liked": liked, "count": count })))
}

/// Current like state and count without toggling. The count is served from
/// the counter cache when warm.
pub async fn like_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let liked = state.social.has_liked(id, user_id).await?;

    let key = likes_count_key(id);
    let count = match state.cache.get_count(&key).await {
        Some(cached) => cached,
        None => {
            let fresh = state.social.get_likes_count(id).await?;
            state.cache.set_count(&key, fresh, 300).await;
            fresh
        }
    };

    Ok(Json(json!({ "liked": liked, "count": count })))
}
