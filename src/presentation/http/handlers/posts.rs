use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::{publish_post::dto::PublishPostRequest, report_post::dto::ReportPostRequest},
    domain::{
        post::{entity::FeedPost, repository::FeedViewer},
        shared::pagination::{PaginatedResponse, PaginationRequest},
    },
    presentation::http::{
        errors::AppError,
        middleware::user::{UserClaims, decode_optional_user_claims, decode_required_user_claims},
        state::AppState,
    },
};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

fn viewer_from_claims(claims: Option<&UserClaims>) -> FeedViewer {
    match claims {
        Some(c) if c.role().can_moderate() => FeedViewer::Moderator,
        Some(c) => c
            .user_id()
            .map(FeedViewer::User)
            .unwrap_or(FeedViewer::Anonymous),
        None => FeedViewer::Anonymous,
    }
}

/// Whether this viewer may see the post at all. Hidden and unapproved posts
/// stay visible to their author and to moderators.
fn visible_to(post: &FeedPost, viewer: FeedViewer) -> bool {
    match viewer {
        FeedViewer::Moderator => true,
        FeedViewer::User(id) => (post.is_approved && !post.is_hidden) || post.user_id == id,
        FeedViewer::Anonymous => post.is_approved && !post.is_hidden,
    }
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PublishPostRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;

    let post = state
        .publish_post
        .execute(claims.user_id()?, &claims.username, body)
        .await?;

    Ok((StatusCode::CREATED, Json(serde_json::to_value(&post).map_err(|e| AppError::Internal(e.to_string()))?)))
}

pub async fn get_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
    headers: HeaderMap,
) -> Result<Json<PaginatedResponse<FeedPost>>, AppError> {
    let claims = decode_optional_user_claims(&headers, &state.config.jwt_secret);
    let viewer = viewer_from_claims(claims.as_ref());

    let page = PaginationRequest {
        limit: params.limit,
        offset: params.offset,
    }
    .clamped(100);

    let (items, total) = state.posts.list_feed(viewer, page.limit, page.offset).await?;
    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<FeedPost>, AppError> {
    let claims = decode_optional_user_claims(&headers, &state.config.jwt_secret);
    let viewer = viewer_from_claims(claims.as_ref());

    let post = state
        .posts
        .find_feed_post(id)
        .await?
        .filter(|p| visible_to(p, viewer))
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Records one view. Views only count while the post is approved and not
/// hidden; the current counter comes back either way.
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let views_count = state.social.record_view(id).await?;
    Ok(Json(json!({ "views_count": views_count })))
}

pub async fn report_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<ReportPostRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = decode_required_user_claims(&headers, &state.config.jwt_secret)?;

    let post = state.report_post.execute(claims.user_id()?, id, body).await?;

    Ok(Json(json!({
        "post_id": post.id,
        "racism_score": post.racism_score,
        "is_hidden": post.is_hidden,
    })))
}
