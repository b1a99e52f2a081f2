use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    domain::{
        notification::events::{ModerationAction, NotificationEvent},
        post::{
            entity::{FeedPost, Post},
            repository::ModerationQueue,
            value_objects::PostContent,
        },
        report::entity::ReportDetail,
        shared::pagination::{PaginatedResponse, PaginationRequest},
        user::entity::{Role, User},
    },
    presentation::http::{errors::AppError, middleware::user::UserClaims, state::AppState},
};

// --- DTOs ---

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    #[serde(default = "default_queue")]
    pub queue: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_queue() -> String {
    "pending".to_string()
}
fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct ModerationDetail {
    pub post: Post,
    pub reports: Vec<ReportDetail>,
}

// --- Handlers ---

pub async fn get_moderation_queue(
    State(state): State<AppState>,
    Query(params): Query<QueueQuery>,
) -> Result<Json<PaginatedResponse<FeedPost>>, AppError> {
    let queue = match params.queue.to_lowercase().as_str() {
        "pending" => ModerationQueue::Pending,
        "flagged" => ModerationQueue::Flagged,
        "hidden" => ModerationQueue::Hidden,
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown moderation queue: {}",
                other
            )));
        }
    };

    let page = PaginationRequest {
        limit: params.limit,
        offset: params.offset,
    }
    .clamped(100);

    let (items, total) = state.posts.list_queue(queue, page.limit, page.offset).await?;
    Ok(Json(PaginatedResponse::new(items, total, &page)))
}

/// Moderation detail: the post at any visibility plus its full report list.
pub async fn get_post_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ModerationDetail>, AppError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    let reports = state.reports.list_for_post(id).await?;

    Ok(Json(ModerationDetail { post, reports }))
}

async fn moderate(
    state: &AppState,
    claims: &UserClaims,
    id: Uuid,
    action: ModerationAction,
) -> Result<Post, AppError> {
    let post = match action {
        ModerationAction::Approved => state.posts.set_approved(id, true).await?,
        ModerationAction::Hidden => state.posts.set_hidden(id, true).await?,
        ModerationAction::Unhidden => state.posts.set_hidden(id, false).await?,
    };

    state
        .audit
        .record(
            claims.user_id()?,
            action.as_str(),
            Some(id),
            Some(json!({ "racism_score": post.racism_score })),
        )
        .await;

    state
        .notifier
        .notify(post.user_id, NotificationEvent::post_moderated(&post, action))
        .await;

    tracing::info!(post_id = %id, action = action.as_str(), moderator = %claims.username, "Post moderated");
    Ok(post)
}

pub async fn approve_post(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let post = moderate(&state, &claims, id, ModerationAction::Approved).await?;
    Ok(Json(post))
}

pub async fn hide_post(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let post = moderate(&state, &claims, id, ModerationAction::Hidden).await?;
    Ok(Json(post))
}

pub async fn unhide_post(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let post = moderate(&state, &claims, id, ModerationAction::Unhidden).await?;
    Ok(Json(post))
}

/// Rewrites post content as a moderator. The first edit preserves the
/// original text; every edit stamps the editor and time.
pub async fn edit_post(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(id): Path<Uuid>,
    Json(body): Json<EditPostRequest>,
) -> Result<Json<Post>, AppError> {
    let content = PostContent::new(body.content)
        .map_err(|_| AppError::ValidationError("Content must be 1-280 characters".to_string()))?;

    let editor_id = claims.user_id()?;
    let post = state
        .posts
        .apply_admin_edit(id, &content.value, editor_id)
        .await?;

    state
        .audit
        .record(
            editor_id,
            "edit",
            Some(id),
            Some(json!({ "new_length": post.content.chars().count() })),
        )
        .await;

    state
        .notifier
        .notify(post.user_id, NotificationEvent::post_edited(&post))
        .await;

    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.posts.delete(id).await?;

    state
        .audit
        .record(claims.user_id()?, "delete", Some(id), None)
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Changes an account's role. Restricted to full admins; the moderation
/// guard alone is not enough here.
pub async fn set_user_role(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(username): Path<String>,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<User>, AppError> {
    if claims.role() != Role::Admin {
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }

    let role: Role = body
        .role
        .parse()
        .map_err(|e: String| AppError::ValidationError(e))?;

    let user = state.users.set_role(&username, role).await?;

    state
        .audit
        .record(
            claims.user_id()?,
            "set_role",
            None,
            Some(json!({ "username": username, "role": role.as_str() })),
        )
        .await;

    Ok(Json(user))
}
