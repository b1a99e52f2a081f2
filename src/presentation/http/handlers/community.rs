use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    domain::{
        post::repository::{LeaderboardEntry, LeaderboardSort, SortDirection},
        shared::pagination::{PaginatedResponse, PaginationRequest},
    },
    presentation::http::{errors::AppError, state::AppState},
};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// Users ranked by the racism score of their output. Only accounts with at
/// least one flagged post appear. Unknown sort or direction values fall back
/// to score/desc rather than erroring.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<PaginatedResponse<LeaderboardEntry>>, AppError> {
    let sort = match params.sort.as_deref() {
        Some("count") => LeaderboardSort::Count,
        _ => LeaderboardSort::Score,
    };
    let direction = match params.direction.as_deref() {
        Some("asc") => SortDirection::Asc,
        _ => SortDirection::Desc,
    };

    let page = PaginationRequest {
        limit: params.limit,
        offset: params.offset,
    }
    .clamped(100);

    let (items, total) = state
        .posts
        .leaderboard(sort, direction, page.limit, page.offset)
        .await?;

    Ok(Json(PaginatedResponse::new(items, total, &page)))
}
