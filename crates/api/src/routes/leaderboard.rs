//! Leaderboard routes

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use common::models::LeaderboardEntry;
use serde::Deserialize;

use crate::error::{ApiResult, DbResultExt};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<i32>,
}

pub async fn characters(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let entries = db::leaderboard::top_characters(&state.pool, limit)
        .await
        .db_err()?;
    Ok(Json(entries))
}
