//! Guild routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::models::Guild;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, DbResultExt};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<i32>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Guild>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let guilds = db::guilds::list_by_xp(&state.pool, limit).await.db_err()?;
    Ok(Json(guilds))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Guild>> {
    let guild = db::guilds::get(&state.pool, id)
        .await
        .db_err()?
        .ok_or_else(|| ApiError(common::Error::GuildNotFound(id)))?;
    Ok(Json(guild))
}

#[derive(Serialize)]
pub struct RecalculateResponse {
    pub id: Uuid,
    pub total_xp: i64,
    pub total_members: i32,
}

/// Force a fresh aggregate recompute, the repair path for stale
/// guild totals
pub async fn recalculate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RecalculateResponse>> {
    db::guilds::get(&state.pool, id)
        .await
        .db_err()?
        .ok_or_else(|| ApiError(common::Error::GuildNotFound(id)))?;

    let totals = engine::guilds::recalculate_guild(state.store.as_ref(), id).await?;
    Ok(Json(RecalculateResponse {
        id,
        total_xp: totals.total_xp,
        total_members: totals.total_members,
    }))
}
