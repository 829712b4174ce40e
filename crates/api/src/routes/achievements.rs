//! Achievement routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use common::models::AchievementGrant;
use common::store::Store;
use engine::GrantOutcome;
use tracing::info;

use crate::error::{ApiError, ApiResult, DbResultExt};
use crate::state::AppState;

pub async fn grant(
    State(state): State<Arc<AppState>>,
    Path((login, code)): Path<(String, String)>,
) -> ApiResult<Json<GrantOutcome>> {
    let user = state
        .store
        .user_by_login(&login)
        .await?
        .ok_or_else(|| ApiError(common::Error::UserNotFound(login.clone())))?;

    info!("achievement {} requested for {}", code, login);
    let outcome = engine::grant_achievement(state.store.as_ref(), user.id, &code).await?;
    Ok(Json(outcome))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(login): Path<String>,
) -> ApiResult<Json<Vec<AchievementGrant>>> {
    let user = state
        .store
        .user_by_login(&login)
        .await?
        .ok_or_else(|| ApiError(common::Error::UserNotFound(login.clone())))?;

    let grants = db::achievements::list_for_user(&state.pool, user.id)
        .await
        .db_err()?;
    Ok(Json(grants))
}
