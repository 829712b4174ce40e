//! Manual sync route

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use engine::SyncOutcome;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn trigger(
    State(state): State<Arc<AppState>>,
    Path(login): Path<String>,
) -> ApiResult<Json<SyncOutcome>> {
    info!("manual sync requested for {}", login);
    let outcome = state.reconciler.reconcile_user(&login).await?;
    Ok(Json(outcome))
}
