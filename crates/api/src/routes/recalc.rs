//! Bulk recalculation route (admin-gated upstream)

use std::sync::Arc;

use axum::{extract::State, Json};
use engine::SyncReport;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

#[derive(Serialize)]
pub struct RecalcResponse {
    pub status: String,
    pub users: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub report: Vec<SyncReport>,
}

pub async fn trigger(State(state): State<Arc<AppState>>) -> Json<RecalcResponse> {
    info!("bulk recalculation triggered via API");

    let report = state.reconciler.reconcile_all().await;
    let succeeded = report.iter().filter(|r| r.success).count();

    Json(RecalcResponse {
        status: "complete".to_string(),
        users: report.len(),
        succeeded,
        failed: report.len() - succeeded,
        report,
    })
}
