//! Application state

use std::sync::Arc;

use common::Config;
use db::PgStore;
use engine::{Reconciler, ReconcilerConfig};
use github::GitHubClient;
use sqlx::PgPool;

/// Shared application state. Collaborators are resolved once here and
/// handed to the engine explicitly.
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub store: Arc<PgStore>,
    pub reconciler: Reconciler,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, client: GitHubClient) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        let reconciler = Reconciler::new(
            Arc::new(client),
            store.clone(),
            ReconcilerConfig::from_config(&config),
        );
        Self {
            config,
            pool,
            store,
            reconciler,
        }
    }
}
