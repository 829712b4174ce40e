//! GitQuest API server

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gitquest=debug".parse()?)
                .add_directive("api=debug".parse()?),
        )
        .init();

    info!("Starting GitQuest API");

    // Load configuration
    let config = common::Config::from_env();

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // GitHub client; without a token the search API quota is tiny but
    // the server still starts
    let client = github::GitHubClient::new(config.github_token.clone())?;

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), pool, client));

    let app = Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/users/:login/sync", post(routes::sync::trigger))
        .route(
            "/api/users/:login/achievements",
            get(routes::achievements::list),
        )
        .route(
            "/api/users/:login/achievements/:code",
            post(routes::achievements::grant),
        )
        .route("/api/recalculate", post(routes::recalc::trigger))
        .route("/api/leaderboard", get(routes::leaderboard::characters))
        .route("/api/guilds", get(routes::guilds::list))
        .route("/api/guilds/:id", get(routes::guilds::get))
        .route(
            "/api/guilds/:id/recalculate",
            post(routes::guilds::recalculate),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
