//! Axum HTTP surface over the feed service.
//!
//! Read-only GET endpoints, one per feed, plus `/health`. CORS is open to
//! any origin so browser dashboards can call it directly.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use routes::AppState;

/// Bind `host:port` and serve until Ctrl+C.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    info!(host, port, "API server listening on http://{host}:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received.");
    }
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/games", get(routes::get_games))
        .route("/api/game/:id/stats", get(routes::get_game_stats))
        .route("/api/news", get(routes::get_news))
        .route("/api/social", get(routes::get_social))
        .route("/api/standings", get(routes::get_standings))
        .route("/api/players", get(routes::get_players))
        .route("/api/schedule", get(routes::get_schedule))
        .route("/api/playoffs", get(routes::get_playoffs))
        .route("/api/league-stats", get(routes::get_league_stats))
        .route("/api/highlights", get(routes::get_highlights))
        .route("/api/fantasy", get(routes::get_fantasy))
        .route("/api/archive", get(routes::get_archive))
        .route("/api/betting", get(routes::get_betting))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
