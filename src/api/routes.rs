//! HTTP route handlers.
//!
//! Every feed endpoint answers with a JSON envelope:
//! `{"success": true, "<field>": ...}` or `{"success": false, "error": "..."}`.
//! Rejected input is reported in-band with a 200. Only a fault inside the
//! feed task itself surfaces as a 500.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::feeds::{FeedService, GamesFeed};
use crate::types::{BettingLine, FantasyPick, FeedError, Game, LeagueLeaders, NewsItem, Performer, SocialPost, StandingRow};

pub type AppState = Arc<FeedService>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub date: String,
    pub games: Vec<Game>,
}

impl From<GamesFeed> for GamesResponse {
    fn from(feed: GamesFeed) -> Self {
        Self {
            date: feed.date,
            games: feed.games,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatsResponse {
    pub game_id: String,
    pub top_performers: Vec<Performer>,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
pub struct SocialResponse {
    pub posts: Vec<SocialPost>,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<StandingRow>,
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<Performer>,
}

#[derive(Debug, Serialize)]
pub struct LeadersResponse {
    pub leaders: LeagueLeaders,
}

#[derive(Debug, Serialize)]
pub struct FantasyResponse {
    pub players: Vec<FantasyPick>,
}

#[derive(Debug, Serialize)]
pub struct BettingResponse {
    pub lines: Vec<BettingLine>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveQuery {
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Envelope plumbing
// ---------------------------------------------------------------------------

fn failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

/// Run one feed operation on its own task so a fault inside it becomes a
/// 500 instead of a dropped connection.
async fn respond<T, F, Fut>(state: AppState, op: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce(AppState) -> Fut,
    Fut: Future<Output = Result<T, FeedError>> + Send + 'static,
{
    let outcome = tokio::spawn(op(state))
        .await
        .unwrap_or_else(|join| Err(FeedError::Internal(format!("feed task aborted: {join}"))));
    match outcome {
        Ok(body) => Json(Envelope { success: true, body }).into_response(),
        Err(FeedError::InvalidInput(message)) => {
            warn!(error = %message, "Rejected request");
            failure(StatusCode::OK, message)
        }
        Err(err @ FeedError::Internal(_)) => {
            error!(error = %err, "Feed failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/games
pub async fn get_games(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move { Ok::<_, FeedError>(GamesResponse::from(feeds.games().await)) }).await
}

/// GET /api/game/:id/stats
pub async fn get_game_stats(State(state): State<AppState>, Path(game_id): Path<String>) -> Response {
    respond(state, |feeds| async move {
        let top_performers = feeds.game_stats(&game_id).await?;
        Ok::<_, FeedError>(GameStatsResponse { game_id, top_performers })
    })
    .await
}

/// GET /api/news
pub async fn get_news(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move { Ok::<_, FeedError>(NewsResponse { news: feeds.news().await }) }).await
}

/// GET /api/social
pub async fn get_social(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move { Ok::<_, FeedError>(SocialResponse { posts: feeds.social().await }) }).await
}

/// GET /api/standings
pub async fn get_standings(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move {
        Ok::<_, FeedError>(StandingsResponse {
            standings: feeds.standings().await,
        })
    })
    .await
}

/// GET /api/players
pub async fn get_players(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move {
        Ok::<_, FeedError>(PlayersResponse {
            players: feeds.players().await,
        })
    })
    .await
}

/// GET /api/schedule
pub async fn get_schedule(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move { Ok::<_, FeedError>(GamesResponse::from(feeds.schedule().await)) }).await
}

/// GET /api/playoffs
pub async fn get_playoffs(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move { Ok::<_, FeedError>(GamesResponse::from(feeds.playoffs().await)) }).await
}

/// GET /api/league-stats
pub async fn get_league_stats(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move {
        Ok::<_, FeedError>(LeadersResponse {
            leaders: feeds.league_stats().await,
        })
    })
    .await
}

/// GET /api/highlights
pub async fn get_highlights(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move { Ok::<_, FeedError>(GamesResponse::from(feeds.highlights().await)) }).await
}

/// GET /api/fantasy
pub async fn get_fantasy(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move {
        Ok::<_, FeedError>(FantasyResponse {
            players: feeds.fantasy().await,
        })
    })
    .await
}

/// GET /api/archive?date=YYYY-MM-DD
pub async fn get_archive(State(state): State<AppState>, Query(query): Query<ArchiveQuery>) -> Response {
    respond(state, |feeds| async move {
        let date = query
            .date
            .ok_or_else(|| FeedError::InvalidInput("Missing date parameter (YYYY-MM-DD)".to_string()))?;
        Ok::<_, FeedError>(GamesResponse::from(feeds.archive(&date).await?))
    })
    .await
}

/// GET /api/betting
pub async fn get_betting(State(state): State<AppState>) -> Response {
    respond(state, |feeds| async move { Ok::<_, FeedError>(BettingResponse { lines: feeds.betting().await }) }).await
}

/// GET /health
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}
