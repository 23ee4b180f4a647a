//! HTTP surface tests through the full router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use courtside::api::build_router;
use courtside::config::AppConfig;
use courtside::feeds::FeedService;

use crate::fixture_upstream::{payloads, FixtureUpstream, Reply};

fn router(upstream: FixtureUpstream) -> axum::Router {
    let feeds = FeedService::new(Arc::new(upstream), AppConfig::default())
        .with_clock(|| Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap());
    build_router(Arc::new(feeds))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_games_envelope() {
    let upstream = FixtureUpstream::new().on(
        "/scoreboard",
        &[("dates", "20261019")],
        Reply::Json(payloads::espn_scoreboard(vec![
            payloads::espn_event("401", "post", ("Boston Celtics", "112"), ("Miami Heat", "104")),
            payloads::espn_event("402", "in", ("Denver Nuggets", "60"), ("Los Angeles Lakers", "58")),
        ])),
    );
    let (status, json) = get(router(upstream), "/api/games").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["date"], "2026-10-19");
    assert_eq!(json["games"][0]["id"], "402");
    assert_eq!(json["games"][0]["status"], "Live");
    assert_eq!(json["games"][1]["homeScore"], 112);
}

#[tokio::test]
async fn test_game_stats_envelope() {
    let upstream = FixtureUpstream::new().on("/summary", &[], Reply::Json(payloads::espn_summary("401")));
    let (status, json) = get(router(upstream), "/api/game/401/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["gameId"], "401");
    assert_eq!(json["topPerformers"].as_array().unwrap().len(), 4);
    assert_eq!(json["topPerformers"][0]["name"], "Jayson Tatum");
}

#[tokio::test]
async fn test_news_item_shape() {
    let upstream = FixtureUpstream::new().on("/rss/nba/news", &[], Reply::Text(payloads::RSS.to_string()));
    let (_, json) = get(router(upstream), "/api/news").await;
    assert_eq!(json["success"], true);
    assert_eq!(json["news"][0]["type"], "injury");
    assert_eq!(json["news"][0]["link"], "https://www.espn.com/nba/story/_/id/2");
}

#[tokio::test]
async fn test_fantasy_flattens_performer() {
    let upstream = FixtureUpstream::new().on("/leagueleaders", &[], Reply::Json(payloads::nba_leaders()));
    let (_, json) = get(router(upstream), "/api/fantasy").await;
    assert_eq!(json["players"][0]["name"], "Nikola Jokic");
    assert_eq!(json["players"][0]["fantasyPoints"], 60.25);
}

#[tokio::test]
async fn test_league_stats_boards() {
    let upstream = FixtureUpstream::new().on("/leagueleaders", &[], Reply::Json(payloads::nba_leaders()));
    let (_, json) = get(router(upstream), "/api/league-stats").await;
    assert_eq!(json["leaders"]["points"][0]["name"], "Luka Doncic");
    assert_eq!(json["leaders"]["assists"][0]["name"], "Tyrese Haliburton");
}

#[tokio::test]
async fn test_offline_feeds_still_succeed() {
    for uri in ["/api/games", "/api/news", "/api/social", "/api/betting", "/api/highlights"] {
        let (status, json) = get(router(FixtureUpstream::new()), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(json["success"], true, "{uri}");
    }
}

#[tokio::test]
async fn test_offline_tables_carry_sentinel_rows() {
    let (_, json) = get(router(FixtureUpstream::new()), "/api/standings").await;
    assert_eq!(json["standings"][0]["team"], "No standings available");

    let (_, json) = get(router(FixtureUpstream::new()), "/api/league-stats").await;
    assert_eq!(json["leaders"]["rebounds"][0]["name"], "No league leaders available");

    let (_, json) = get(router(FixtureUpstream::new()), "/api/fantasy").await;
    assert_eq!(json["players"][0]["name"], "No fantasy data available");
    assert_eq!(json["players"][0]["fantasyPoints"], 0.0);
}

#[tokio::test]
async fn test_archive_errors_in_band() {
    let (status, json) = get(router(FixtureUpstream::new()), "/api/archive?date=2026-02-30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_health() {
    let (status, json) = get(router(FixtureUpstream::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
