//! End-to-end feed pipeline tests over fixture upstreams.

use chrono::{TimeZone, Utc};
use std::sync::Arc;

use courtside::config::AppConfig;
use courtside::feeds::FeedService;
use courtside::types::{FeedError, GameStatus, NewsKind};

use crate::fixture_upstream::{payloads, FixtureUpstream, Reply};

/// 18:00 UTC on 2026-10-19 is 13:00 on the league calendar.
fn service(upstream: FixtureUpstream) -> (FeedService, Arc<FixtureUpstream>) {
    service_with(upstream, AppConfig::default())
}

fn service_with(upstream: FixtureUpstream, config: AppConfig) -> (FeedService, Arc<FixtureUpstream>) {
    let upstream = Arc::new(upstream);
    let svc = FeedService::new(upstream.clone(), config)
        .with_clock(|| Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap());
    (svc, upstream)
}

fn two_finals() -> Reply {
    Reply::Json(payloads::espn_scoreboard(vec![
        payloads::espn_event("401", "post", ("Boston Celtics", "112"), ("Miami Heat", "104")),
        payloads::espn_event("402", "post", ("Denver Nuggets", "99"), ("Los Angeles Lakers", "101")),
    ]))
}

#[tokio::test]
async fn test_games_today_empty_falls_back_to_yesterday() {
    let upstream = FixtureUpstream::new()
        .on("/scoreboard", &[("dates", "20261019")], Reply::Json(payloads::espn_scoreboard(vec![])))
        .on("/scoreboardv2", &[("GameDate", "2026-10-19")], Reply::Timeout)
        .on("/scoreboard", &[("dates", "20261018")], two_finals());
    let (svc, upstream) = service(upstream);

    let feed = svc.games().await;
    assert_eq!(feed.date, "2026-10-18");
    assert_eq!(feed.games.len(), 2);
    assert!(feed.games.iter().all(|g| g.status == GameStatus::Final));
    assert_eq!(feed.games[0].id, "401");
    assert_eq!(feed.games[1].id, "402");

    // Nothing after the first success is attempted.
    let calls = upstream.calls();
    assert_eq!(calls.len(), 3);
    assert!(!calls.iter().any(|c| c.contains("20261017")));
}

#[tokio::test]
async fn test_games_secondary_provider_fills_in() {
    let nba = serde_json::json!({
        "resultSets": [
            {"name": "GameHeader",
             "headers": ["GAME_DATE_EST", "GAME_ID", "GAME_STATUS_ID", "GAME_STATUS_TEXT", "HOME_TEAM_ID", "VISITOR_TEAM_ID"],
             "rowSet": [["2026-10-19T00:00:00", "0022600050", 2, "Q2 5:00", 10, 20]]},
            {"name": "LineScore",
             "headers": ["GAME_ID", "TEAM_ID", "TEAM_ABBREVIATION", "TEAM_CITY_NAME", "TEAM_NAME", "PTS"],
             "rowSet": [["0022600050", 10, "PHX", "Phoenix", "Suns", 55],
                        ["0022600050", 20, "SAC", "Sacramento", "Kings", 49]]}
        ]
    });
    let upstream = FixtureUpstream::new()
        .on("/scoreboard", &[("dates", "20261019")], Reply::Status(503))
        .on("/scoreboardv2", &[("GameDate", "2026-10-19")], Reply::Json(nba));
    let (svc, _) = service(upstream);

    let feed = svc.games().await;
    assert_eq!(feed.date, "2026-10-19");
    assert_eq!(feed.games.len(), 1);
    assert_eq!(feed.games[0].status, GameStatus::Live);
    assert_eq!(feed.games[0].home, "Phoenix Suns");
    assert_eq!(feed.games[0].home_score, 55);
    assert_eq!(feed.games[0].away_score, 49);
}

#[tokio::test]
async fn test_everything_down_serves_defaults() {
    let (svc, _) = service(FixtureUpstream::new());

    let games = svc.games().await;
    assert_eq!(games.games.len(), 1);
    assert!(games.games[0].is_placeholder());

    let news = svc.news().await;
    assert_eq!(news[0].headline, "No NBA news available");

    let posts = svc.social().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "No posts available");

    let standings = svc.standings().await;
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].team, "No standings available");

    let players = svc.players().await;
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "No player stats available");
    assert_eq!(players[0].points, 0);

    let fantasy = svc.fantasy().await;
    assert_eq!(fantasy.len(), 1);
    assert_eq!(fantasy[0].performer.name, "No fantasy data available");

    let box_score = svc.game_stats("401").await.unwrap();
    assert_eq!(box_score.len(), 1);
    assert_eq!(box_score[0].name, "No box score available");

    let leaders = svc.league_stats().await;
    for board in [&leaders.points, &leaders.rebounds, &leaders.assists] {
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "No league leaders available");
    }
    assert!(svc.schedule().await.games[0].is_placeholder());
    assert!(svc.playoffs().await.games[0].is_placeholder());
    assert!(svc.highlights().await.games[0].is_placeholder());
    assert!(svc.archive("2026-01-15").await.unwrap().games[0].is_placeholder());
    assert_eq!(svc.betting().await[0].details, "No lines available");
}

#[tokio::test]
async fn test_game_stats_resolves_columns_per_group() {
    let upstream = FixtureUpstream::new().on(
        "/summary",
        &[("event", "401")],
        Reply::Json(payloads::espn_summary("401")),
    );
    let (svc, upstream) = service(upstream);

    let top = svc.game_stats("401").await.unwrap();
    let lines: Vec<(&str, u32, u32)> = top
        .iter()
        .map(|p| (p.name.as_str(), p.points, p.rebounds))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("Jayson Tatum", 34, 9),
            ("Jalen Brunson", 31, 3),
            ("Jaylen Brown", 24, 5),
            ("Josh Hart", 12, 14),
        ]
    );
    assert_eq!(top[0].game_id.as_deref(), Some("401"));
    assert_eq!(upstream.calls().len(), 1);
}

#[tokio::test]
async fn test_game_stats_falls_back_to_box_score() {
    let nba = serde_json::json!({
        "resultSets": [{"name": "PlayerStats",
            "headers": ["GAME_ID", "TEAM_ABBREVIATION", "PLAYER_ID", "PLAYER_NAME", "MIN", "OREB", "REB", "AST", "PTS"],
            "rowSet": [
                ["0022600050", "PHX", 1, "Devin Booker", "36:00", 1, 4, 7, 28],
                ["0022600050", "PHX", 2, "Kevin Durant", "35:12", 0, 6, 4, 28],
                ["0022600050", "PHX", 3, "Benchwarmer", null, null, null, null, 0]
            ]}]
    });
    let upstream = FixtureUpstream::new()
        .on("/summary", &[], Reply::Json(serde_json::json!({"code": 404})))
        .on("/boxscoretraditionalv2", &[("GameID", "0022600050")], Reply::Json(nba));
    let (svc, _) = service(upstream);

    let top = svc.game_stats("0022600050").await.unwrap();
    let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Devin Booker", "Kevin Durant"]);
    assert_eq!(top[0].minutes, "36:00");
}

#[tokio::test]
async fn test_game_stats_rejects_malformed_id() {
    let (svc, upstream) = service(FixtureUpstream::new());
    assert!(matches!(svc.game_stats("401; DROP").await, Err(FeedError::InvalidInput(_))));
    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn test_standings_rank_rederived() {
    let upstream = FixtureUpstream::new().on("/standings", &[], Reply::Json(payloads::espn_standings()));
    let (svc, _) = service(upstream);

    let rows = svc.standings().await;
    let table: Vec<(u32, &str, u32)> = rows.iter().map(|r| (r.rank, r.team.as_str(), r.wins)).collect();
    assert_eq!(
        table,
        vec![
            (1, "Boston Celtics", 64),
            (2, "Oklahoma City Thunder", 57),
            (3, "New York Knicks", 48),
        ]
    );
    assert_eq!(rows[0].conference, "Eastern Conference");
    assert!((rows[0].win_pct - 0.78).abs() < 1e-9);
}

#[tokio::test]
async fn test_leader_derived_feeds() {
    let upstream = FixtureUpstream::new().on(
        "/leagueleaders",
        &[("Season", "2026-27")],
        Reply::Json(payloads::nba_leaders()),
    );
    let (svc, _) = service(upstream);

    let players = svc.players().await;
    assert_eq!(players.len(), 3);
    assert_eq!(players[0].name, "Luka Doncic");
    assert_eq!(players[0].points, 33);
    assert_eq!(players[1].rebounds, 13);

    let leaders = svc.league_stats().await;
    assert_eq!(leaders.rebounds[0].name, "Nikola Jokic");
    assert_eq!(leaders.assists[0].name, "Tyrese Haliburton");

    let fantasy = svc.fantasy().await;
    // Jokic: 29 + 1.25*13 + 1.5*10 = 60.25; Doncic: 33 + 1.25*9 + 1.5*9 = 57.75
    assert_eq!(fantasy[0].performer.name, "Nikola Jokic");
    assert!((fantasy[0].fantasy_points - 60.25).abs() < 1e-9);
    assert!(fantasy.iter().all(|p| p.performer.points > 0));
}

#[tokio::test]
async fn test_news_falls_back_to_rss() {
    let upstream = FixtureUpstream::new()
        .on("/news", &[("limit", "50")], Reply::Json(serde_json::json!({"articles": []})))
        .on("/rss/nba/news", &[], Reply::Text(payloads::RSS.to_string()));
    let (svc, _) = service(upstream);

    let news = svc.news().await;
    assert_eq!(news.len(), 1);
    assert_eq!(news[0].kind, NewsKind::Injury);
    assert_eq!(news[0].time, "2h ago");
}

#[tokio::test]
async fn test_schedule_starts_tomorrow() {
    let upstream = FixtureUpstream::new().on(
        "/scoreboard",
        &[("dates", "20261021")],
        Reply::Json(payloads::espn_scoreboard(vec![payloads::espn_event(
            "501",
            "pre",
            ("Boston Celtics", "0"),
            ("Miami Heat", "0"),
        )])),
    );
    let (svc, upstream) = service(upstream);

    let feed = svc.schedule().await;
    assert_eq!(feed.date, "2026-10-21");
    assert_eq!(feed.games[0].status, GameStatus::Scheduled);
    let calls = upstream.calls();
    assert!(calls[0].contains("20261020"));
    assert!(!calls.iter().any(|c| c.contains("20261019")));
}

#[tokio::test]
async fn test_archive_uses_requested_day_only() {
    let upstream = FixtureUpstream::new().on("/scoreboard", &[("dates", "20260115")], two_finals());
    let (svc, upstream) = service(upstream);

    let feed = svc.archive("2026-01-15").await.unwrap();
    assert_eq!(feed.date, "2026-01-15");
    assert_eq!(feed.games.len(), 2);
    assert_eq!(upstream.calls().len(), 1);

    assert!(matches!(svc.archive("15/01/2026").await, Err(FeedError::InvalidInput(_))));
}

#[tokio::test]
async fn test_betting_lines_from_scoreboard_odds() {
    let upstream = FixtureUpstream::new().on("/scoreboard", &[("dates", "20261019")], two_finals());
    let (svc, _) = service(upstream);

    let lines = svc.betting().await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].details, "BOS -4.5");
    assert_eq!(lines[0].over_under, Some(224.5));
    assert_eq!(lines[0].provider, "ESPN BET");
}

#[tokio::test]
async fn test_speculative_matches_sequential() {
    let build = || {
        FixtureUpstream::new()
            .on("/scoreboard", &[("dates", "20261019")], Reply::Json(payloads::espn_scoreboard(vec![])))
            .on("/scoreboard", &[("dates", "20261018")], two_finals())
            .on("/scoreboard", &[("dates", "20261017")], two_finals())
    };
    let mut config = AppConfig::default();
    config.upstream.speculative = true;

    let (sequential, _) = service(build());
    let (speculative, _) = service_with(build(), config);

    assert_eq!(sequential.games().await, speculative.games().await);
}

#[tokio::test]
async fn test_rerun_is_identical() {
    let build = || {
        FixtureUpstream::new()
            .on("/scoreboard", &[("dates", "20261019")], two_finals())
            .on("/summary", &[], Reply::Json(payloads::espn_summary("401")))
    };
    let (a, _) = service(build());
    let (b, _) = service(build());

    let first = serde_json::to_string(&a.games().await.games).unwrap();
    let second = serde_json::to_string(&b.games().await.games).unwrap();
    assert_eq!(first, second);
    assert_eq!(a.game_stats("401").await.unwrap(), b.game_stats("401").await.unwrap());
}
