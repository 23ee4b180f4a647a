//! Fixture upstream for integration testing.
//!
//! Provides a deterministic `Upstream` implementation that answers from a
//! list of canned replies and records every request it sees, all in-memory
//! with no network access.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

use courtside::types::UpstreamError;
use courtside::upstream::{RawPayload, Upstream, UpstreamRequest};

/// What a matched fixture answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Text(String),
    Timeout,
    Status(u16),
}

#[derive(Debug, Clone)]
struct Fixture {
    url_suffix: String,
    query: Vec<(String, String)>,
    reply: Reply,
}

/// Requests are matched against fixtures in insertion order; the first
/// fixture whose URL suffix and query pairs all match wins. Unmatched
/// requests fail with a transport error.
#[derive(Default)]
pub struct FixtureUpstream {
    fixtures: Vec<Fixture>,
    calls: Mutex<Vec<String>>,
}

impl FixtureUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, url_suffix: &str, query: &[(&str, &str)], reply: Reply) -> Self {
        self.fixtures.push(Fixture {
            url_suffix: url_suffix.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            reply,
        });
        self
    }

    /// Every request seen so far, as `url?query`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn matches(fixture: &Fixture, request: &UpstreamRequest) -> bool {
        request.url.ends_with(&fixture.url_suffix)
            && fixture
                .query
                .iter()
                .all(|(k, v)| request.query_value(k) == Some(v.as_str()))
    }
}

#[async_trait]
impl Upstream for FixtureUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawPayload, UpstreamError> {
        let endpoint = request.describe();
        self.calls.lock().unwrap().push(endpoint.clone());

        let Some(fixture) = self.fixtures.iter().find(|f| Self::matches(f, request)) else {
            return Err(UpstreamError::Transport {
                endpoint,
                message: "no fixture".to_string(),
            });
        };

        match &fixture.reply {
            Reply::Json(v) => Ok(RawPayload::Json(v.clone())),
            Reply::Text(t) => Ok(RawPayload::Text(t.clone())),
            Reply::Timeout => Err(UpstreamError::Timeout {
                endpoint,
                after: Duration::from_secs(10),
            }),
            Reply::Status(status) => Err(UpstreamError::BadResponse {
                endpoint,
                status: *status,
                body: String::new(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Canned payloads
// ---------------------------------------------------------------------------

pub mod payloads {
    use serde_json::{json, Value};

    pub fn espn_event(id: &str, state: &str, home: (&str, &str), away: (&str, &str)) -> Value {
        json!({
            "id": id,
            "date": "2026-10-19T23:30Z",
            "status": {"type": {"state": state, "shortDetail": "Q4 2:10"}},
            "competitions": [{
                "competitors": [
                    {"homeAway": "home", "score": home.1, "team": {"displayName": home.0}},
                    {"homeAway": "away", "score": away.1, "team": {"displayName": away.0}}
                ],
                "odds": [{"details": "BOS -4.5", "overUnder": 224.5, "provider": {"name": "ESPN BET"}}]
            }]
        })
    }

    pub fn espn_scoreboard(events: Vec<Value>) -> Value {
        json!({ "events": events })
    }

    /// Box score whose label order differs between the two teams.
    pub fn espn_summary(game_id: &str) -> Value {
        json!({
            "header": {"id": game_id},
            "boxscore": {"players": [
                {
                    "team": {"abbreviation": "BOS"},
                    "statistics": [{
                        "labels": ["MIN", "FG", "OREB", "REB", "AST", "PTS"],
                        "athletes": [
                            {"athlete": {"displayName": "Jayson Tatum"}, "stats": ["38", "12-22", "1", "9", "6", "34"]},
                            {"athlete": {"displayName": "Jaylen Brown"}, "stats": ["35", "9-18", "2", "5", "3", "24"]},
                            {"athlete": {"displayName": "Bench Guy"}, "stats": ["--", "--", "--", "--", "--", "--"]}
                        ]
                    }]
                },
                {
                    "team": {"abbreviation": "NYK"},
                    "statistics": [{
                        "labels": ["PTS", "REB", "AST", "MIN"],
                        "athletes": [
                            {"athlete": {"displayName": "Jalen Brunson"}, "stats": ["31", "3", "8", "37"]},
                            {"athlete": {"displayName": "Josh Hart"}, "stats": ["12", "14", "5", "40"]}
                        ]
                    }]
                }
            ]}
        })
    }

    pub fn nba_leaders() -> Value {
        json!({
            "resultSet": {
                "name": "LeagueLeaders",
                "headers": ["PLAYER_ID", "RANK", "PLAYER", "TEAM", "GP", "MIN", "OREB", "REB", "AST", "PTS"],
                "rowSet": [
                    [1, 1, "Luka Doncic", "LAL", 5, 36.1, 1.0, 8.8, 9.1, 33.4],
                    [2, 2, "Nikola Jokic", "DEN", 5, 35.0, 3.0, 12.6, 10.2, 29.0],
                    [3, 3, "Tyrese Haliburton", "IND", 5, 34.2, 0.4, 3.9, 11.5, 20.2],
                    [4, 4, "Two-Way Call-up", "IND", 1, 2.0, 0.0, 1.0, 0.0, 0.0]
                ]
            }
        })
    }

    pub fn espn_standings() -> Value {
        json!({
            "children": [
                {"name": "Eastern Conference", "standings": {"entries": [
                    {"team": {"displayName": "New York Knicks"}, "stats": [
                        {"name": "wins", "value": 48}, {"name": "losses", "value": 34},
                        {"name": "winPercent", "value": 0.585}, {"name": "gamesBehind", "value": 16.0}
                    ]},
                    {"team": {"displayName": "Boston Celtics"}, "stats": [
                        {"name": "losses", "value": 18}, {"name": "wins", "value": 64},
                        {"name": "winPercent", "value": 0.78}, {"name": "gamesBehind", "value": 0.0}
                    ]}
                ]}},
                {"name": "Western Conference", "standings": {"entries": [
                    {"team": {"displayName": "Oklahoma City Thunder"}, "stats": [
                        {"name": "wins", "value": 57}, {"name": "losses", "value": 25},
                        {"name": "winPercent", "value": 0.695}, {"name": "gamesBehind", "value": 0.0}
                    ]}
                ]}}
            ]
        })
    }

    pub const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>NBA</title>
<item><title>Star guard out for season after knee surgery</title>
<link>https://www.espn.com/nba/story/_/id/2</link>
<description>Team confirms the procedure.</description>
<pubDate>Mon, 19 Oct 2026 16:00:00 +0000</pubDate></item>
</channel></rss>"#;
}
