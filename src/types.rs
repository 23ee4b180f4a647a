//! Canonical, provider-agnostic entity types and the error taxonomy.
//!
//! Every entity here is an immutable value record built fresh per request.
//! Games and performers are correlated only through the game id string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Lifecycle of a single game. Ordering follows the lifecycle, so `max`
/// picks the furthest-along status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
}

impl GameStatus {
    /// Merge two observations of the same game without ever moving backward.
    pub fn advance(self, observed: GameStatus) -> GameStatus {
        self.max(observed)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Scheduled => write!(f, "Scheduled"),
            GameStatus::Live => write!(f, "Live"),
            GameStatus::Final => write!(f, "Final"),
        }
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" | "pre" | "1" => Ok(GameStatus::Scheduled),
            "live" | "in" | "in_progress" | "2" => Ok(GameStatus::Live),
            "final" | "post" | "3" => Ok(GameStatus::Final),
            other => Err(format!("Unknown game status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub status: GameStatus,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    /// Display date/time of tip-off as reported upstream.
    pub time: String,
    /// Free-form status line, e.g. "Q3 4:12" or "Final/OT".
    #[serde(default)]
    pub detail: String,
}

impl Game {
    /// Placeholder row returned when no source has any games.
    pub fn placeholder(message: &str) -> Self {
        Self {
            id: "none".to_string(),
            status: GameStatus::Scheduled,
            home: message.to_string(),
            away: String::new(),
            home_score: 0,
            away_score: 0,
            time: String::new(),
            detail: message.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == "none"
    }
}

// ---------------------------------------------------------------------------
// Performer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performer {
    pub name: String,
    pub team: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    #[serde(default)]
    pub minutes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
}

impl Performer {
    /// Sentinel line served when no source produced a box score.
    pub fn placeholder(message: &str) -> Self {
        Self {
            name: message.to_string(),
            team: String::new(),
            points: 0,
            rebounds: 0,
            assists: 0,
            minutes: String::new(),
            game_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    Trade,
    Injury,
    News,
}

impl fmt::Display for NewsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsKind::Trade => write!(f, "trade"),
            NewsKind::Injury => write!(f, "injury"),
            NewsKind::News => write!(f, "news"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(rename = "type")]
    pub kind: NewsKind,
    pub headline: String,
    pub details: String,
    /// Relative age label, e.g. "3h ago".
    pub time: String,
    pub link: String,
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    /// 1-based position after sorting; never copied from upstream.
    pub rank: u32,
    pub team: String,
    pub conference: String,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub games_behind: f64,
}

impl StandingRow {
    pub fn placeholder(message: &str) -> Self {
        Self {
            rank: 0,
            team: message.to_string(),
            conference: String::new(),
            wins: 0,
            losses: 0,
            win_pct: 0.0,
            games_behind: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    #[serde(default)]
    pub id: String,
    pub platform: String,
    pub author: String,
    pub content: String,
    /// Engagement counts, K-formatted ("1.2K").
    pub likes: String,
    pub comments: String,
    pub link: String,
}

impl SocialPost {
    pub fn placeholder(platform: &str, message: &str, link: &str) -> Self {
        Self {
            id: "none".to_string(),
            platform: platform.to_string(),
            author: String::new(),
            content: message.to_string(),
            likes: "0".to_string(),
            comments: "0".to_string(),
            link: link.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingLine {
    pub game_id: String,
    pub home: String,
    pub away: String,
    /// Spread line as published, e.g. "BOS -5.5".
    pub details: String,
    pub over_under: Option<f64>,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FantasyPick {
    #[serde(flatten)]
    pub performer: Performer,
    pub fantasy_points: f64,
}

impl FantasyPick {
    pub fn placeholder(message: &str) -> Self {
        Self {
            performer: Performer::placeholder(message),
            fantasy_points: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeagueLeaders {
    pub points: Vec<Performer>,
    pub rebounds: Vec<Performer>,
    pub assists: Vec<Performer>,
}

impl LeagueLeaders {
    /// One sentinel row on every board.
    pub fn placeholder(message: &str) -> Self {
        let row = vec![Performer::placeholder(message)];
        Self {
            points: row.clone(),
            rebounds: row.clone(),
            assists: row,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failure of a single upstream call. Recovered by the orchestrator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream timeout after {after:?}: {endpoint}")]
    Timeout { endpoint: String, after: Duration },

    #[error("Upstream transport error ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },

    #[error("Upstream bad response ({endpoint}) status {status}: {body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
}

/// Payload shape not recognized by an adapter. Treated as an empty result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    #[error("Unrecognized {provider} payload: {detail}")]
    UnrecognizedShape {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} adapter expected a {expected} payload")]
    WrongFormat {
        provider: &'static str,
        expected: &'static str,
    },
}

impl AdapterError {
    pub fn shape(provider: &'static str, detail: impl Into<String>) -> Self {
        AdapterError::UnrecognizedShape {
            provider,
            detail: detail.into(),
        }
    }
}

/// Errors surfaced by feed operations to the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
