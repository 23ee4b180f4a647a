//! stats.nba.com adapter.
//!
//! Every endpoint answers with `resultSets`: named tables of `headers` plus
//! `rowSet` rows. Tables are located by name (index only as a fallback),
//! and columns are located through `KeyPositions` per response. Some
//! endpoints (league leaders) use a singular `resultSet` instead.

use serde_json::Value;
use tracing::debug;

use crate::adapters::json_payload;
use crate::resolver::{KeyPositions, StatTarget, ASSISTS, MINUTES, POINTS, REBOUNDS};
use crate::types::{AdapterError, Game, GameStatus, Performer, StandingRow};
use crate::upstream::{Provider, RawPayload};

const PROVIDER: &str = "nba-stats";

// ---------------------------------------------------------------------------
// Column targets
// ---------------------------------------------------------------------------

const GAME_ID: StatTarget = StatTarget::new("game_id", &["game_id"]);
const STATUS_ID: StatTarget = StatTarget::new("status_id", &["game_status_id"]);
const STATUS_TEXT: StatTarget = StatTarget::new("status_text", &["game_status_text"]);
const HOME_TEAM_ID: StatTarget = StatTarget::new("home_team_id", &["home_team_id"]);
const AWAY_TEAM_ID: StatTarget = StatTarget::new("away_team_id", &["visitor_team_id", "away_team_id"]);
const GAME_DATE: StatTarget = StatTarget::new("game_date", &["game_date_est", "game_date"]);

const TEAM_ID: StatTarget = StatTarget::new("team_id", &["team_id"]);
const TEAM_CITY: StatTarget = StatTarget::new("team_city", &["team_city_name", "team_city"]);
const TEAM_NAME: StatTarget = StatTarget::new("team_name", &["team_name", "team_nickname"]);
const TEAM_ABBR: StatTarget = StatTarget::new("team", &["team_abbreviation", "team"]);

const PLAYER_NAME: StatTarget = StatTarget::new("player", &["player_name", "player"]);

const CITY: StatTarget = StatTarget::new("city", &["teamcity"]);
const NICKNAME: StatTarget = StatTarget::new("nickname", &["teamname"]);
const CONFERENCE: StatTarget = StatTarget::new("conference", &["conference"]);
const WINS: StatTarget = StatTarget::new("wins", &["wins"]);
const LOSSES: StatTarget = StatTarget::new("losses", &["losses"]);
const WIN_PCT: StatTarget = StatTarget::new("win_pct", &["winpct", "win_pct", "pct"]);
const GAMES_BACK: StatTarget =
    StatTarget::new("games_back", &["conferencegamesback", "gamesback", "gb"]);

const PERFORMER_TARGETS: &[StatTarget] =
    &[PLAYER_NAME, TEAM_ABBR, POINTS, REBOUNDS, ASSISTS, MINUTES, GAME_ID];

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

struct Table<'a> {
    headers: &'a Value,
    rows: &'a [Value],
}

impl<'a> Table<'a> {
    fn positions(&self, targets: &[StatTarget]) -> KeyPositions {
        KeyPositions::resolve_json(self.headers, targets)
    }

    /// Rows that are arrays; anything else is a malformed record and skipped.
    fn records(&self) -> impl Iterator<Item = &'a [Value]> {
        self.rows.iter().filter_map(|r| r.as_array().map(|a| a.as_slice()))
    }
}

fn table<'a>(payload: &'a Value, name: &str, index: usize) -> Result<Table<'a>, AdapterError> {
    let set = match payload.get("resultSets") {
        Some(Value::Array(sets)) => sets
            .iter()
            .find(|s| {
                s.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .or_else(|| sets.get(index)),
        Some(single @ Value::Object(_)) => Some(single),
        _ => payload.get("resultSet"),
    }
    .ok_or_else(|| AdapterError::shape(PROVIDER, format!("no result set '{name}'")))?;

    let headers = set
        .get("headers")
        .filter(|h| h.is_array())
        .ok_or_else(|| AdapterError::shape(PROVIDER, format!("'{name}' has no headers")))?;
    let rows = set
        .get("rowSet")
        .and_then(Value::as_array)
        .ok_or_else(|| AdapterError::shape(PROVIDER, format!("'{name}' has no rowSet")))?;

    Ok(Table { headers, rows })
}

fn status_from(id: u32, text: &str) -> GameStatus {
    match id {
        2 => GameStatus::Live,
        3 => GameStatus::Final,
        1 => GameStatus::Scheduled,
        _ if text.to_lowercase().contains("final") => GameStatus::Final,
        _ => GameStatus::Scheduled,
    }
}

// ---------------------------------------------------------------------------
// Adapters
// ---------------------------------------------------------------------------

/// `scoreboardv2`: `GameHeader` joined with `LineScore` on game + team id.
pub fn scoreboard(raw: &RawPayload) -> Result<Vec<Game>, AdapterError> {
    let payload = json_payload(Provider::NbaStats, raw)?;
    let header = table(payload, "GameHeader", 0)?;
    let hp = header.positions(&[GAME_ID, STATUS_ID, STATUS_TEXT, HOME_TEAM_ID, AWAY_TEAM_ID, GAME_DATE]);

    // A missing line score only costs us names and scores.
    let line = table(payload, "LineScore", 1).ok();
    let lp = line
        .as_ref()
        .map(|t| t.positions(&[GAME_ID, TEAM_ID, TEAM_CITY, TEAM_NAME, TEAM_ABBR, POINTS]));

    let team_line = |game_id: &str, team_id: &str| -> (String, u32) {
        let (Some(line), Some(lp)) = (line.as_ref(), lp.as_ref()) else {
            return (String::new(), 0);
        };
        line.records()
            .find(|r| lp.text("game_id", r) == game_id && lp.text("team_id", r) == team_id)
            .map(|r| {
                let full = format!("{} {}", lp.text("team_city", r), lp.text("team_name", r));
                let name = match full.trim() {
                    "" => lp.text("team", r),
                    trimmed => trimmed.to_string(),
                };
                (name, lp.count("points", r))
            })
            .unwrap_or_default()
    };

    let mut games = Vec::new();
    for row in header.records() {
        let id = hp.text("game_id", row);
        if id.is_empty() {
            debug!(provider = PROVIDER, "Skipping game row without id");
            continue;
        }
        let status_text = hp.text("status_text", row);
        let (home, home_score) = team_line(&id, &hp.text("home_team_id", row));
        let (away, away_score) = team_line(&id, &hp.text("away_team_id", row));

        games.push(Game {
            status: status_from(hp.count("status_id", row), &status_text),
            home,
            away,
            home_score,
            away_score,
            time: hp.text("game_date", row),
            detail: status_text,
            id,
        });
    }
    Ok(games)
}

fn performers(table: &Table<'_>) -> Vec<Performer> {
    let p = table.positions(PERFORMER_TARGETS);
    table
        .records()
        .filter_map(|row| {
            let name = p.text("player", row);
            if name.is_empty() {
                return None;
            }
            let game_id = p.text("game_id", row);
            Some(Performer {
                name,
                team: p.text("team", row),
                points: p.count("points", row),
                rebounds: p.count("rebounds", row),
                assists: p.count("assists", row),
                minutes: p.text("minutes", row),
                game_id: (!game_id.is_empty()).then_some(game_id),
            })
        })
        .collect()
}

/// `boxscoretraditionalv2` player lines.
pub fn boxscore(raw: &RawPayload) -> Result<Vec<Performer>, AdapterError> {
    let payload = json_payload(Provider::NbaStats, raw)?;
    Ok(performers(&table(payload, "PlayerStats", 0)?))
}

/// `leagueleaders` per-game lines.
pub fn league_leaders(raw: &RawPayload) -> Result<Vec<Performer>, AdapterError> {
    let payload = json_payload(Provider::NbaStats, raw)?;
    Ok(performers(&table(payload, "LeagueLeaders", 0)?))
}

/// `leaguestandingsv3`. Rank is left at 0; the ranker assigns it.
pub fn standings(raw: &RawPayload) -> Result<Vec<StandingRow>, AdapterError> {
    let payload = json_payload(Provider::NbaStats, raw)?;
    let t = table(payload, "Standings", 0)?;
    let p = t.positions(&[CITY, NICKNAME, CONFERENCE, WINS, LOSSES, WIN_PCT, GAMES_BACK]);

    Ok(t.records()
        .filter_map(|row| {
            let team = format!("{} {}", p.text("city", row), p.text("nickname", row))
                .trim()
                .to_string();
            if team.is_empty() {
                return None;
            }
            Some(StandingRow {
                rank: 0,
                team,
                conference: p.text("conference", row),
                wins: p.count("wins", row),
                losses: p.count("losses", row),
                win_pct: p.float("win_pct", row),
                games_behind: p.float("games_back", row),
            })
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
