//! ESPN site API adapter.
//!
//! Scoreboard events nest teams under `competitions[0].competitors` and send
//! scores as strings (or `{value}` objects on some endpoints). Box scores
//! pair a `keys`/`labels` array with per-athlete `stats` arrays whose order
//! changes between responses, so they go through `KeyPositions`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::adapters::text::{classify_headline, parse_timestamp, relative_age, truncate_details, NEWS_SECTION_URL};
use crate::adapters::{float_of, json_payload, stat_u32, str_at, text_of};
use crate::resolver::{KeyPositions, StatTarget, ASSISTS, MINUTES, POINTS, REBOUNDS};
use crate::types::{AdapterError, BettingLine, Game, GameStatus, NewsItem, Performer, StandingRow};
use crate::upstream::{Provider, RawPayload};

const PROVIDER: &str = "espn";

const WINS: StatTarget = StatTarget::new("wins", &["wins"]);
const LOSSES: StatTarget = StatTarget::new("losses", &["losses"]);
const WIN_PCT: StatTarget = StatTarget::new("win_pct", &["winpercent", "winpct"]);
const GAMES_BEHIND: StatTarget = StatTarget::new("games_behind", &["gamesbehind", "gb"]);

fn array<'a>(v: &'a Value, pointer: &str) -> &'a [Value] {
    v.pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn events(payload: &Value) -> Result<&[Value], AdapterError> {
    payload
        .get("events")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| AdapterError::shape(PROVIDER, "no events array"))
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

fn event_status(event: &Value) -> GameStatus {
    let state = str_at(event, "/status/type/state");
    if let Ok(status) = state.parse::<GameStatus>() {
        return status;
    }
    if event.pointer("/status/type/completed").and_then(Value::as_bool) == Some(true) {
        GameStatus::Final
    } else {
        GameStatus::Scheduled
    }
}

fn team_name(competitor: &Value) -> String {
    ["/team/displayName", "/team/name", "/team/abbreviation"]
        .iter()
        .map(|p| str_at(competitor, p))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn score(competitor: &Value) -> u32 {
    match competitor.get("score") {
        Some(obj @ Value::Object(_)) => obj.get("value").map(stat_u32).unwrap_or(0),
        Some(v) => stat_u32(v),
        None => 0,
    }
}

fn side<'a>(event: &'a Value, home_away: &str) -> Option<&'a Value> {
    array(event, "/competitions/0/competitors")
        .iter()
        .find(|c| str_at(c, "/homeAway").eq_ignore_ascii_case(home_away))
}

/// `/scoreboard` events as games.
pub fn scoreboard(raw: &RawPayload) -> Result<Vec<Game>, AdapterError> {
    let payload = json_payload(Provider::Espn, raw)?;
    let mut games = Vec::new();

    for event in events(payload)? {
        let id = str_at(event, "/id");
        let (Some(home), Some(away)) = (side(event, "home"), side(event, "away")) else {
            debug!(provider = PROVIDER, id = %id, "Skipping event without home/away competitors");
            continue;
        };
        if id.is_empty() {
            continue;
        }
        let mut detail = str_at(event, "/status/type/shortDetail");
        if detail.is_empty() {
            detail = str_at(event, "/status/type/detail");
        }
        games.push(Game {
            status: event_status(event),
            home: team_name(home),
            away: team_name(away),
            home_score: score(home),
            away_score: score(away),
            time: str_at(event, "/date"),
            detail,
            id,
        });
    }
    Ok(games)
}

/// Odds attached to scoreboard events. Events without odds are skipped.
pub fn betting(raw: &RawPayload) -> Result<Vec<BettingLine>, AdapterError> {
    let payload = json_payload(Provider::Espn, raw)?;
    let mut lines = Vec::new();

    for event in events(payload)? {
        let Some(odds) = array(event, "/competitions/0/odds").first() else {
            continue;
        };
        let (Some(home), Some(away)) = (side(event, "home"), side(event, "away")) else {
            continue;
        };
        let details = str_at(odds, "/details");
        let over_under = odds.get("overUnder").and_then(float_of);
        if details.is_empty() && over_under.is_none() {
            continue;
        }
        lines.push(BettingLine {
            game_id: str_at(event, "/id"),
            home: team_name(home),
            away: team_name(away),
            details,
            over_under,
            provider: str_at(odds, "/provider/name"),
        });
    }
    Ok(lines)
}

// ---------------------------------------------------------------------------
// Game summary
// ---------------------------------------------------------------------------

/// `/summary?event=` box score player lines.
pub fn summary(raw: &RawPayload) -> Result<Vec<Performer>, AdapterError> {
    let payload = json_payload(Provider::Espn, raw)?;
    let boxscore = payload
        .get("boxscore")
        .ok_or_else(|| AdapterError::shape(PROVIDER, "no boxscore"))?;
    let game_id = str_at(payload, "/header/id");

    let mut out = Vec::new();
    for team in array(boxscore, "/players") {
        let abbr = str_at(team, "/team/abbreviation");
        for group in array(team, "/statistics") {
            // Resolved once per group; `keys` is more stable than `labels`.
            let labels = match group.get("keys") {
                Some(keys) if keys.as_array().is_some_and(|k| !k.is_empty()) => keys,
                _ => group.get("labels").unwrap_or(&Value::Null),
            };
            let positions = KeyPositions::resolve_json(labels, &[POINTS, REBOUNDS, ASSISTS, MINUTES]);

            for athlete in array(group, "/athletes") {
                let name = str_at(athlete, "/athlete/displayName");
                if name.is_empty() {
                    continue;
                }
                let stats = array(athlete, "/stats");
                out.push(Performer {
                    name,
                    team: abbr.clone(),
                    points: positions.count("points", stats),
                    rebounds: positions.count("rebounds", stats),
                    assists: positions.count("assists", stats),
                    minutes: positions.text("minutes", stats),
                    game_id: (!game_id.is_empty()).then(|| game_id.clone()),
                });
            }
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn collect_standings(node: &Value, conference: &str, out: &mut Vec<StandingRow>) {
    let name = match str_at(node, "/name") {
        n if n.is_empty() => conference.to_string(),
        n => n,
    };

    for entry in array(node, "/standings/entries") {
        let team = str_at(entry, "/team/displayName");
        if team.is_empty() {
            continue;
        }
        let stats = array(entry, "/stats");
        let labels: Vec<String> = stats
            .iter()
            .map(|s| {
                let n = str_at(s, "/name");
                if n.is_empty() { str_at(s, "/type") } else { n }
            })
            .collect();
        let values: Vec<Value> = stats
            .iter()
            .map(|s| s.get("value").cloned().unwrap_or(Value::Null))
            .collect();
        let p = KeyPositions::resolve(&labels, &[WINS, LOSSES, WIN_PCT, GAMES_BEHIND]);

        out.push(StandingRow {
            rank: 0,
            team,
            conference: name.clone(),
            wins: p.count("wins", &values),
            losses: p.count("losses", &values),
            win_pct: p.float("win_pct", &values),
            games_behind: p.float("games_behind", &values),
        });
    }

    for child in array(node, "/children") {
        collect_standings(child, &name, out);
    }
}

/// `/standings`: conferences (optionally divisions) with entry stat lists.
pub fn standings(raw: &RawPayload) -> Result<Vec<StandingRow>, AdapterError> {
    let payload = json_payload(Provider::Espn, raw)?;
    if payload.get("children").is_none() && payload.get("standings").is_none() {
        return Err(AdapterError::shape(PROVIDER, "no children or standings"));
    }
    let mut rows = Vec::new();
    collect_standings(payload, "", &mut rows);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

/// `/news` articles.
pub fn news(raw: &RawPayload, now: DateTime<Utc>) -> Result<Vec<NewsItem>, AdapterError> {
    let payload = json_payload(Provider::Espn, raw)?;
    let articles = payload
        .get("articles")
        .and_then(Value::as_array)
        .ok_or_else(|| AdapterError::shape(PROVIDER, "no articles array"))?;

    Ok(articles
        .iter()
        .filter_map(|a| {
            let headline = str_at(a, "/headline");
            if headline.is_empty() {
                return None;
            }
            let link = match str_at(a, "/links/web/href") {
                l if l.is_empty() => NEWS_SECTION_URL.to_string(),
                l => l,
            };
            Some(NewsItem {
                kind: classify_headline(&headline),
                details: truncate_details(&a.get("description").map(text_of).unwrap_or_default()),
                time: relative_age(parse_timestamp(&str_at(a, "/published")), now),
                headline,
                link,
            })
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
