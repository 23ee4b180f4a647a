//! Aggregation and ranking over merged entity lists.
//!
//! Order of operations: dedupe, filter, stable sort, truncate. Performer
//! lists filter scoreless lines ahead of the dedupe.

use std::collections::HashMap;
use std::hash::Hash;

use crate::types::{BettingLine, FantasyPick, Game, GameStatus, LeagueLeaders, NewsItem, Performer, SocialPost, StandingRow};

/// Fantasy scoring weights.
pub const REBOUND_WEIGHT: f64 = 1.25;
pub const ASSIST_WEIGHT: f64 = 1.5;

/// Keep the first occurrence of each key, preserving order.
pub fn dedupe_by<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

/// Collapse repeated game ids. The game keeps its first position; the
/// merged record is whichever observation is furthest along, so status
/// never moves backward.
pub fn merge_games(games: Vec<Game>) -> Vec<Game> {
    let mut slot: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Game> = Vec::with_capacity(games.len());
    for game in games {
        match slot.get(&game.id) {
            Some(&i) => {
                if let Some(current) = merged.get_mut(i) {
                    if current.status.advance(game.status) != current.status {
                        *current = game;
                    }
                }
            }
            None => {
                slot.insert(game.id.clone(), merged.len());
                merged.push(game);
            }
        }
    }
    merged
}

/// Live games first, everything else keeps upstream order.
pub fn rank_games(games: Vec<Game>, limit: usize) -> Vec<Game> {
    let mut games = merge_games(games);
    games.sort_by_key(|g| if g.status == GameStatus::Live { 0 } else { 1 });
    games.truncate(limit);
    games
}

/// Completed games only, upstream order.
pub fn finished_games(games: Vec<Game>, limit: usize) -> Vec<Game> {
    let mut games: Vec<Game> = merge_games(games)
        .into_iter()
        .filter(|g| g.status == GameStatus::Final)
        .collect();
    games.truncate(limit);
    games
}

// ---------------------------------------------------------------------------
// Performers
// ---------------------------------------------------------------------------

fn performer_key(p: &Performer) -> (String, String) {
    (p.name.to_lowercase(), p.team.to_lowercase())
}

/// Drop scoreless lines before dedupe so a DNP row never shadows the same
/// player's real line.
fn scorers(performers: Vec<Performer>) -> Vec<Performer> {
    let scored: Vec<Performer> = performers.into_iter().filter(|p| p.points > 0).collect();
    dedupe_by(scored, performer_key)
}

/// Scorers only, by points descending. Ties keep upstream order.
pub fn top_performers(performers: Vec<Performer>, limit: usize) -> Vec<Performer> {
    let mut ranked = scorers(performers);
    ranked.sort_by(|a, b| b.points.cmp(&a.points));
    ranked.truncate(limit);
    ranked
}

pub fn fantasy_points(p: &Performer) -> f64 {
    p.points as f64 + REBOUND_WEIGHT * p.rebounds as f64 + ASSIST_WEIGHT * p.assists as f64
}

pub fn rank_fantasy(performers: Vec<Performer>, limit: usize) -> Vec<FantasyPick> {
    let mut picks: Vec<FantasyPick> = scorers(performers)
        .into_iter()
        .map(|performer| FantasyPick {
            fantasy_points: fantasy_points(&performer),
            performer,
        })
        .collect();
    picks.sort_by(|a, b| b.fantasy_points.total_cmp(&a.fantasy_points));
    picks.truncate(limit);
    picks
}

fn board<F>(performers: &[Performer], limit: usize, stat: F) -> Vec<Performer>
where
    F: Fn(&Performer) -> u32,
{
    let mut ranked = performers.to_vec();
    ranked.sort_by(|a, b| stat(b).cmp(&stat(a)));
    ranked.truncate(limit);
    ranked
}

/// Points, rebounds and assists boards from one performer pool.
pub fn league_leaders(performers: Vec<Performer>, limit: usize) -> LeagueLeaders {
    let pool = scorers(performers);
    LeagueLeaders {
        points: board(&pool, limit, |p| p.points),
        rebounds: board(&pool, limit, |p| p.rebounds),
        assists: board(&pool, limit, |p| p.assists),
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Sort by wins descending and assign 1-based ranks.
pub fn rank_standings(rows: Vec<StandingRow>, limit: usize) -> Vec<StandingRow> {
    let mut rows = dedupe_by(rows, |r| r.team.to_lowercase());
    rows.sort_by(|a, b| b.wins.cmp(&a.wins));
    rows.truncate(limit);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
    rows
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

pub fn rank_news(items: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    let mut items = dedupe_by(items, |n| n.headline.trim().to_lowercase());
    items.truncate(limit);
    items
}

pub fn rank_posts(posts: Vec<SocialPost>, limit: usize) -> Vec<SocialPost> {
    let mut posts = dedupe_by(posts, |p| {
        if p.id.is_empty() {
            format!("{}\u{1f}{}", p.author, p.content)
        } else {
            p.id.clone()
        }
    });
    posts.truncate(limit);
    posts
}

pub fn rank_betting(lines: Vec<BettingLine>, limit: usize) -> Vec<BettingLine> {
    let mut lines = dedupe_by(lines, |l| l.game_id.clone());
    lines.truncate(limit);
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
