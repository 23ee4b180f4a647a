//! Text shaping shared by the news and social adapters.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::types::NewsKind;

/// Fallback link for news items without one.
pub const NEWS_SECTION_URL: &str = "https://www.espn.com/nba/";

/// Longest `details` string, ellipsis included.
pub const MAX_DETAILS_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

// ---------------------------------------------------------------------------
// Headline classification
// ---------------------------------------------------------------------------

/// Keyword lists, checked in order. First list with a hit wins.
const CLASSIFIERS: &[(NewsKind, &[&str])] = &[
    (NewsKind::Trade, &["trade", "acquire", "deal", "sign", "waive"]),
    (
        NewsKind::Injury,
        &["injury", "injured", "out for", "surgery", "sidelined", "sprain", "questionable"],
    ),
];

/// Case-insensitive substring scan: trade, then injury, else news.
pub fn classify_headline(headline: &str) -> NewsKind {
    let lower = headline.to_lowercase();
    CLASSIFIERS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(kind, _)| *kind)
        .unwrap_or(NewsKind::News)
}

// ---------------------------------------------------------------------------
// Truncation / formatting
// ---------------------------------------------------------------------------

/// Cap at `MAX_DETAILS_CHARS` characters, ending in "..." when cut.
pub fn truncate_details(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_DETAILS_CHARS {
        return text.to_string();
    }
    let keep = MAX_DETAILS_CHARS - ELLIPSIS.len();
    let cut: String = text.chars().take(keep).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Engagement count with a K suffix from one thousand up ("1.2K").
pub fn format_count(n: u64) -> String {
    if n < 1000 {
        n.to_string()
    } else {
        format!("{:.1}K", n as f64 / 1000.0)
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Parse the timestamp styles our providers emit (RFC 3339, RFC 2822,
/// and ESPN's minute-precision `2026-10-19T23:30Z`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Human age label relative to `now`.
pub fn relative_age(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published) = published else {
        return "recently".to_string();
    };
    let secs = (now - published).num_seconds();
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
