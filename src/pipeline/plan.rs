//! Attempt plans: which (context, endpoint) pairs to try, in what order.
//!
//! Date windows are configurable per use case: live discovery walks
//! backward from today, schedule discovery walks forward from tomorrow.

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::UpstreamConfig;
use crate::upstream::{Provider, UpstreamRequest};

// ---------------------------------------------------------------------------
// Attempts
// ---------------------------------------------------------------------------

/// One (context, provider-endpoint) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// What this attempt covers, e.g. a date or a game id.
    pub context: String,
    pub request: UpstreamRequest,
}

impl Attempt {
    pub fn new(context: impl Into<String>, request: UpstreamRequest) -> Self {
        Self {
            context: context.into(),
            request,
        }
    }

    pub fn provider(&self) -> Provider {
        self.request.provider
    }

    pub fn label(&self) -> String {
        format!("{}@{}", self.request.provider, self.context)
    }
}

/// Ordered attempt list. Order is priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptPlan {
    attempts: Vec<Attempt>,
}

impl AttemptPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, context: impl Into<String>, request: UpstreamRequest) -> Self {
        self.attempts.push(Attempt::new(context, request));
        self
    }

    /// For each date in order, every request `per_date` yields, in order.
    pub fn over_dates<F>(dates: &[NaiveDate], mut per_date: F) -> Self
    where
        F: FnMut(NaiveDate) -> Vec<UpstreamRequest>,
    {
        let attempts = dates
            .iter()
            .flat_map(|date| {
                let context = date.format("%Y-%m-%d").to_string();
                per_date(*date)
                    .into_iter()
                    .map(move |req| Attempt::new(context.clone(), req))
            })
            .collect();
        Self { attempts }
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Date windows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// `days` consecutive dates starting `start_offset` days from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start_offset: i64,
    pub days: u32,
    pub direction: Direction,
}

impl DateWindow {
    /// Today, then each preceding day, `lookback` days deep.
    pub fn live(lookback: u32) -> Self {
        Self {
            start_offset: 0,
            days: lookback.saturating_add(1),
            direction: Direction::Backward,
        }
    }

    /// Tomorrow through today + `lookahead`.
    pub fn schedule(lookahead: u32) -> Self {
        Self {
            start_offset: 1,
            days: lookahead,
            direction: Direction::Forward,
        }
    }

    /// Today through today + `lookahead`.
    pub fn upcoming(lookahead: u32) -> Self {
        Self {
            start_offset: 0,
            days: lookahead.saturating_add(1),
            direction: Direction::Forward,
        }
    }

    /// A single fixed day.
    pub fn single() -> Self {
        Self {
            start_offset: 0,
            days: 1,
            direction: Direction::Forward,
        }
    }

    pub fn dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let step = match self.direction {
            Direction::Backward => -1,
            Direction::Forward => 1,
        };
        (0..self.days as i64)
            .filter_map(|i| today.checked_add_signed(Duration::days(self.start_offset + step * i)))
            .collect()
    }
}

/// Season label the stats API expects, e.g. "2026-27". Seasons roll over
/// in October.
pub fn season_label(date: NaiveDate) -> String {
    let start = if date.month() >= 10 { date.year() } else { date.year() - 1 };
    format!("{}-{:02}", start, (start + 1).rem_euclid(100))
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Request builders for every upstream endpoint we use.
pub struct Endpoints<'a> {
    cfg: &'a UpstreamConfig,
}

impl<'a> Endpoints<'a> {
    pub fn new(cfg: &'a UpstreamConfig) -> Self {
        Self { cfg }
    }

    fn request(&self, provider: Provider, url: String) -> UpstreamRequest {
        UpstreamRequest::new(provider, url).with_timeout(self.cfg.timeout())
    }

    fn espn(&self, path: &str) -> UpstreamRequest {
        self.request(Provider::Espn, format!("{}/{}", self.cfg.espn_site_base, path))
    }

    fn nba(&self, path: &str) -> UpstreamRequest {
        self.request(Provider::NbaStats, format!("{}/{}", self.cfg.nba_stats_base, path))
    }

    pub fn espn_scoreboard(&self, date: NaiveDate) -> UpstreamRequest {
        self.espn("scoreboard")
            .param("dates", date.format("%Y%m%d").to_string())
    }

    pub fn espn_playoff_scoreboard(&self, date: NaiveDate) -> UpstreamRequest {
        self.espn_scoreboard(date).param("seasontype", "3")
    }

    pub fn espn_summary(&self, game_id: &str) -> UpstreamRequest {
        self.espn("summary").param("event", game_id)
    }

    pub fn espn_news(&self) -> UpstreamRequest {
        self.espn("news").param("limit", "50")
    }

    pub fn espn_standings(&self) -> UpstreamRequest {
        self.request(Provider::Espn, self.cfg.espn_standings_url.clone())
    }

    pub fn espn_rss(&self) -> UpstreamRequest {
        self.request(Provider::EspnRss, self.cfg.espn_rss_url.clone())
    }

    pub fn reddit(&self, sort: &str) -> UpstreamRequest {
        self.request(Provider::Reddit, format!("{}/{}.json", self.cfg.reddit_base, sort))
            .param("limit", "50")
            .param("raw_json", "1")
    }

    pub fn nba_scoreboard(&self, date: NaiveDate) -> UpstreamRequest {
        self.nba("scoreboardv2")
            .param("GameDate", date.format("%Y-%m-%d").to_string())
            .param("LeagueID", "00")
            .param("DayOffset", "0")
    }

    pub fn nba_boxscore(&self, game_id: &str) -> UpstreamRequest {
        self.nba("boxscoretraditionalv2")
            .param("GameID", game_id)
            .param("StartPeriod", "0")
            .param("EndPeriod", "10")
            .param("StartRange", "0")
            .param("EndRange", "28800")
            .param("RangeType", "0")
    }

    pub fn nba_standings(&self, season: &str) -> UpstreamRequest {
        self.nba("leaguestandingsv3")
            .param("LeagueID", "00")
            .param("Season", season)
            .param("SeasonType", "Regular Season")
    }

    pub fn nba_leaders(&self, season: &str) -> UpstreamRequest {
        self.nba("leagueleaders")
            .param("LeagueID", "00")
            .param("PerMode", "PerGame")
            .param("Scope", "S")
            .param("Season", season)
            .param("SeasonType", "Regular Season")
            .param("StatCategory", "PTS")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
