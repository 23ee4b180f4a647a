//! Read-only feed operations, one per entity family.
//!
//! Each operation builds an attempt plan, drives it through the
//! orchestrator with the matching adapter, then ranks the winning entity
//! list. None of them fails on upstream trouble: exhaustion yields the
//! operation's default set. Only caller input can be rejected.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::info;

use crate::adapters::text::NEWS_SECTION_URL;
use crate::adapters::{espn, nba_stats, reddit, rss};
use crate::config::AppConfig;
use crate::pipeline::plan::season_label;
use crate::pipeline::ranker;
use crate::pipeline::{Attempt, AttemptPlan, DateWindow, Endpoints, FallbackOutcome, Orchestrator};
use crate::types::{
    AdapterError, BettingLine, FantasyPick, FeedError, Game, GameStatus, LeagueLeaders, NewsItem, NewsKind,
    Performer, SocialPost, StandingRow,
};
use crate::upstream::{Provider, RawPayload, Upstream};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

const REDDIT_URL: &str = "https://www.reddit.com/r/nba";

/// Games plus the calendar day they were found on.
#[derive(Debug, Clone, PartialEq)]
pub struct GamesFeed {
    pub date: String,
    pub games: Vec<Game>,
}

fn unsupported(attempt: &Attempt) -> AdapterError {
    AdapterError::WrongFormat {
        provider: attempt.provider().name(),
        expected: "supported",
    }
}

fn scoreboard(attempt: &Attempt, raw: &RawPayload) -> Result<Vec<Game>, AdapterError> {
    match attempt.provider() {
        Provider::Espn => espn::scoreboard(raw),
        Provider::NbaStats => nba_stats::scoreboard(raw),
        _ => Err(unsupported(attempt)),
    }
}

fn final_scoreboard(attempt: &Attempt, raw: &RawPayload) -> Result<Vec<Game>, AdapterError> {
    Ok(scoreboard(attempt, raw)?
        .into_iter()
        .filter(|g| g.status == GameStatus::Final)
        .collect())
}

fn box_score(attempt: &Attempt, raw: &RawPayload) -> Result<Vec<Performer>, AdapterError> {
    let performers = match attempt.provider() {
        Provider::Espn => espn::summary(raw)?,
        Provider::NbaStats => nba_stats::boxscore(raw)?,
        _ => return Err(unsupported(attempt)),
    };
    Ok(performers.into_iter().filter(|p| p.points > 0).collect())
}

fn leaders(attempt: &Attempt, raw: &RawPayload) -> Result<Vec<Performer>, AdapterError> {
    let performers = match attempt.provider() {
        Provider::NbaStats => nba_stats::league_leaders(raw)?,
        _ => return Err(unsupported(attempt)),
    };
    Ok(performers.into_iter().filter(|p| p.points > 0).collect())
}

fn standings(attempt: &Attempt, raw: &RawPayload) -> Result<Vec<StandingRow>, AdapterError> {
    match attempt.provider() {
        Provider::Espn => espn::standings(raw),
        Provider::NbaStats => nba_stats::standings(raw),
        _ => Err(unsupported(attempt)),
    }
}

fn no_games(message: &str) -> impl Fn() -> Vec<Game> + '_ {
    move || vec![Game::placeholder(message)]
}

pub struct FeedService {
    upstream: Arc<dyn Upstream>,
    config: AppConfig,
    clock: Clock,
}

impl FeedService {
    pub fn new(upstream: Arc<dyn Upstream>, config: AppConfig) -> Self {
        Self {
            upstream,
            config,
            clock: Arc::new(Utc::now),
        }
    }

    /// Pin "now", mainly for tests.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Today on the league's calendar.
    pub fn today(&self) -> NaiveDate {
        let now = self.now();
        let offset = self
            .config
            .windows
            .league_utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt);
        match offset {
            Some(offset) => now.with_timezone(&offset).date_naive(),
            None => now.date_naive(),
        }
    }

    fn endpoints(&self) -> Endpoints<'_> {
        Endpoints::new(&self.config.upstream)
    }

    async fn drive<T, A, D>(&self, plan: &AttemptPlan, adapt: A, default: D) -> FallbackOutcome<T>
    where
        A: Fn(&Attempt, &RawPayload) -> Result<Vec<T>, AdapterError>,
        D: Fn() -> Vec<T>,
    {
        let orchestrator = Orchestrator::new(self.upstream.as_ref());
        if self.config.upstream.speculative {
            orchestrator.run_speculative(plan.attempts(), adapt, default).await
        } else {
            orchestrator.run(plan.attempts(), adapt, default).await
        }
    }

    /// Run a dated plan and report the day the winning attempt covered.
    async fn games_over<A>(&self, plan: AttemptPlan, adapt: A, empty: &str, limit: usize) -> GamesFeed
    where
        A: Fn(&Attempt, &RawPayload) -> Result<Vec<Game>, AdapterError>,
    {
        let outcome = self.drive(&plan, adapt, no_games(empty)).await;
        let date = outcome
            .source
            .as_ref()
            .map(|a| a.context.clone())
            .unwrap_or_else(|| self.today().format("%Y-%m-%d").to_string());
        GamesFeed {
            date,
            games: ranker::rank_games(outcome.entities, limit),
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Most recent day with games, live ones first.
    pub async fn games(&self) -> GamesFeed {
        let ep = self.endpoints();
        let dates = DateWindow::live(self.config.windows.live_lookback_days).dates(self.today());
        let plan = AttemptPlan::over_dates(&dates, |d| vec![ep.espn_scoreboard(d), ep.nba_scoreboard(d)]);
        self.games_over(plan, scoreboard, "No games", self.config.limits.games).await
    }

    pub async fn game_stats(&self, game_id: &str) -> Result<Vec<Performer>, FeedError> {
        let game_id = game_id.trim();
        if game_id.is_empty() || !game_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FeedError::InvalidInput(format!("Invalid game id: {game_id:?}")));
        }
        let ep = self.endpoints();
        let plan = AttemptPlan::new()
            .then(game_id, ep.espn_summary(game_id))
            .then(game_id, ep.nba_boxscore(game_id));
        let outcome = self
            .drive(&plan, box_score, || vec![Performer::placeholder("No box score available")])
            .await;
        if outcome.exhausted() {
            return Ok(outcome.entities);
        }
        Ok(ranker::top_performers(outcome.entities, self.config.limits.top_performers))
    }

    pub async fn news(&self) -> Vec<NewsItem> {
        let ep = self.endpoints();
        let now = self.now();
        let plan = AttemptPlan::new()
            .then("news", ep.espn_news())
            .then("news", ep.espn_rss());
        let adapt = |attempt: &Attempt, raw: &RawPayload| match attempt.provider() {
            Provider::Espn => espn::news(raw, now),
            Provider::EspnRss => rss::news(raw, now),
            _ => Err(unsupported(attempt)),
        };
        let default = || {
            vec![NewsItem {
                kind: NewsKind::News,
                headline: "No NBA news available".to_string(),
                details: "Check back later for the latest headlines.".to_string(),
                time: "just now".to_string(),
                link: NEWS_SECTION_URL.to_string(),
            }]
        };
        let outcome = self.drive(&plan, adapt, default).await;
        ranker::rank_news(outcome.entities, self.config.limits.news)
    }

    pub async fn social(&self) -> Vec<SocialPost> {
        let ep = self.endpoints();
        let plan = AttemptPlan::new()
            .then("hot", ep.reddit("hot"))
            .then("new", ep.reddit("new"));
        let adapt = |attempt: &Attempt, raw: &RawPayload| match attempt.provider() {
            Provider::Reddit => reddit::posts(raw),
            _ => Err(unsupported(attempt)),
        };
        let default = || vec![SocialPost::placeholder("reddit", "No posts available", REDDIT_URL)];
        let outcome = self.drive(&plan, adapt, default).await;
        ranker::rank_posts(outcome.entities, self.config.limits.social)
    }

    pub async fn standings(&self) -> Vec<StandingRow> {
        let ep = self.endpoints();
        let season = season_label(self.today());
        let plan = AttemptPlan::new()
            .then("standings", ep.espn_standings())
            .then(season.as_str(), ep.nba_standings(&season));
        let outcome = self
            .drive(&plan, standings, || vec![StandingRow::placeholder("No standings available")])
            .await;
        if outcome.exhausted() {
            return outcome.entities;
        }
        ranker::rank_standings(outcome.entities, self.config.limits.standings)
    }

    fn leaders_plan(&self) -> AttemptPlan {
        let season = season_label(self.today());
        AttemptPlan::new().then(season.as_str(), self.endpoints().nba_leaders(&season))
    }

    /// Leader pool, or `None` once every source is exhausted.
    async fn leader_pool(&self) -> Option<Vec<Performer>> {
        let outcome = self.drive(&self.leaders_plan(), leaders, Vec::new).await;
        (!outcome.exhausted()).then_some(outcome.entities)
    }

    pub async fn players(&self) -> Vec<Performer> {
        match self.leader_pool().await {
            Some(pool) => ranker::top_performers(pool, self.config.limits.players),
            None => vec![Performer::placeholder("No player stats available")],
        }
    }

    /// Next days with games on the calendar.
    pub async fn schedule(&self) -> GamesFeed {
        let ep = self.endpoints();
        let dates = DateWindow::schedule(self.config.windows.schedule_lookahead_days).dates(self.today());
        let plan = AttemptPlan::over_dates(&dates, |d| vec![ep.espn_scoreboard(d)]);
        self.games_over(plan, scoreboard, "No upcoming games", self.config.limits.schedule)
            .await
    }

    pub async fn playoffs(&self) -> GamesFeed {
        let ep = self.endpoints();
        let dates = DateWindow::live(self.config.windows.live_lookback_days).dates(self.today());
        let plan = AttemptPlan::over_dates(&dates, |d| vec![ep.espn_playoff_scoreboard(d)]);
        self.games_over(plan, scoreboard, "No playoff games", self.config.limits.games)
            .await
    }

    pub async fn league_stats(&self) -> LeagueLeaders {
        match self.leader_pool().await {
            Some(pool) => ranker::league_leaders(pool, self.config.limits.leaders),
            None => LeagueLeaders::placeholder("No league leaders available"),
        }
    }

    /// Most recent day with completed games.
    pub async fn highlights(&self) -> GamesFeed {
        let ep = self.endpoints();
        let dates = DateWindow::live(self.config.windows.live_lookback_days).dates(self.today());
        let plan = AttemptPlan::over_dates(&dates, |d| vec![ep.espn_scoreboard(d), ep.nba_scoreboard(d)]);
        let outcome = self.drive(&plan, final_scoreboard, no_games("No recent games")).await;
        let date = outcome
            .source
            .as_ref()
            .map(|a| a.context.clone())
            .unwrap_or_else(|| self.today().format("%Y-%m-%d").to_string());
        let games = if outcome.exhausted() {
            outcome.entities
        } else {
            ranker::finished_games(outcome.entities, self.config.limits.highlights)
        };
        GamesFeed { date, games }
    }

    pub async fn fantasy(&self) -> Vec<FantasyPick> {
        match self.leader_pool().await {
            Some(pool) => ranker::rank_fantasy(pool, self.config.limits.fantasy),
            None => vec![FantasyPick::placeholder("No fantasy data available")],
        }
    }

    /// Games on one past or future day, `YYYY-MM-DD`.
    pub async fn archive(&self, date: &str) -> Result<GamesFeed, FeedError> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| FeedError::InvalidInput(format!("Invalid date {date:?}, expected YYYY-MM-DD")))?;
        info!(date = %day, "Archive lookup");
        let ep = self.endpoints();
        let plan = AttemptPlan::over_dates(&[day], |d| vec![ep.espn_scoreboard(d), ep.nba_scoreboard(d)]);
        let mut feed = self
            .games_over(plan, scoreboard, "No games on this date", self.config.limits.games)
            .await;
        feed.date = day.format("%Y-%m-%d").to_string();
        Ok(feed)
    }

    pub async fn betting(&self) -> Vec<BettingLine> {
        let ep = self.endpoints();
        let dates = DateWindow::upcoming(self.config.windows.schedule_lookahead_days).dates(self.today());
        let plan = AttemptPlan::over_dates(&dates, |d| vec![ep.espn_scoreboard(d)]);
        let adapt = |attempt: &Attempt, raw: &RawPayload| match attempt.provider() {
            Provider::Espn => espn::betting(raw),
            _ => Err(unsupported(attempt)),
        };
        let default = || {
            vec![BettingLine {
                game_id: "none".to_string(),
                home: String::new(),
                away: String::new(),
                details: "No lines available".to_string(),
                over_under: None,
                provider: String::new(),
            }]
        };
        let outcome = self.drive(&plan, adapt, default).await;
        ranker::rank_betting(outcome.entities, self.config.limits.betting)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
