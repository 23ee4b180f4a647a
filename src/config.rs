//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a missing file or a partial file still
//! yields a working configuration. Secrets (API keys) are referenced by
//! env-var name in the config and resolved at runtime.

use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub windows: WindowConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Per-call timeout applied to every upstream request.
    pub timeout_secs: u64,
    pub user_agent: String,
    pub nba_stats_base: String,
    pub espn_site_base: String,
    pub espn_standings_url: String,
    pub espn_rss_url: String,
    pub reddit_base: String,
    /// Launch all attempts at once and keep the first success by priority.
    pub speculative: bool,
    /// Response cache bucket width. 0 disables the cache.
    pub cache_ttl_secs: u64,
    /// Env var holding an optional stats API key.
    pub stats_api_key_env: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            nba_stats_base: "https://stats.nba.com/stats".to_string(),
            espn_site_base: "https://site.api.espn.com/apis/site/v2/sports/basketball/nba"
                .to_string(),
            espn_standings_url: "https://site.api.espn.com/apis/v2/sports/basketball/nba/standings"
                .to_string(),
            espn_rss_url: "https://www.espn.com/espn/rss/nba/news".to_string(),
            reddit_base: "https://www.reddit.com/r/nba".to_string(),
            speculative: false,
            cache_ttl_secs: 0,
            stats_api_key_env: None,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the optional stats API key. Unset or empty vars yield `None`.
    pub fn stats_api_key(&self) -> Option<SecretString> {
        self.stats_api_key_env
            .as_deref()
            .and_then(|env| AppConfig::resolve_env(env).ok())
            .filter(|key| !key.is_empty())
            .map(SecretString::new)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    /// Days before today searched for live/recent games.
    pub live_lookback_days: u32,
    /// Days after today searched for upcoming games.
    pub schedule_lookahead_days: u32,
    /// Offset of the league's calendar day from UTC.
    pub league_utc_offset_hours: i32,
}

/// Widest date window a single plan may walk.
pub const MAX_WINDOW_DAYS: u32 = 60;

impl WindowConfig {
    /// Reject windows that would walk an unbounded number of days and
    /// offsets no real timezone uses.
    pub fn validate(&self) -> Result<()> {
        if self.live_lookback_days > MAX_WINDOW_DAYS {
            bail!("windows.live_lookback_days must be at most {MAX_WINDOW_DAYS}, got {}", self.live_lookback_days);
        }
        if self.schedule_lookahead_days > MAX_WINDOW_DAYS {
            bail!(
                "windows.schedule_lookahead_days must be at most {MAX_WINDOW_DAYS}, got {}",
                self.schedule_lookahead_days
            );
        }
        if !(-12..=14).contains(&self.league_utc_offset_hours) {
            bail!(
                "windows.league_utc_offset_hours must be within -12..=14, got {}",
                self.league_utc_offset_hours
            );
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            live_lookback_days: 3,
            schedule_lookahead_days: 7,
            league_utc_offset_hours: -5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub games: usize,
    pub top_performers: usize,
    pub news: usize,
    pub social: usize,
    pub standings: usize,
    pub players: usize,
    pub schedule: usize,
    pub highlights: usize,
    pub fantasy: usize,
    pub leaders: usize,
    pub betting: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            games: 30,
            top_performers: 4,
            news: 10,
            social: 20,
            standings: 30,
            players: 25,
            schedule: 30,
            highlights: 10,
            fantasy: 10,
            leaders: 5,
            betting: 15,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.windows.validate()?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
