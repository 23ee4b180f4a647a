//! Upstream client layer.
//!
//! Defines the `Upstream` trait: a single bounded-timeout GET against one
//! provider, returning the raw payload or a typed failure. No retries
//! happen here; fallback is the orchestrator's job.

pub mod cache;
pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::types::UpstreamError;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Upstream schema families. Adapter selection keys off this, never off
/// the runtime shape of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// stats.nba.com `resultSets` tables.
    NbaStats,
    /// ESPN site JSON API.
    Espn,
    /// ESPN RSS news feed.
    EspnRss,
    /// Subreddit listing JSON.
    Reddit,
}

/// How a provider's body is decoded before it reaches an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Xml,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::NbaStats => "nba-stats",
            Provider::Espn => "espn",
            Provider::EspnRss => "espn-rss",
            Provider::Reddit => "reddit",
        }
    }

    pub fn format(&self) -> PayloadFormat {
        match self {
            Provider::EspnRss => PayloadFormat::Xml,
            _ => PayloadFormat::Json,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Request / payload
// ---------------------------------------------------------------------------

/// One outbound call: endpoint, query parameters and its timeout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamRequest {
    pub provider: Provider,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl UpstreamRequest {
    pub fn new(provider: Provider, url: impl Into<String>) -> Self {
        Self {
            provider,
            url: url.into(),
            query: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up a query parameter by name.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL with its query string, for logs and diagnostics.
    pub fn describe(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let qs: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.url, qs.join("&"))
    }
}

/// Decoded upstream body, handed untouched to an adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Json(Value),
    Text(String),
}

impl RawPayload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RawPayload::Json(v) => Some(v),
            RawPayload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawPayload::Text(s) => Some(s),
            RawPayload::Json(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Abstraction over a single upstream call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issue one request. Must give up once `request.timeout` elapses.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawPayload, UpstreamError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
