//! reqwest-backed upstream client.
//!
//! Adds the per-provider request headers (stats.nba.com rejects requests
//! without browser-like headers, reddit wants a descriptive user agent),
//! enforces the per-call timeout, and decodes the body.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::{PayloadFormat, Provider, RawPayload, Upstream, UpstreamRequest};
use crate::config::UpstreamConfig;
use crate::types::UpstreamError;

/// Longest body excerpt kept on a `BadResponse`.
const MAX_DIAGNOSTIC_BODY: usize = 512;

const NBA_STATS_HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/json"),
    ("Referer", "https://stats.nba.com/"),
    ("x-nba-stats-origin", "stats"),
    ("x-nba-stats-token", "true"),
];

const JSON_HEADERS: &[(&str, &str)] = &[("Accept", "application/json")];

const RSS_HEADERS: &[(&str, &str)] = &[("Accept", "application/rss+xml, application/xml")];

fn headers_for(provider: Provider) -> &'static [(&'static str, &'static str)] {
    match provider {
        Provider::NbaStats => NBA_STATS_HEADERS,
        Provider::Espn | Provider::Reddit => JSON_HEADERS,
        Provider::EspnRss => RSS_HEADERS,
    }
}

pub struct HttpUpstream {
    http: Client,
    stats_api_key: Option<SecretString>,
}

impl HttpUpstream {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(cfg.timeout())
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self {
            http,
            stats_api_key: cfg.stats_api_key(),
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawPayload, UpstreamError> {
        let endpoint = request.describe();
        debug!(endpoint = %endpoint, provider = %request.provider, "Upstream GET");

        let mut builder = self
            .http
            .get(&request.url)
            .query(&request.query)
            .timeout(request.timeout);
        for (name, value) in headers_for(request.provider) {
            builder = builder.header(*name, *value);
        }
        if request.provider == Provider::NbaStats {
            if let Some(key) = &self.stats_api_key {
                builder = builder.header("x-api-key", key.expose_secret().as_str());
            }
        }

        let call = async {
            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(request.timeout, call).await {
            Err(_) => {
                return Err(UpstreamError::Timeout {
                    endpoint,
                    after: request.timeout,
                })
            }
            Ok(Err(e)) if e.is_timeout() => {
                return Err(UpstreamError::Timeout {
                    endpoint,
                    after: request.timeout,
                })
            }
            Ok(Err(e)) => {
                return Err(UpstreamError::Transport {
                    endpoint,
                    message: e.to_string(),
                })
            }
            Ok(Ok(parts)) => parts,
        };

        decode_body(request.provider, endpoint, status, body)
    }
}

/// Turn a status + body into a payload, or a `BadResponse` carrying both.
pub fn decode_body(
    provider: Provider,
    endpoint: String,
    status: u16,
    body: String,
) -> Result<RawPayload, UpstreamError> {
    if !(200..300).contains(&status) {
        return Err(UpstreamError::BadResponse {
            endpoint,
            status,
            body: excerpt(&body),
        });
    }

    match provider.format() {
        PayloadFormat::Json => serde_json::from_str(&body)
            .map(RawPayload::Json)
            .map_err(|e| UpstreamError::BadResponse {
                endpoint,
                status,
                body: format!("malformed JSON ({e}): {}", excerpt(&body)),
            }),
        PayloadFormat::Xml => {
            if body.trim().is_empty() {
                Err(UpstreamError::BadResponse {
                    endpoint,
                    status,
                    body: "empty body".to_string(),
                })
            } else {
                Ok(RawPayload::Text(body))
            }
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(MAX_DIAGNOSTIC_BODY).collect()
}
