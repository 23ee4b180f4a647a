//! Optional response cache around any `Upstream`.
//!
//! Keyed by (url, query, time bucket). Only successful payloads are stored,
//! and only the current bucket is kept. The pipeline never consults the
//! cache directly; with `ttl` of zero this is a pass-through.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use super::{RawPayload, Upstream, UpstreamRequest};
use crate::types::UpstreamError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    url: String,
    query: Vec<(String, String)>,
    bucket: i64,
}

pub struct CachedUpstream<U> {
    inner: U,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, RawPayload>>,
}

impl<U: Upstream> CachedUpstream<U> {
    pub fn new(inner: U, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn bucket(&self) -> i64 {
        let ttl = self.ttl.as_secs().max(1) as i64;
        Utc::now().timestamp().div_euclid(ttl)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<U: Upstream> Upstream for CachedUpstream<U> {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawPayload, UpstreamError> {
        if self.ttl.is_zero() {
            return self.inner.fetch(request).await;
        }

        let key = CacheKey {
            url: request.url.clone(),
            query: request.query.clone(),
            bucket: self.bucket(),
        };

        if let Some(hit) = self.entries.read().await.get(&key) {
            debug!(endpoint = %request.describe(), "Upstream cache hit");
            return Ok(hit.clone());
        }

        let payload = self.inner.fetch(request).await?;

        let mut entries = self.entries.write().await;
        entries.retain(|k, _| k.bucket == key.bucket);
        entries.insert(key, payload.clone());
        Ok(payload)
    }
}
