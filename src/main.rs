//! COURTSIDE: live NBA data aggregator
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the upstream client and serves the feed API until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use courtside::api;
use courtside::config;
use courtside::feeds::FeedService;
use courtside::upstream::cache::CachedUpstream;
use courtside::upstream::http::HttpUpstream;
use courtside::upstream::Upstream;

const BANNER: &str = r#"
  ___ ___  _   _ ___ _____ ___ ___ ___  ___
 / __/ _ \| | | | _ \_   _/ __|_ _|   \| __|
| (_| (_) | |_| |   / | | \__ \| || |) | _|
 \___\___/ \___/|_|_\ |_| |___/___|___/|___|

  Live NBA feeds with multi-provider fallback
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = config::AppConfig::load_or_default("config.toml")?;

    println!("{BANNER}");
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        timeout_secs = cfg.upstream.timeout_secs,
        speculative = cfg.upstream.speculative,
        lookback_days = cfg.windows.live_lookback_days,
        lookahead_days = cfg.windows.schedule_lookahead_days,
        "COURTSIDE starting up"
    );

    let http = HttpUpstream::new(&cfg.upstream)?;
    let upstream: Arc<dyn Upstream> = if cfg.upstream.cache_ttl_secs > 0 {
        info!(ttl_secs = cfg.upstream.cache_ttl_secs, "Upstream response cache enabled");
        Arc::new(CachedUpstream::new(http, Duration::from_secs(cfg.upstream.cache_ttl_secs)))
    } else {
        Arc::new(http)
    };

    let feeds = Arc::new(FeedService::new(upstream, cfg));
    let server = feeds.config().server.clone();

    api::serve(feeds, &server.host, server.port).await?;

    info!("COURTSIDE shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("courtside=info"));

    let json_logging = std::env::var("COURTSIDE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
