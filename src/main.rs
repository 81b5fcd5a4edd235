//! Daily digest job: binary entrypoint.
//! Loads config, fetches the feeds, ranks the day's items and rewrites `news.js`.
//!
//! See `README.md` for configuration and env overrides.

use std::path::PathBuf;

use ai_news_digest::config::DigestConfig;
use ai_news_digest::ingest::providers::{build_http_client, providers_for};
use ai_news_digest::logging;
use ai_news_digest::metrics::Metrics;
use ai_news_digest::{publish, run_once, WriteOutcome};
use anyhow::{Context, Result};
use tracing::{info, warn};

const ENV_METRICS_PATH: &str = "DIGEST_METRICS_PATH";
const ENV_LOG_JSON: &str = "DIGEST_LOG_JSON";

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real env vars win.
    let _ = dotenvy::dotenv();
    logging::init(std::env::var(ENV_LOG_JSON).is_ok_and(|v| v == "1"));

    let metrics = match Metrics::init() {
        Ok(m) => Some(m),
        Err(e) => {
            warn!(error = ?e, "metrics recorder not installed");
            None
        }
    };

    let cfg = DigestConfig::load_default().context("loading digest configuration")?;
    info!(
        feeds = cfg.feeds.len(),
        top_n = cfg.selection.top_n,
        max_age_hours = cfg.selection.max_age_hours,
        output = %cfg.output.path.display(),
        "starting digest run"
    );

    let client = build_http_client()?;
    let providers = providers_for(&cfg.feeds, &client);

    let now = chrono::Utc::now();
    let outcome = run_once(&providers, &cfg, now).await;

    for (i, c) in outcome.ranked.iter().enumerate() {
        let short: String = c.title.chars().take(70).collect();
        info!("#{} [{}pts] {} ({})", i + 1, c.score, short, c.source);
    }

    match publish(&outcome.ranked, &cfg.output, now)? {
        WriteOutcome::Skipped => info!("nothing new today, artifact left untouched"),
        WriteOutcome::Written { path, items, .. } => {
            info!(path = %path.display(), items, "digest published")
        }
    }

    if let (Some(m), Ok(p)) = (metrics.as_ref(), std::env::var(ENV_METRICS_PATH)) {
        if let Err(e) = m.write_textfile(&PathBuf::from(p)) {
            warn!(error = ?e, "failed to write metrics textfile");
        }
    }

    Ok(())
}
