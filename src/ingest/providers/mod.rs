// src/ingest/providers/mod.rs
pub mod rss;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::ingest::types::{FeedSource, SourceProvider};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ai-news-digest/0.1)";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for all feed providers in a run.
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

/// One HTTP-backed RSS/Atom provider per configured feed, in configuration order.
pub fn providers_for(feeds: &[FeedSource], client: &reqwest::Client) -> Vec<Box<dyn SourceProvider>> {
    feeds
        .iter()
        .map(|f| Box::new(rss::RssProvider::from_url(f, client.clone())) as Box<dyn SourceProvider>)
        .collect()
}
