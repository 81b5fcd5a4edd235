// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One configured feed: a display name plus the endpoint it is fetched from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A feed entry exactly as the provider saw it. Nothing is normalized yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawEntry {
    pub source: String,    // feed display name, e.g. "TechCrunch AI"
    pub title: String,     // may be empty
    pub summary: String,   // may carry HTML
    pub link: String,
    pub published: Option<String>, // raw pubDate / published / updated
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawEntry>>;
    fn name(&self) -> &str;
}
