// src/candidate.rs
//! Filtering, scoring and annotation of one raw entry into a [`Candidate`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::annotate::Pillar;
use crate::config::DigestConfig;
use crate::freshness::{is_fresh, resolve_published};
use crate::ingest::summarize;
use crate::ingest::types::RawEntry;

/// A scored, annotated article eligible for ranking. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub title: String,
    pub source: String,
    pub url: String,
    pub summary: String,
    pub score: i32,
    pub published_at: DateTime<Utc>,
    pub pillar: Pillar,
    pub key_angle: String,
}

/// Why an entry did not become a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Stale { published_at: DateTime<Utc> },
    EmptyTitle,
    Excluded { reason: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Stale { published_at } => write!(f, "stale (published {published_at})"),
            Rejection::EmptyTitle => f.write_str("empty title"),
            Rejection::Excluded { reason } => write!(f, "excluded ({reason})"),
        }
    }
}

/// Turn one raw entry into a candidate, or say why not.
///
/// Order: publish time → freshness → title → score → annotation.
pub fn build_candidate(
    entry: &RawEntry,
    cfg: &DigestConfig,
    now: DateTime<Utc>,
) -> Result<Candidate, Rejection> {
    let sel = &cfg.selection;

    let published = resolve_published(entry.published.as_deref(), now, sel.fallback_age());
    if published.fallback {
        debug!(
            target: "scoring",
            source = %entry.source,
            raw = ?entry.published,
            "unparseable publish date, using fallback"
        );
    }
    // fallback times are a guess; they never make an entry stale
    if !published.fallback && !is_fresh(published.at, now, sel.max_age()) {
        return Err(Rejection::Stale {
            published_at: published.at,
        });
    }

    let title = entry.title.trim();
    if title.is_empty() {
        return Err(Rejection::EmptyTitle);
    }

    let summary = summarize(&entry.summary, sel.summary_cap);
    let relevance = cfg.vocabulary.evaluate(title, &summary);
    if relevance.is_excluded() {
        return Err(Rejection::Excluded {
            reason: relevance.reasons.join(","),
        });
    }

    Ok(Candidate {
        title: title.to_string(),
        source: entry.source.clone(),
        url: entry.link.clone(),
        pillar: cfg.annotator.pillar(title, &summary),
        key_angle: cfg.annotator.angle(title, &entry.source),
        summary,
        score: relevance.score,
        published_at: published.at,
    })
}
