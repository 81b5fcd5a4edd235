// src/pipeline.rs
//! One digest run: ingest → filter & score → annotate → rank & dedup.
//!
//! Everything after ingestion is synchronous and pure given `(entries, cfg, now)`.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::candidate::{build_candidate, Candidate, Rejection};
use crate::config::DigestConfig;
use crate::ingest::types::{RawEntry, SourceProvider};
use crate::ingest::{ingest_all, IngestReport};
use crate::rank::{rank, RankedList};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_candidates_total", "Entries that became candidates.");
        describe_counter!(
            "digest_rejected_total",
            "Entries dropped before ranking, labelled by reason."
        );
        describe_gauge!("digest_selected", "Items in the ranked list of the last run.");
        describe_gauge!("digest_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// Counters for one selection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    pub considered: usize,
    pub stale: usize,
    pub untitled: usize,
    pub excluded: usize,
    pub candidates: usize,
    pub selected: usize,
}

/// Score, annotate and rank already-ingested entries.
pub fn select_top(
    entries: &[RawEntry],
    cfg: &DigestConfig,
    now: DateTime<Utc>,
) -> (RankedList, SelectionStats) {
    ensure_metrics_described();

    let mut stats = SelectionStats {
        considered: entries.len(),
        ..Default::default()
    };
    let mut candidates: Vec<Candidate> = Vec::with_capacity(entries.len());

    for e in entries {
        match build_candidate(e, cfg, now) {
            Ok(c) => candidates.push(c),
            Err(rej) => {
                let reason = match rej {
                    Rejection::Stale { .. } => {
                        stats.stale += 1;
                        "stale"
                    }
                    Rejection::EmptyTitle => {
                        stats.untitled += 1;
                        "untitled"
                    }
                    Rejection::Excluded { .. } => {
                        stats.excluded += 1;
                        "excluded"
                    }
                };
                counter!("digest_rejected_total", "reason" => reason).increment(1);
                debug!(target: "scoring", source = %e.source, title = %e.title, %rej, "rejected");
            }
        }
    }

    stats.candidates = candidates.len();
    counter!("digest_candidates_total").increment(candidates.len() as u64);

    let ranked = rank(candidates, cfg.selection.top_n);
    stats.selected = ranked.len();
    gauge!("digest_selected").set(ranked.len() as f64);
    (ranked, stats)
}

/// Result of a full run, before publishing.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub ranked: RankedList,
    pub ingest: IngestReport,
    pub stats: SelectionStats,
}

/// Fetch every provider (sequentially, failures isolated) and select the top N.
pub async fn run_once(
    providers: &[Box<dyn SourceProvider>],
    cfg: &DigestConfig,
    now: DateTime<Utc>,
) -> PipelineOutcome {
    let ingest = ingest_all(providers, cfg.selection.entries_per_feed).await;
    let (ranked, stats) = select_top(&ingest.entries, cfg, now);

    gauge!("digest_last_run_ts").set(now.timestamp() as f64);
    info!(
        target: "pipeline",
        sources = ingest.sources.len(),
        failed_sources = ingest.failed_sources().count(),
        considered = stats.considered,
        stale = stats.stale,
        excluded = stats.excluded,
        candidates = stats.candidates,
        selected = stats.selected,
        "digest run complete"
    );

    PipelineOutcome {
        ranked,
        ingest,
        stats,
    }
}
