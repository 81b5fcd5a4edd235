// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{RawEntry, SourceProvider};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// Per-feed cap on entries handed to scoring.
pub const DEFAULT_ENTRIES_PER_FEED: usize = 20;

/// Appended to summaries that were cut at the character budget.
pub const TRUNCATION_MARKER: &str = "...";

/// One-time metrics registration (so series show up in the exposition).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_ingest_entries_total",
            "Raw entries accepted from providers (after the per-feed cap)."
        );
        describe_counter!(
            "digest_ingest_source_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!(
            "digest_ingest_fetch_ms",
            "Provider fetch + parse time in milliseconds."
        );
    });
}

/// Normalize feed text: decode entities, strip tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?s)<[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace (nbsp included, \s is Unicode-aware)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Cap `text` at `cap` characters, appending [`TRUNCATION_MARKER`] when something was cut.
pub fn truncate_chars(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Summary as it is scored and displayed: normalized, then capped.
pub fn summarize(raw: &str, cap: usize) -> String {
    truncate_chars(&normalize_text(raw), cap)
}

/// What happened to one source during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Fetched(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub name: String,
    pub status: SourceStatus,
}

/// Entries gathered from every provider, plus how each provider fared.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub entries: Vec<RawEntry>,
    pub sources: Vec<SourceOutcome>,
}

impl IngestReport {
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.sources
            .iter()
            .filter(|s| matches!(s.status, SourceStatus::Failed(_)))
    }
}

/// Fetch every provider in order, keeping at most `per_feed` entries from each.
/// A failing provider contributes nothing and does not stop the others.
pub async fn ingest_all(providers: &[Box<dyn SourceProvider>], per_feed: usize) -> IngestReport {
    ensure_metrics_described();

    let mut report = IngestReport::default();
    for p in providers {
        let t0 = std::time::Instant::now();
        let result = p.fetch_latest().await;
        metrics::histogram!("digest_ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        match result {
            Ok(mut v) => {
                v.truncate(per_feed);
                tracing::info!(target: "ingest", provider = p.name(), entries = v.len(), "fetched feed");
                counter!("digest_ingest_entries_total").increment(v.len() as u64);
                report.sources.push(SourceOutcome {
                    name: p.name().to_string(),
                    status: SourceStatus::Fetched(v.len()),
                });
                report.entries.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, provider = p.name(), "provider error");
                counter!("digest_ingest_source_errors_total").increment(1);
                report.sources.push(SourceOutcome {
                    name: p.name().to_string(),
                    status: SourceStatus::Failed(format!("{e:#}")),
                });
            }
        }
    }
    report
}
