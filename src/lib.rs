// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod annotate;
pub mod candidate;
pub mod config;
pub mod freshness;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod publish;
pub mod rank;
pub mod relevance;

// ---- Re-exports for stable public API ----
pub use crate::candidate::Candidate;
pub use crate::config::DigestConfig;
pub use crate::pipeline::{run_once, select_top, PipelineOutcome};
pub use crate::publish::{publish, WriteOutcome};
pub use crate::rank::RankedList;
