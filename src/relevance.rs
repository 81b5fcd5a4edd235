// src/relevance.rs
//! Keyword relevance scoring.
//!
//! Three vocabularies drive the score:
//! - `exclusion`: any hit excludes the entry outright ([`EXCLUDED`])
//! - `primary`:   +3 per distinct term found
//! - `secondary`: +1 per distinct term found
//!
//! Matching is plain substring containment on the lowercased `title + " " + summary`,
//! so "agent" also fires inside "agentic".

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Score returned for excluded entries. Anything below zero never reaches output.
pub const EXCLUDED: i32 = -1;
pub const PRIMARY_WEIGHT: i32 = 3;
pub const SECONDARY_WEIGHT: i32 = 1;

/// Result of relevance evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relevance {
    pub score: i32,
    pub matched: Vec<String>,
    pub reasons: Vec<String>,
}

impl Relevance {
    pub fn is_excluded(&self) -> bool {
        self.score < 0
    }
}

/// The three term lists. Terms are stored lowercased, trimmed, non-empty and unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub exclusion: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl Vocabulary {
    pub fn new<S: AsRef<str>>(primary: &[S], secondary: &[S], exclusion: &[S]) -> Self {
        Self {
            primary: clean_terms(primary),
            secondary: clean_terms(secondary),
            exclusion: clean_terms(exclusion),
        }
    }

    /// Re-apply term cleanup, e.g. after deserializing hand-edited config.
    pub fn normalized(self) -> Self {
        Self::new(&self.primary, &self.secondary, &self.exclusion)
    }

    /// Built-in AI/tech vocabulary.
    pub fn default_seed() -> Self {
        Self::new(
            &[
                "openai",
                "anthropic",
                "claude",
                "gpt",
                "gemini",
                "llm",
                "chatgpt",
                "ai model",
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "nvidia",
                "sam altman",
                "dario amodei",
                "google ai",
                "meta ai",
            ],
            &[
                "startup",
                "funding",
                "billion",
                "million",
                "raise",
                "launch",
                "developer",
                "engineer",
                "software",
                "automation",
                "agent",
                "robotics",
                "chip",
                "compute",
                "data center",
            ],
            &[
                "sports",
                "recipe",
                "fashion",
                "celebrity",
                "movie review",
                "weather",
                "horoscope",
                "politics",
                "election",
            ],
        )
    }

    /// Score with an explanation of which terms fired.
    pub fn evaluate(&self, title: &str, summary: &str) -> Relevance {
        let text = format!("{title} {summary}").to_lowercase();
        let mut rel = Relevance::default();

        if let Some(term) = self.exclusion.iter().find(|t| text.contains(t.as_str())) {
            rel.score = EXCLUDED;
            rel.reasons.push(format!("excluded:{term}"));
            return rel;
        }

        for t in self.primary.iter().filter(|t| text.contains(t.as_str())) {
            rel.score += PRIMARY_WEIGHT;
            rel.matched.push(format!("primary:{t}"));
        }
        for t in self.secondary.iter().filter(|t| text.contains(t.as_str())) {
            rel.score += SECONDARY_WEIGHT;
            rel.matched.push(format!("secondary:{t}"));
        }

        debug!(
            target: "scoring",
            score = rel.score,
            matched = ?truncate_vec(&rel.matched, 5),
            "relevance evaluated"
        );
        rel
    }

    /// `score(title, summary)`: non-negative relevance, or [`EXCLUDED`].
    pub fn score(&self, title: &str, summary: &str) -> i32 {
        self.evaluate(title, summary).score
    }
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/// Lowercase, trim, drop empties and repeats (first occurrence wins, order kept).
pub(crate) fn clean_terms<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.as_ref().trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
