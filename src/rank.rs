// src/rank.rs
//! Ranking and near-duplicate suppression.
//!
//! Candidates are sorted by score (desc), then publish time (desc). A single
//! greedy pass keeps the first candidate for each dedup key until `n` are taken.
//! The key is the lowercased first 40 characters of the title.

use std::collections::HashSet;

use serde::Serialize;

use crate::candidate::Candidate;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEDUP_PREFIX_CHARS: usize = 40;

/// Lowercase of the first [`DEDUP_PREFIX_CHARS`] characters of `title`.
pub fn dedup_key(title: &str) -> String {
    title
        .chars()
        .take(DEDUP_PREFIX_CHARS)
        .collect::<String>()
        .to_lowercase()
}

/// At most N candidates, best first, no two sharing a dedup key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedList(Vec<Candidate>);

impl RankedList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sort key order: score desc, then published_at desc.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
}

/// Rank, dedup and cut to `n`. Negative scores never make it through.
pub fn rank(mut candidates: Vec<Candidate>, n: usize) -> RankedList {
    candidates.retain(|c| c.score >= 0);
    sort_candidates(&mut candidates);

    let mut seen: HashSet<String> = HashSet::new();
    let mut top = Vec::with_capacity(n.min(candidates.len()));
    for c in candidates {
        if top.len() >= n {
            break;
        }
        if seen.insert(dedup_key(&c.title)) {
            top.push(c);
        }
    }
    RankedList(top)
}
