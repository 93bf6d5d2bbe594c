//! Scoring module for search results
//!
//! A record's score is the sum of fixed bonuses for how closely its names
//! line up with the query:
//! - exact leaf name
//! - exact top-level name
//! - exact second-level name
//! - leaf name prefix
//!
//! Scores only order results; they never filter them.

use crate::index::types::RecordKey;
use serde::{Deserialize, Serialize};

/// Configurable weights for scoring factors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Leaf name equals the query
    pub exact_leaf: u32,
    /// Top-level name equals the query
    pub exact_top: u32,
    /// Second-level name equals the query
    pub exact_second: u32,
    /// Leaf name starts with the query
    pub leaf_prefix: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_leaf: 10,
            exact_top: 8,
            exact_second: 6,
            leaf_prefix: 4,
        }
    }
}

/// Scorer calculates relevance scores for search results
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Create a scorer with default weights
    pub fn with_defaults() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a record against an already-normalized (uppercase, trimmed) query
    pub fn score(&self, key: &RecordKey, query: &str) -> u32 {
        let mut score = 0;

        if key.leaf == query {
            score += self.weights.exact_leaf;
        }
        if key.top == query {
            score += self.weights.exact_top;
        }
        if key.second == query {
            score += self.weights.exact_second;
        }
        if key.leaf.starts_with(query) {
            score += self.weights.leaf_prefix;
        }

        score
    }

    /// Whether a record is a candidate for the query at all
    pub fn matches(key: &RecordKey, query: &str) -> bool {
        key.leaf.contains(query)
            || key.top.contains(query)
            || key.second.contains(query)
            || key.third.contains(query)
            || key.leaf.starts_with(query)
            || key.top == query
    }
}
