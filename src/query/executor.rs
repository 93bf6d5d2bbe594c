use crate::index::reader::LocationIndex;
use crate::index::types::LocationRecord;
use crate::query::parser::SearchQuery;
use crate::query::scorer::{Scorer, ScoringWeights};

/// A ranked search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub record: &'a LocationRecord,
    pub score: u32,
}

/// Query executor
pub struct SearchExecutor<'a> {
    index: &'a LocationIndex,
    scorer: Scorer,
    overcollect_factor: usize,
}

impl<'a> SearchExecutor<'a> {
    /// Executor using the scoring settings the index was built with
    pub fn new(index: &'a LocationIndex) -> Self {
        let config = index.config();
        Self {
            index,
            scorer: Scorer::new(config.scoring_weights.clone()),
            overcollect_factor: config.overcollect_factor.max(1),
        }
    }

    /// Create executor with custom scoring weights
    pub fn with_scoring_weights(index: &'a LocationIndex, weights: ScoringWeights) -> Self {
        Self {
            scorer: Scorer::new(weights),
            ..Self::new(index)
        }
    }

    /// Scan the leaf-name index and return at most `query.limit` hits,
    /// highest score first. Ties keep scan order.
    pub fn execute(&self, query: &SearchQuery) -> Vec<SearchHit<'a>> {
        if query.is_empty() {
            return Vec::new();
        }

        let cap = query.limit.saturating_mul(self.overcollect_factor);
        let text = query.text.as_str();

        let mut hits: Vec<SearchHit<'a>> = self
            .index
            .leaf_entries()
            .filter(|(_, key)| Scorer::matches(key, text))
            .take(cap)
            .map(|(record, key)| SearchHit {
                record,
                score: self.scorer.score(key, text),
            })
            .collect();

        // sort_by is stable
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(query.limit);
        hits
    }
}
