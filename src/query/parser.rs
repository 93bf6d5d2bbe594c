//! Search query normalization.

/// Result count when the caller does not give one
pub const DEFAULT_LIMIT: usize = 50;

/// A normalized free-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Trimmed, uppercased query text
    pub text: String,
    /// Maximum number of results to return
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            text: raw.trim().to_uppercase(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Nothing to search for, or nothing asked back
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() || self.limit == 0
    }
}

/// Parse a raw query string with the default limit
pub fn parse_query(raw: &str) -> SearchQuery {
    SearchQuery::new(raw)
}
