pub mod executor;
pub mod parser;
pub mod scorer;

pub use executor::{SearchExecutor, SearchHit};
pub use parser::{parse_query, SearchQuery, DEFAULT_LIMIT};
pub use scorer::{Scorer, ScoringWeights};
