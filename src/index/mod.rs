pub mod build;
pub mod reader;
pub mod shared;
pub mod stats;
pub mod tree;
pub mod types;
pub mod writer;

pub use build::{ingest_rows, Ingestor, IngestStats, RawRow};
pub use reader::LocationIndex;
pub use shared::SharedIndex;
pub use stats::IndexStats;
pub use types::*;
pub use writer::IndexWriter;
