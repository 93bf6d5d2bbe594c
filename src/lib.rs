//! # lodex - Hierarchical location index
//!
//! lodex loads a flat, sparsely-filled administrative-unit table (district,
//! constituency, subcounty, parish, village) into an in-memory tree and
//! answers navigation and free-text search queries against it.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Row ingestion, the administrative tree and the derived lookup indices
//! - [`query`] - Query parsing, match scoring and search execution
//! - [`output`] - Coloured and JSON result formatting
//! - [`utils`] - CSV loading, configuration and progress display
//!
//! ## Quick Start
//!
//! ```ignore
//! use lodex::index::{IndexConfig, LocationIndex};
//! use std::path::Path;
//!
//! let index = LocationIndex::open(Path::new("villages.csv"), &IndexConfig::default()).unwrap();
//!
//! for district in index.top_level_units() {
//!     println!("{}", district);
//! }
//!
//! if let Some(path) = index.path("Kasambya I") {
//!     println!("{}", path);
//! }
//!
//! for record in index.search("aduku", 10) {
//!     println!("{}", record.path());
//! }
//! ```
//!
//! ## Sparse rows
//!
//! Rows only repeat a column when its value changes. Each level keeps the
//! last non-blank value seen for it, and a leaf is attached beneath the
//! current values of every level above it. Leaves seen before all of their
//! ancestors are known are dropped and counted in [`index::IngestStats`].

pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub use index::{IndexConfig, LevelSchema, LocationIndex, LocationRecord, SharedIndex};
