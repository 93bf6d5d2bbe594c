//! Utility functions and data structures.
//!
//! - [`app_data`] - Application data directory and config file (XDG-compliant)
//! - [`dataset`] - CSV dataset loading and header resolution
//! - [`progress`] - Progress spinner, a no-op without the `progress` feature
//!
//! ```no_run
//! use lodex::index::LevelSchema;
//! use lodex::utils::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::open(Path::new("ug2010.csv"), &LevelSchema::uganda()).unwrap();
//! println!("{} rows", dataset.len());
//! ```

pub mod app_data;
pub mod dataset;
pub mod progress;

pub use app_data::*;
pub use dataset::*;
