use crate::index::build::IngestStats;
use crate::index::reader::LocationIndex;
use serde::Serialize;
use std::path::Path;

/// Summary of an ingestion + indexing pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub ingest: IngestStats,
    /// Node count per input level, top first
    pub nodes_per_level: Vec<(String, usize)>,
    pub top_level_units: usize,
    pub records: usize,
    pub distinct_leaf_names: usize,
    /// Records shadowed in the leaf-name index by a later record of the same name
    pub leaf_name_collisions: usize,
    /// Records sharing a full top/second/third/leaf path with an earlier one
    pub path_collisions: usize,
}

/// Display index statistics
pub fn show_stats(index: &LocationIndex, source: Option<&Path>) {
    let stats = index.stats();

    println!("Index Statistics");
    println!("================");
    println!();
    if let Some(path) = source {
        println!("Dataset:          {}", path.display());
    }
    println!("Rows read:        {}", stats.ingest.rows_read);
    println!("Blank rows:       {}", stats.ingest.blank_rows);
    println!("Rows dropped:     {}", stats.ingest.rows_dropped);
    println!("Rows rejected:    {}", stats.ingest.rows_rejected);
    println!("Duplicate leaves: {}", stats.ingest.duplicate_leaves);

    println!();
    println!("Units by level:");
    let width = stats
        .nodes_per_level
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    for (name, count) in &stats.nodes_per_level {
        println!("  {:width$}  {}", name, count, width = width);
    }

    println!();
    println!("Top-level units:  {}", stats.top_level_units);
    println!("Records:          {}", stats.records);
    println!("Distinct leaves:  {}", stats.distinct_leaf_names);
    println!(
        "Name collisions:  {} ({})",
        stats.leaf_name_collisions,
        format_ratio(stats.leaf_name_collisions, stats.records)
    );
    println!("Path collisions:  {}", stats.path_collisions);
}

/// Format a count as a percentage of a total
fn format_ratio(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}
