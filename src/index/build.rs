use crate::index::reader::LocationIndex;
use crate::index::tree::{AdminTree, ROOT};
use crate::index::types::{IndexConfig, LevelSchema, RESERVED_CHAR};
use crate::index::writer::IndexWriter;
use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

/// One row of tabular input: positional fields, top level first, leaf last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmed value of field `i`; missing trailing fields read as blank
    pub fn field(&self, i: usize) -> &str {
        self.fields.get(i).map(|f| f.trim()).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

/// Counters collected while ingesting rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub leaves_attached: usize,
    /// Leaf already present under the same parent
    pub duplicate_leaves: usize,
    /// Rows contributing only intermediate units
    pub rows_without_leaf: usize,
    /// Leaf rows with no established ancestor context
    pub rows_dropped: usize,
    /// Rows containing `|`, the key delimiter character
    pub rows_rejected: usize,
    pub blank_rows: usize,
}

/// Rebuilds the tree from sparse rows, carrying blank cells forward.
///
/// A level's current value changes only when that level's field is non-blank
/// on the current row. It is never reset because an ancestor changed.
pub struct Ingestor {
    depth: usize,
    current: Vec<Option<String>>,
    tree: AdminTree,
    stats: IngestStats,
}

impl Ingestor {
    pub fn new(schema: &LevelSchema) -> Result<Self> {
        schema.validate()?;
        let depth = schema.depth();
        Ok(Self {
            depth,
            current: vec![None; depth - 1],
            tree: AdminTree::new(depth),
            stats: IngestStats::default(),
        })
    }

    pub fn push(&mut self, row: &RawRow) {
        self.stats.rows_read += 1;

        if row.is_blank() {
            self.stats.blank_rows += 1;
            return;
        }

        // Any '|' could merge with the delimiter, e.g. "A|" + "X" vs "A" + "|X"
        if row.fields.iter().any(|f| f.contains(RESERVED_CHAR)) {
            debug!(row = self.stats.rows_read, "row contains reserved '|', skipped");
            self.stats.rows_rejected += 1;
            return;
        }

        if row.fields.len() > self.depth {
            debug!(
                row = self.stats.rows_read,
                fields = row.fields.len(),
                "ignoring fields beyond the leaf column"
            );
        }

        for (level, slot) in self.current.iter_mut().enumerate() {
            let value = row.field(level);
            if !value.is_empty() {
                *slot = Some(value.to_string());
            }
        }

        let mut parent = ROOT;
        let mut established = true;
        for value in &self.current {
            match value {
                Some(name) => parent = self.tree.child_or_insert(parent, name).0,
                None => {
                    established = false;
                    break;
                }
            }
        }

        let leaf = row.field(self.depth - 1);
        if leaf.is_empty() {
            self.stats.rows_without_leaf += 1;
        } else if !established {
            debug!(row = self.stats.rows_read, leaf, "no ancestor context, leaf dropped");
            self.stats.rows_dropped += 1;
        } else {
            let (_, created) = self.tree.child_or_insert(parent, leaf);
            if created {
                self.stats.leaves_attached += 1;
            } else {
                self.stats.duplicate_leaves += 1;
            }
        }
    }

    pub fn finish(self) -> (AdminTree, IngestStats) {
        info!(
            rows = self.stats.rows_read,
            leaves = self.stats.leaves_attached,
            dropped = self.stats.rows_dropped,
            rejected = self.stats.rows_rejected,
            "ingestion complete"
        );
        (self.tree, self.stats)
    }
}

/// Ingest a sequence of rows into a tree
pub fn ingest_rows<'a, I>(schema: &LevelSchema, rows: I) -> Result<(AdminTree, IngestStats)>
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut ingestor = Ingestor::new(schema)?;
    for row in rows {
        ingestor.push(row);
    }
    Ok(ingestor.finish())
}

/// Ingest rows and build the full index in one pass
pub fn build_index<'a, I>(config: &IndexConfig, rows: I) -> Result<LocationIndex>
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let (tree, stats) = ingest_rows(&config.schema, rows)?;
    Ok(IndexWriter::new(config)?.build(tree, stats))
}
