use crate::index::build::{build_index, IngestStats, RawRow};
use crate::index::stats::IndexStats;
use crate::index::tree::AdminTree;
use crate::index::types::{
    canonical, composite_key, IndexConfig, LevelSchema, LocationRecord, ParentUnits, RecordId,
    RecordKey, KEY_DELIMITER,
};
use crate::index::writer::IndexWriter;
use crate::query::{parse_query, SearchExecutor};
use crate::utils::Dataset;
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::path::Path;

/// Display name of a path-scoped unit and the ordered names of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub name: String,
    pub children: Vec<String>,
}

impl PathEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }
}

/// Immutable location index: the tree plus every derived lookup structure.
///
/// All lookups are case-insensitive. Misses come back as `None` or an empty
/// slice. The index is never mutated after construction, so it can be shared
/// freely between threads.
pub struct LocationIndex {
    pub(crate) config: IndexConfig,
    pub(crate) tree: AdminTree,
    /// Top-slot names, sorted
    pub(crate) top_level: Vec<String>,
    /// Every leaf in tree-walk order
    pub(crate) records: Vec<LocationRecord>,
    /// Uppercase names for each record, parallel to `records`
    pub(crate) record_keys: Vec<RecordKey>,
    /// Leaf-name index in iteration order: one slot per distinct name,
    /// holding the last record written under that name
    pub(crate) leaf_slots: Vec<RecordId>,
    /// Uppercase leaf name -> every record with that name, in walk order
    pub(crate) by_leaf: FxHashMap<String, Vec<RecordId>>,
    /// `TOP||SECOND||THIRD||LEAF` -> record
    pub(crate) by_path: FxHashMap<String, RecordId>,
    /// `TOP||SECOND` -> third-slot names
    pub(crate) second_level: FxHashMap<String, PathEntry>,
    /// `TOP||SECOND||THIRD` -> leaf names
    pub(crate) third_level: FxHashMap<String, PathEntry>,
    pub(crate) stats: IndexStats,
}

impl Default for LocationIndex {
    fn default() -> Self {
        Self::empty(&LevelSchema::default())
    }
}

impl LocationIndex {
    /// Build an index from rows already split into positional fields,
    /// with default search settings. Fails only on an invalid schema.
    pub fn from_rows<'a, I>(schema: &LevelSchema, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let config = IndexConfig {
            schema: schema.clone(),
            ..IndexConfig::default()
        };
        build_index(&config, rows)
    }

    /// Build an index from rows with explicit schema and search settings
    pub fn from_rows_with_config<'a, I>(config: &IndexConfig, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        build_index(config, rows)
    }

    /// Load a CSV dataset and build an index from it
    pub fn open(path: &Path, config: &IndexConfig) -> Result<Self> {
        config.schema.validate()?;
        let dataset = Dataset::open(path, &config.schema)?;
        build_index(config, dataset.rows())
    }

    /// An index with no data: every lookup misses. Any schema is accepted
    /// since no rows are projected through it.
    pub fn empty(schema: &LevelSchema) -> Self {
        let config = IndexConfig {
            schema: schema.clone(),
            ..IndexConfig::default()
        };
        Self::empty_with_config(&config)
    }

    pub fn empty_with_config(config: &IndexConfig) -> Self {
        IndexWriter::unchecked(config).build(
            AdminTree::new(config.schema.depth()),
            IngestStats::default(),
        )
    }

    pub fn schema(&self) -> &LevelSchema {
        &self.config.schema
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Number of leaf records (including ones shadowed in the name index)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All top-level unit names, sorted
    pub fn top_level_units(&self) -> &[String] {
        &self.top_level
    }

    /// Second-level units under `top`, found by prefix scan over the
    /// second-level index keys. Sorted and distinct.
    pub fn second_level_units(&self, top: &str) -> Vec<String> {
        let prefix = format!("{}{}", canonical(top), KEY_DELIMITER);
        let mut names: Vec<String> = self
            .second_level
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, entry)| entry.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Third-level units under `top` / `second`
    pub fn third_level_units(&self, top: &str, second: &str) -> &[String] {
        self.second_level
            .get(&composite_key(&[top, second]))
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    /// Leaf units under `top` / `second` / `third`
    pub fn leaf_units(&self, top: &str, second: &str, third: &str) -> &[String] {
        self.third_level
            .get(&composite_key(&[top, second, third]))
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a leaf by name alone. When several leaves share the name, the
    /// one ingested last wins; see [`records_named`](Self::records_named).
    pub fn record_by_leaf(&self, leaf: &str) -> Option<&LocationRecord> {
        self.by_leaf
            .get(&canonical(leaf))
            .and_then(|ids| ids.last())
            .map(|&id| self.record(id))
    }

    /// Every record whose leaf has this name, in ingestion order
    pub fn records_named(&self, leaf: &str) -> Vec<&LocationRecord> {
        self.by_leaf
            .get(&canonical(leaf))
            .map(|ids| ids.iter().map(|&id| self.record(id)).collect())
            .unwrap_or_default()
    }

    /// Resolve a leaf by its full path
    pub fn record_at(
        &self,
        top: &str,
        second: &str,
        third: &str,
        leaf: &str,
    ) -> Option<&LocationRecord> {
        self.by_path
            .get(&composite_key(&[top, second, third, leaf]))
            .map(|&id| self.record(id))
    }

    /// `TOP → SECOND → THIRD → LEAF` for a leaf name
    pub fn path(&self, leaf: &str) -> Option<String> {
        self.record_by_leaf(leaf).map(LocationRecord::path)
    }

    /// The third/second/top units above a leaf name
    pub fn parent(&self, leaf: &str) -> Option<ParentUnits> {
        self.record_by_leaf(leaf).map(LocationRecord::parent)
    }

    /// Children of an arbitrary prefix of the full input hierarchy, including
    /// levels not projected into records. An empty path lists the top input level.
    pub fn children<S: AsRef<str>>(&self, path: &[S]) -> Vec<&str> {
        match self.tree.resolve(path) {
            Some(id) => self
                .tree
                .node(id)
                .children()
                .iter()
                .map(|&child| self.tree.node(child).name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ranked free-text search over the leaf-name index
    pub fn search(&self, query: &str, limit: usize) -> Vec<&LocationRecord> {
        let query = parse_query(query).with_limit(limit);
        SearchExecutor::new(self)
            .execute(&query)
            .into_iter()
            .map(|hit| hit.record)
            .collect()
    }

    pub(crate) fn record(&self, id: RecordId) -> &LocationRecord {
        &self.records[id as usize]
    }

    /// Leaf-name index entries in iteration order
    pub(crate) fn leaf_entries(&self) -> impl Iterator<Item = (&LocationRecord, &RecordKey)> {
        self.leaf_slots
            .iter()
            .map(|&id| (&self.records[id as usize], &self.record_keys[id as usize]))
    }
}
