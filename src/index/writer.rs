use crate::index::build::IngestStats;
use crate::index::reader::{LocationIndex, PathEntry};
use crate::index::stats::IndexStats;
use crate::index::tree::AdminTree;
use crate::index::types::{
    canonical, composite_key, IndexConfig, LocationRecord, NodeId, RecordId, RecordKey,
    KEY_DELIMITER,
};
use anyhow::Result;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

/// Walks a completed tree once and derives the read-only lookup structures
pub struct IndexWriter {
    config: IndexConfig,
    top_names: FxHashMap<String, String>,
    records: Vec<LocationRecord>,
    leaf_order: Vec<String>,
    by_leaf: FxHashMap<String, Vec<RecordId>>,
    by_path: FxHashMap<String, RecordId>,
    path_collisions: usize,
    second_level: FxHashMap<String, PathEntry>,
    third_level: FxHashMap<String, PathEntry>,
    /// `PARENT_KEY||CHILD` pairs already listed, for child dedup
    listed: FxHashSet<String>,
}

impl IndexWriter {
    /// Writer for a validated schema
    pub fn new(config: &IndexConfig) -> Result<Self> {
        config.schema.validate()?;
        Ok(Self::unchecked(config))
    }

    /// Skips schema validation. Only for trees with no nodes, where no
    /// slot level is ever read.
    pub(crate) fn unchecked(config: &IndexConfig) -> Self {
        Self {
            config: config.clone(),
            top_names: FxHashMap::default(),
            records: Vec::new(),
            leaf_order: Vec::new(),
            by_leaf: FxHashMap::default(),
            by_path: FxHashMap::default(),
            path_collisions: 0,
            second_level: FxHashMap::default(),
            third_level: FxHashMap::default(),
            listed: FxHashSet::default(),
        }
    }

    pub fn build(mut self, tree: AdminTree, ingest: IngestStats) -> LocationIndex {
        let mut path = Vec::with_capacity(tree.depth());
        for &child in tree.root().children() {
            self.visit(&tree, child, &mut path);
        }

        let mut top_level: Vec<String> = self.top_names.into_values().collect();
        top_level.sort();

        // Each name slot keeps its first position but points at the last record written
        let leaf_slots: Vec<RecordId> = self
            .leaf_order
            .iter()
            .filter_map(|name| self.by_leaf.get(name).and_then(|ids| ids.last().copied()))
            .collect();

        let record_keys: Vec<RecordKey> = self
            .records
            .par_iter()
            .map(RecordKey::from_record)
            .collect();

        let leaf_name_collisions = self
            .by_leaf
            .values()
            .map(|ids| ids.len().saturating_sub(1))
            .sum();

        let stats = IndexStats {
            ingest,
            nodes_per_level: self
                .config
                .schema
                .levels
                .iter()
                .cloned()
                .zip(tree.nodes_per_level())
                .collect(),
            top_level_units: top_level.len(),
            records: self.records.len(),
            distinct_leaf_names: leaf_slots.len(),
            leaf_name_collisions,
            path_collisions: self.path_collisions,
        };

        info!(
            records = stats.records,
            top_level = stats.top_level_units,
            collisions = stats.leaf_name_collisions,
            "index built"
        );

        LocationIndex {
            config: self.config,
            tree,
            top_level,
            records: self.records,
            record_keys,
            leaf_slots,
            by_leaf: self.by_leaf,
            by_path: self.by_path,
            second_level: self.second_level,
            third_level: self.third_level,
            stats,
        }
    }

    fn visit(&mut self, tree: &AdminTree, id: NodeId, path: &mut Vec<NodeId>) {
        let node = tree.node(id);
        let level = node.level - 1;
        let schema = &self.config.schema;
        let (top, second, third, leaf) = (schema.top, schema.second, schema.third, schema.leaf());
        path.push(id);

        if level == top {
            self.top_names
                .entry(node.key.clone())
                .or_insert_with(|| node.name.clone());
        }

        if level == second {
            let key = slot_key(tree, path, &[top, second]);
            self.second_level
                .entry(key)
                .or_insert_with(|| PathEntry::new(&node.name));
        }

        if level == third {
            let parent_key = slot_key(tree, path, &[top, second]);
            let key = slot_key(tree, path, &[top, second, third]);
            self.third_level
                .entry(key)
                .or_insert_with(|| PathEntry::new(&node.name));
            self.list_child(Slot::Second, parent_key, &node.name);
        }

        if level == leaf {
            self.add_leaf(tree, path);
        } else {
            for &child in node.children() {
                self.visit(tree, child, path);
            }
        }

        path.pop();
    }

    fn add_leaf(&mut self, tree: &AdminTree, path: &[NodeId]) {
        let schema = &self.config.schema;
        let name_at = |level: usize| tree.node(path[level]).name.clone();
        let record = LocationRecord {
            leaf: name_at(schema.leaf()),
            third_level: name_at(schema.third),
            second_level: name_at(schema.second),
            top_level: name_at(schema.top),
            electoral_tag: schema.tag.map(name_at),
        };
        let parent_key = slot_key(tree, path, &[schema.top, schema.second, schema.third]);

        let record_id = self.records.len() as RecordId;
        let leaf_key = canonical(&record.leaf);

        self.list_child(Slot::Third, parent_key.clone(), &record.leaf);

        let full_key = format!("{}{}{}", parent_key, KEY_DELIMITER, leaf_key);
        if self.by_path.insert(full_key, record_id).is_some() {
            self.path_collisions += 1;
        }

        match self.by_leaf.get_mut(&leaf_key) {
            Some(ids) => {
                debug!(leaf = %record.leaf, "leaf name seen under another parent, last write wins");
                ids.push(record_id);
            }
            None => {
                self.leaf_order.push(leaf_key.clone());
                self.by_leaf.insert(leaf_key, vec![record_id]);
            }
        }

        self.records.push(record);
    }

    /// Append `child` to the listing of `parent_key` unless already present
    fn list_child(&mut self, slot: Slot, parent_key: String, child: &str) {
        let marker = format!("{}{}{}", parent_key, KEY_DELIMITER, canonical(child));
        if !self.listed.insert(marker) {
            return;
        }
        let index = match slot {
            Slot::Second => &mut self.second_level,
            Slot::Third => &mut self.third_level,
        };
        if let Some(entry) = index.get_mut(&parent_key) {
            entry.children.push(child.to_string());
        }
    }
}

/// Composite key of the names found at `levels` along `path`
fn slot_key(tree: &AdminTree, path: &[NodeId], levels: &[usize]) -> String {
    let names: Vec<&str> = levels
        .iter()
        .map(|&level| tree.node(path[level]).name.as_str())
        .collect();
    composite_key(&names)
}

/// Which path-scoped index a listing belongs to
#[derive(Clone, Copy)]
enum Slot {
    Second,
    Third,
}
