//! Arena-backed administrative tree.
//!
//! Node 0 is a synthetic root at level 0. Real units sit at levels
//! `1..=depth`, so a node's level is one more than the index of the input
//! column it came from. Children are kept in insertion order and are unique
//! per parent by canonical (uppercase) name.

use crate::index::types::{canonical, NodeId};
use rustc_hash::FxHashMap;

pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct TreeNode {
    /// 0 for the root, otherwise 1-based level
    pub level: usize,
    /// Display form, as first seen in the input
    pub name: String,
    /// Canonical form used for lookups
    pub key: String,
    pub parent: Option<NodeId>,
    children: Vec<NodeId>,
    child_lookup: FxHashMap<String, NodeId>,
}

impl TreeNode {
    fn new(level: usize, name: &str, parent: Option<NodeId>) -> Self {
        Self {
            level,
            name: name.trim().to_string(),
            key: canonical(name),
            parent,
            children: Vec::new(),
            child_lookup: FxHashMap::default(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
pub struct AdminTree {
    nodes: Vec<TreeNode>,
    depth: usize,
}

impl AdminTree {
    /// Create an empty tree holding `depth` levels below the root
    pub fn new(depth: usize) -> Self {
        Self {
            nodes: vec![TreeNode::new(0, "", None)],
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of real nodes (the root is not counted)
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id as usize]
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT as usize]
    }

    /// Find a child of `parent` by name, case-insensitively
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent).child_lookup.get(&canonical(name)).copied()
    }

    /// Find or create a child of `parent`. Returns the id and whether the
    /// node was newly created.
    pub fn child_or_insert(&mut self, parent: NodeId, name: &str) -> (NodeId, bool) {
        let key = canonical(name);
        if let Some(&id) = self.nodes[parent as usize].child_lookup.get(&key) {
            return (id, false);
        }

        let level = self.nodes[parent as usize].level + 1;
        let id = self.nodes.len() as NodeId;
        self.nodes.push(TreeNode::new(level, name, Some(parent)));

        let parent_node = &mut self.nodes[parent as usize];
        parent_node.children.push(id);
        parent_node.child_lookup.insert(key, id);
        (id, true)
    }

    /// Resolve a top-down path of names to a node
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        path.iter()
            .try_fold(ROOT, |parent, name| self.child(parent, name.as_ref()))
    }

    /// Count real nodes per level; index 0 is the top input level
    pub fn nodes_per_level(&self) -> Vec<usize> {
        let mut counts = vec![0; self.depth];
        for node in self.nodes.iter().skip(1) {
            if let Some(slot) = counts.get_mut(node.level - 1) {
                *slot += 1;
            }
        }
        counts
    }
}
