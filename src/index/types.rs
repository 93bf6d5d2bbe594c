use crate::query::scorer::ScoringWeights;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Index of a node in the administrative tree arena
pub type NodeId = u32;

/// Position of a record in the record table
pub type RecordId = u32;

/// Separator between ancestor names in a composite key
pub const KEY_DELIMITER: &str = "||";

/// Character the delimiter is made of. Rows with it in any field are
/// rejected at ingestion, so keys always split back into the same names.
pub const RESERVED_CHAR: char = '|';

/// Separator used when rendering a human-readable path
pub const PATH_SEPARATOR: &str = " → ";

/// Names of the hierarchy levels, top to leaf, and which of them fill the
/// four structural slots of a [`LocationRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSchema {
    /// Level (column) names from the top of a row down to the leaf
    pub levels: Vec<String>,
    /// Level projected into `topLevel`
    pub top: usize,
    /// Level projected into `secondLevel`
    pub second: usize,
    /// Level projected into `thirdLevel`
    pub third: usize,
    /// Level attached to records as the electoral tag, outside the navigation slots
    #[serde(default)]
    pub tag: Option<usize>,
}

impl Default for LevelSchema {
    fn default() -> Self {
        Self::uganda()
    }
}

impl LevelSchema {
    /// District → constituency → subcounty/division → parish/ward → village/cell.
    ///
    /// The navigation slots skip the constituency column: top is the district,
    /// second the subcounty/division and third the parish/ward. The
    /// constituency is carried on each record as the electoral tag and is
    /// reachable through `LocationIndex::children`. Use [`positional`](Self::positional)
    /// when the first three columns should be the slots.
    pub fn uganda() -> Self {
        Self {
            levels: vec![
                "District".to_string(),
                "Constituency".to_string(),
                "Subcounty/Division".to_string(),
                "Parish/Ward".to_string(),
                "Village/Cell".to_string(),
            ],
            top: 0,
            second: 2,
            third: 3,
            tag: Some(1),
        }
    }

    /// Schema whose first three levels are the top/second/third slots and
    /// whose last level is the leaf. Needs at least four names.
    pub fn positional<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
            top: 0,
            second: 1,
            third: 2,
            tag: None,
        }
    }

    /// Number of levels in an input row
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Index of the leaf level (always the last one)
    pub fn leaf(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.levels.len() < 4 {
            bail!(
                "schema needs at least 4 levels (top, second, third, leaf), got {}",
                self.levels.len()
            );
        }
        if let Some(name) = self.levels.iter().find(|n| n.trim().is_empty()) {
            bail!("schema level names must not be blank (got {:?})", name);
        }
        let leaf = self.leaf();
        if !(self.top < self.second && self.second < self.third && self.third < leaf) {
            bail!(
                "schema slots must satisfy top < second < third < leaf, got {} / {} / {} / {}",
                self.top,
                self.second,
                self.third,
                leaf
            );
        }
        if let Some(tag) = self.tag {
            if tag >= leaf || tag == self.top || tag == self.second || tag == self.third {
                bail!("tag level {} must be a non-structural level above the leaf", tag);
            }
        }
        Ok(())
    }
}

/// A fully-resolved path to one leaf unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub leaf: String,
    pub third_level: String,
    pub second_level: String,
    pub top_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electoral_tag: Option<String>,
}

impl LocationRecord {
    /// `TOP → SECOND → THIRD → LEAF`
    pub fn path(&self) -> String {
        [
            self.top_level.as_str(),
            self.second_level.as_str(),
            self.third_level.as_str(),
            self.leaf.as_str(),
        ]
        .join(PATH_SEPARATOR)
    }

    pub fn parent(&self) -> ParentUnits {
        ParentUnits {
            third_level: self.third_level.clone(),
            second_level: self.second_level.clone(),
            top_level: self.top_level.clone(),
        }
    }
}

/// The immediate ancestry of a leaf, without the leaf itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentUnits {
    pub third_level: String,
    pub second_level: String,
    pub top_level: String,
}

/// Canonical (uppercase) forms of a record's four names, used for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub leaf: String,
    pub third: String,
    pub second: String,
    pub top: String,
}

impl RecordKey {
    pub fn from_record(record: &LocationRecord) -> Self {
        Self {
            leaf: canonical(&record.leaf),
            third: canonical(&record.third_level),
            second: canonical(&record.second_level),
            top: canonical(&record.top_level),
        }
    }
}

/// Configuration for building and querying an index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub schema: LevelSchema,
    /// Scoring weights for search result ranking
    pub scoring_weights: ScoringWeights,
    /// Result count used when a caller gives no limit
    pub default_limit: usize,
    /// Matches collected per requested result before the scan stops
    pub overcollect_factor: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            schema: LevelSchema::default(),
            scoring_weights: ScoringWeights::default(),
            default_limit: 50,
            overcollect_factor: 3,
        }
    }
}

/// Canonical comparison form of a unit name: trimmed and uppercased
#[inline]
pub fn canonical(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Join canonicalized names with [`KEY_DELIMITER`]
pub fn composite_key(names: &[&str]) -> String {
    let mut key = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            key.push_str(KEY_DELIMITER);
        }
        key.push_str(&canonical(name));
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key(&["Hoima", " buhanika "]), "HOIMA||BUHANIKA");
        assert_eq!(composite_key(&["x"]), "X");
        assert_eq!(composite_key(&[]), "");
    }

    #[test]
    fn test_default_schema_is_valid() {
        let schema = LevelSchema::default();
        schema.validate().unwrap();
        assert_eq!(schema.depth(), 5);
        assert_eq!(schema.leaf(), 4);
        assert_eq!(schema.tag, Some(1));
    }

    #[test]
    fn test_uganda_slots_skip_constituency() {
        let schema = LevelSchema::uganda();
        let name = |i: usize| schema.levels[i].as_str();
        assert_eq!(name(schema.top), "District");
        assert_eq!(name(schema.second), "Subcounty/Division");
        assert_eq!(name(schema.third), "Parish/Ward");
        assert_eq!(schema.tag.map(name), Some("Constituency"));
    }

    #[test]
    fn test_schema_rejects_bad_slots() {
        let mut schema = LevelSchema::uganda();
        schema.second = 0;
        assert!(schema.validate().is_err());

        let mut schema = LevelSchema::uganda();
        schema.tag = Some(2);
        assert!(schema.validate().is_err());

        let schema = LevelSchema::positional(["A", "B", "C"]);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_record_path_and_parent() {
        let record = LocationRecord {
            leaf: "KASAMBYA I".to_string(),
            third_level: "KATEREIGA".to_string(),
            second_level: "BUHANIKA".to_string(),
            top_level: "HOIMA".to_string(),
            electoral_tag: None,
        };
        assert_eq!(record.path(), "HOIMA → BUHANIKA → KATEREIGA → KASAMBYA I");
        assert_eq!(record.parent().third_level, "KATEREIGA");
    }

    #[test]
    fn test_record_serialization_omits_missing_tag() {
        let record = LocationRecord {
            leaf: "V".to_string(),
            third_level: "P".to_string(),
            second_level: "S".to_string(),
            top_level: "D".to_string(),
            electoral_tag: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"thirdLevel\":\"P\""));
        assert!(!json.contains("electoralTag"));
    }

    #[test]
    fn test_index_config_partial_json() {
        let config: IndexConfig = serde_json::from_str(r#"{"default_limit": 10}"#).unwrap();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.overcollect_factor, 3);
        assert_eq!(config.schema, LevelSchema::uganda());
    }
}
