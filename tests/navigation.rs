//! Integration tests for loading a dataset and navigating the index.

use lodex::index::{IndexConfig, LevelSchema, LocationIndex, RawRow, PATH_SEPARATOR};
use lodex::utils::{Dataset, HeaderMode};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ug_sample.csv")
}

fn fixture_index() -> LocationIndex {
    LocationIndex::open(&fixture_path(), &IndexConfig::default()).expect("fixture should load")
}

fn rows(data: &[[&str; 5]]) -> Vec<RawRow> {
    data.iter().map(|r| RawRow::new(r.iter().copied())).collect()
}

#[test]
fn test_fixture_header_with_carriage_return_resolves() {
    let bytes = fs::read(fixture_path()).unwrap();
    let dataset = Dataset::parse(&bytes, &LevelSchema::uganda()).unwrap();
    assert_eq!(dataset.header_mode(), HeaderMode::Named);
    assert_eq!(dataset.rows()[0].field(2), "BUHANIKA");
}

#[test]
fn test_top_level_units_sorted() {
    let index = fixture_index();
    assert_eq!(index.top_level_units(), ["APAC", "ARUA", "HOIMA"]);
}

#[test]
fn test_second_level_units_are_prefixed_by_top() {
    let index = fixture_index();
    for top in index.top_level_units() {
        let seconds = index.second_level_units(top);
        assert!(!seconds.is_empty());
        for second in &seconds {
            // Every listed unit has at least one third-level child under this top
            assert!(
                !index.third_level_units(top, second).is_empty(),
                "{} / {} has no third-level units",
                top,
                second
            );
        }
    }
    assert_eq!(index.second_level_units("apac"), vec!["ABONGOMOLA", "ADUKU"]);
}

#[test]
fn test_leaf_units_resolve_back_to_their_ancestors() {
    let index = fixture_index();
    for top in index.top_level_units() {
        for second in index.second_level_units(top) {
            for third in index.third_level_units(top, &second) {
                for leaf in index.leaf_units(top, &second, third) {
                    let matches = index.records_named(leaf);
                    assert!(matches.iter().any(|r| {
                        r.top_level.eq_ignore_ascii_case(top)
                            && r.second_level.eq_ignore_ascii_case(&second)
                            && r.third_level.eq_ignore_ascii_case(third)
                    }));
                }
            }
        }
    }
}

#[test]
fn test_record_by_leaf_matches_listing_for_unique_names() {
    let index = fixture_index();
    for leaf in index.leaf_units("apac", "aduku", "aduku town") {
        let record = index.record_by_leaf(leaf).unwrap();
        assert_eq!(record.top_level, "APAC");
        assert_eq!(record.second_level, "ADUKU");
        assert_eq!(record.third_level, "ADUKU TOWN");
        assert_eq!(record.electoral_tag.as_deref(), Some("KWANIA COUNTY"));
    }
}

#[test]
fn test_path_consistent_with_record() {
    let index = fixture_index();
    for name in ["KIKONDO", "aduku central", "Alyec", "NONEXISTENT"] {
        match index.record_by_leaf(name) {
            Some(record) => {
                let expected = [
                    record.top_level.as_str(),
                    record.second_level.as_str(),
                    record.third_level.as_str(),
                    record.leaf.as_str(),
                ]
                .join(PATH_SEPARATOR);
                assert_eq!(index.path(name), Some(expected));
            }
            None => assert!(index.path(name).is_none()),
        }
    }
    assert_eq!(
        index.path("alyec").as_deref(),
        Some("APAC → ABONGOMOLA → ALYECMEDA → ALYEC")
    );
}

#[test]
fn test_nonexistent_leaf() {
    let index = fixture_index();
    assert!(index.record_by_leaf("NONEXISTENT").is_none());
    assert!(index.parent("NONEXISTENT").is_none());
    assert!(index.records_named("NONEXISTENT").is_empty());
}

#[test]
fn test_carry_forward_inherits_all_context() {
    let schema = LevelSchema::positional(["L0", "L1", "L2", "L3", "L4"]);
    let index = LocationIndex::from_rows(
        &schema,
        &rows(&[["A", "C1", "S1", "P1", "V1"], ["", "", "", "", "V2"]]),
    )
    .unwrap();
    assert_eq!(index.leaf_units("A", "C1", "S1"), ["V1", "V2"]);
}

#[test]
fn test_build_is_idempotent() {
    let first = fixture_index();
    let second = fixture_index();
    assert_eq!(first.top_level_units(), second.top_level_units());
    assert_eq!(first.stats(), second.stats());
}

#[test]
fn test_ingest_stats_for_fixture() {
    let stats = fixture_index().stats().clone();
    assert_eq!(stats.ingest.rows_read, 12);
    assert_eq!(stats.ingest.blank_rows, 1);
    assert_eq!(stats.ingest.rows_dropped, 0);
    assert_eq!(stats.records, 11);
    // KASAMBYA I appears under two different parishes
    assert_eq!(stats.leaf_name_collisions, 1);
}

#[test]
fn test_leaf_name_collision_is_last_write_wins() {
    let index = fixture_index();
    let record = index.record_by_leaf("KASAMBYA I").unwrap();
    assert_eq!(record.third_level, "MPARANGASI");

    let exact = index
        .record_at("hoima", "buhanika", "katereiga", "kasambya i")
        .unwrap();
    assert_eq!(exact.second_level, "BUHANIKA");
    assert_eq!(index.records_named("kasambya i").len(), 2);
}

#[test]
fn test_search_respects_limit_and_matches_query() {
    let index = fixture_index();
    for (query, limit) in [("a", 3), ("kasambya", 5), ("hoima", 2), ("aduku", 5)] {
        let results = index.search(query, limit);
        assert!(results.len() <= limit);
        let needle = query.to_uppercase();
        for record in &results {
            assert!(
                [
                    &record.leaf,
                    &record.third_level,
                    &record.second_level,
                    &record.top_level
                ]
                .iter()
                .any(|name| name.to_uppercase().contains(&needle)),
                "{:?} does not contain {}",
                record,
                query
            );
        }
    }
}

#[test]
fn test_search_aduku_ranking() {
    let index = fixture_index();
    let results = index.search("aduku", 5);
    assert!(results.len() <= 5);

    let leaves: Vec<&str> = results.iter().map(|r| r.leaf.as_str()).collect();
    assert_eq!(leaves, ["ADUKU", "ADUKU CENTRAL", "AKALI", "OBER ADUKU"]);

    let substring_only = leaves.iter().position(|&l| l == "OBER ADUKU").unwrap();
    for (i, record) in results.iter().enumerate() {
        if record.second_level == "ADUKU" {
            assert!(i < substring_only);
        }
    }
}

#[test]
fn test_search_empty_query() {
    let index = fixture_index();
    assert!(index.search("", 10).is_empty());
    assert!(index.search("   ", 10).is_empty());
    assert!(index.search("aduku", 0).is_empty());
}

#[test]
fn test_children_reach_unprojected_levels() {
    let index = fixture_index();
    assert_eq!(
        index.children(&["HOIMA"]),
        vec!["BUGAHYA COUNTY", "HOIMA MUNICIPALITY"]
    );
    assert_eq!(
        index.children(&["apac", "kwania county"]),
        vec!["ADUKU", "ABONGOMOLA"]
    );
}

#[test]
fn test_open_missing_file_fails_with_context() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.csv");
    let err = LocationIndex::open(&missing, &IndexConfig::default())
        .err()
        .expect("missing dataset must fail");
    assert!(format!("{:#}", err).contains("absent.csv"));
}

#[test]
fn test_open_headerless_file_reads_positionally() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.csv");
    fs::write(&path, "A,C1,S1,P1,V1\n,,,,V2\n,,,P2,V3\n").unwrap();

    let index = LocationIndex::open(&path, &IndexConfig::default()).unwrap();
    assert_eq!(index.top_level_units(), ["A"]);
    assert_eq!(index.leaf_units("A", "S1", "P1"), ["V1", "V2"]);
    assert_eq!(index.leaf_units("A", "S1", "P2"), ["V3"]);
    assert_eq!(
        index.record_by_leaf("v3").unwrap().electoral_tag.as_deref(),
        Some("C1")
    );
}
