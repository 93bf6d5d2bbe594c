#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lodex::index::{LevelSchema, LocationIndex, RawRow};

#[derive(Arbitrary, Debug)]
struct Input {
    rows: Vec<[String; 5]>,
    query: String,
    limit: u8,
}

fuzz_target!(|input: Input| {
    let rows: Vec<RawRow> = input.rows.into_iter().map(RawRow::new).collect();
    let Ok(index) = LocationIndex::from_rows(&LevelSchema::uganda(), &rows) else {
        return;
    };

    let results = index.search(&input.query, input.limit as usize);
    assert!(results.len() <= input.limit as usize);
    let _ = index.path(&input.query);
});
