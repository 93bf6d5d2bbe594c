#![no_main]

use libfuzzer_sys::fuzz_target;
use lodex::index::{IndexConfig, LocationIndex};
use lodex::utils::Dataset;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either fail header resolution or build an index
    let config = IndexConfig::default();
    if let Ok(dataset) = Dataset::parse(data, &config.schema) {
        let Ok(index) = LocationIndex::from_rows_with_config(&config, dataset.rows()) else {
            return;
        };
        for top in index.top_level_units() {
            let _ = index.second_level_units(top);
        }
    }
});
