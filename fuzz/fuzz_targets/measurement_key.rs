#![no_main]

use libfuzzer_sys::fuzz_target;
use etna_speedups::results::MeasurementKey;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing must never panic; accepted keys must render back unchanged
        if let Ok(key) = MeasurementKey::parse(input) {
            assert_eq!(key.to_string(), input);
        }
    }
});
