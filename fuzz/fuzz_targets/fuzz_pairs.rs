#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let pairs = tabula::parse_pairs(data, "#", "_");
    for pair in &pairs {
        assert!(!pair.key.contains('#'));
        assert!(!pair.key.contains('_'));
        assert!(!pair.value.contains('#'));
    }
});
