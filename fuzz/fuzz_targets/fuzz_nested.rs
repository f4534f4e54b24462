#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let nested = ["Items", "Rewards"];
    let pairs = tabula::parse_nested_pairs(data, "#", "_", &nested);
    for pair in &pairs {
        assert!(!pair.key.contains('#'));
    }

    let groups = tabula::parse_nested_groups(data, "#", "_", ";", &nested);
    assert!(!groups.is_empty());
});
