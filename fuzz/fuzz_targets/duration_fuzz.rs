//! Fuzz test for Prometheus duration parsing
//!
//! Any string that parses must print canonically and re-parse to the same value.
//!
//! Run with: cargo +nightly fuzz run duration_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrapegen_core::PromDuration;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(d) = input.parse::<PromDuration>() {
        let printed = d.to_string();
        let back: PromDuration = printed.parse().expect("canonical form re-parses");
        assert_eq!(back, d);
    }
});
