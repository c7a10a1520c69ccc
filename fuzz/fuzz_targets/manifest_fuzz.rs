//! Fuzz test for the manifest loader and compiler
//!
//! Feeds arbitrary text through load → compile → render and checks that:
//! - Nothing panics
//! - Successful compilation always yields one job per endpoint
//! - Rendering a compiled target never fails
//!
//! Run with: cargo +nightly fuzz run manifest_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrapegen_compiler::{
    compile_endpoints, load_manifests, render_yaml, scrape_configs, CompileOptions,
    OperatorPolicy, ScrapeCompiler,
};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(targets) = load_manifests(input) else {
        return;
    };

    let lenient = ScrapeCompiler::new(CompileOptions {
        unknown_operators: OperatorPolicy::Ignore,
    });

    for target in &targets {
        let per_endpoint = compile_endpoints(target);
        assert_eq!(per_endpoint.len(), target.endpoints.len());

        match scrape_configs(target) {
            Ok(jobs) => {
                assert_eq!(jobs.len(), target.endpoints.len());
                assert!(per_endpoint.iter().all(|r| r.is_ok()));
                render_yaml(&jobs).expect("compiled jobs always render");
                // Anything the strict compiler accepts, the lenient one accepts too.
                assert_eq!(lenient.scrape_configs(target).as_ref(), Ok(&jobs));
            }
            Err(err) => {
                assert!(!err.to_string().is_empty());
            }
        }
    }
});
