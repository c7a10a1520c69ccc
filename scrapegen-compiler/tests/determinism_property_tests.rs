//! Property-Based Tests for Compiler Determinism
//!
//! Property: For any valid monitoring target, compiling twice SHALL produce
//! identical jobs and byte-identical rendered output, independent of the
//! insertion order of exact-match selector labels.
//!
//! This validates:
//! - Exact-match labels are emitted in sorted key order
//! - Stage order is fixed (namespace filter first, mappings last)
//! - Fingerprints only change when the configuration changes

use proptest::prelude::*;
use scrapegen_compiler::{fingerprint, render_yaml, scrape_configs, validate_create};
use scrapegen_core::{LabelSelector, MonitoringTarget};
use scrapegen_test_utils::assertions::{
    assert_mappings_avoid_reserved, assert_namespace_filter_first,
};
use scrapegen_test_utils::generators::arb_monitoring_target;
use std::collections::HashMap;

/// Rebuild the selector map inserting keys in reverse sorted order.
fn reinserted(target: &MonitoringTarget) -> MonitoringTarget {
    let mut keys: Vec<&String> = target.selector.match_labels.keys().collect();
    keys.sort();
    keys.reverse();

    let mut match_labels = HashMap::new();
    for key in keys {
        match_labels.insert(key.clone(), target.selector.match_labels[key].clone());
    }

    MonitoringTarget {
        selector: LabelSelector {
            match_labels,
            match_expressions: target.selector.match_expressions.clone(),
        },
        ..target.clone()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_generated_targets_compile(target in arb_monitoring_target()) {
        prop_assert!(validate_create(&target).is_ok());
        let jobs = scrape_configs(&target).unwrap();
        prop_assert_eq!(jobs.len(), target.endpoints.len());
    }

    #[test]
    fn prop_compilation_is_deterministic(target in arb_monitoring_target()) {
        let first = scrape_configs(&target).unwrap();
        let second = scrape_configs(&reinserted(&target)).unwrap();
        prop_assert_eq!(&first, &second);

        let a = render_yaml(&first).unwrap();
        let b = render_yaml(&second).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn prop_stage_boundaries(target in arb_monitoring_target()) {
        let jobs = scrape_configs(&target).unwrap();
        let selector_rules = 1
            + target.selector.match_labels.len()
            + target.selector.match_expressions.len();

        for job in &jobs {
            assert_namespace_filter_first(job, &target.namespace);
            assert_mappings_avoid_reserved(job, target.target_labels.len());

            prop_assert_eq!(
                job.relabel_configs.len(),
                selector_rules + 2 + 2 + target.target_labels.len()
            );
            prop_assert_eq!(job.relabel_configs[selector_rules].target_label(), Some("namespace"));
            prop_assert_eq!(job.relabel_configs[selector_rules + 1].target_label(), Some("job"));
            prop_assert!(job.scrape_timeout <= job.scrape_interval);
        }
    }
}
