//! scrapegen Test Utilities
//!
//! Centralized test infrastructure for the scrapegen workspace:
//! - Proptest generators for monitoring targets and their parts
//! - A fluent builder for hand-written targets
//! - Test fixtures for common scenarios
//! - Custom assertions for compiled rule lists

// Re-export core types for convenience
pub use scrapegen_core::{
    is_reserved_label, CompileError, CompileResult, Endpoint, JobSpec, LabelMapping,
    LabelSelector, MonitoringTarget, PortSpec, PromDuration, Rule, SelectorRequirement,
};

// ============================================================================
// BUILDER
// ============================================================================

/// Fluent builder for [`MonitoringTarget`] values.
#[derive(Debug, Clone)]
pub struct TargetBuilder {
    target: MonitoringTarget,
}

impl TargetBuilder {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            target: MonitoringTarget {
                namespace: namespace.into(),
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn generation(mut self, generation: i64) -> Self {
        self.target.generation = generation;
        self
    }

    pub fn match_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.target
            .selector
            .match_labels
            .insert(key.into(), value.into());
        self
    }

    pub fn expression(mut self, key: &str, operator: &str, values: &[&str]) -> Self {
        self.target
            .selector
            .match_expressions
            .push(SelectorRequirement::new(key, operator, values));
        self
    }

    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.target.endpoints.push(endpoint);
        self
    }

    /// Add an endpoint scraping the container port called `port`.
    pub fn named_endpoint(self, port: &str, interval: &str) -> Self {
        self.endpoint(fixtures::endpoint(PortSpec::named(port), interval))
    }

    /// Add an endpoint scraping port number `port`.
    pub fn numeric_endpoint(self, port: i32, interval: &str) -> Self {
        self.endpoint(fixtures::endpoint(PortSpec::number(port), interval))
    }

    pub fn target_label(mut self, from: &str, to: Option<&str>) -> Self {
        self.target.target_labels.push(LabelMapping::new(from, to));
        self
    }

    pub fn build(self) -> MonitoringTarget {
        self.target
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for monitoring targets.
    //!
    //! Every generated target is valid: it compiles without error.

    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    /// Kubernetes-style label key, possibly with characters that need sanitizing.
    pub fn arb_label_key() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9./-]{0,20}"
    }

    /// Label value free of regex metacharacters.
    pub fn arb_label_value() -> impl Strategy<Value = String> {
        "[a-z0-9]{1,12}"
    }

    /// Valid, non-reserved target label name.
    pub fn arb_target_label_name() -> impl Strategy<Value = String> {
        "[a-z_][a-z0-9_]{0,15}".prop_filter("reserved label", |s| !is_reserved_label(s))
    }

    pub fn arb_port_spec() -> impl Strategy<Value = PortSpec> {
        prop_oneof![
            "[a-z][a-z0-9-]{0,14}".prop_map(PortSpec::named),
            (1i32..=65535).prop_map(PortSpec::number),
        ]
    }

    pub fn arb_prom_duration() -> impl Strategy<Value = PromDuration> {
        (0u64..=10 * 365 * 24 * 3600 * 1000)
            .prop_filter_map("within Prometheus range", |ms| {
                PromDuration::try_from(Duration::from_millis(ms)).ok()
            })
    }

    /// Interval and timeout strings with timeout ≤ interval.
    pub fn arb_interval_timeout() -> impl Strategy<Value = (String, Option<String>)> {
        (
            prop::sample::select(vec!["10s", "15s", "30s", "1m", "1m30s", "5m"]),
            prop::option::of(prop::sample::select(vec!["1s", "5s", "10s"])),
        )
            .prop_map(|(interval, timeout)| {
                (interval.to_string(), timeout.map(str::to_string))
            })
    }

    pub fn arb_endpoint() -> impl Strategy<Value = Endpoint> {
        (
            arb_port_spec(),
            prop::option::of("/[a-z]{1,10}"),
            arb_interval_timeout(),
        )
            .prop_map(|(port, path, (interval, timeout))| Endpoint {
                port,
                path,
                interval,
                timeout,
            })
    }

    pub fn arb_selector_requirement() -> impl Strategy<Value = SelectorRequirement> {
        (
            arb_label_key(),
            prop::sample::select(vec!["In", "NotIn", "Exists", "DoesNotExist"]),
            prop::collection::vec(arb_label_value(), 1..4),
        )
            .prop_map(|(key, operator, values)| {
                let values = match operator {
                    "In" | "NotIn" => values,
                    _ => Vec::new(),
                };
                SelectorRequirement {
                    key,
                    operator: operator.to_string(),
                    values,
                }
            })
    }

    pub fn arb_label_selector() -> impl Strategy<Value = LabelSelector> {
        (
            prop::collection::hash_map(arb_label_key(), arb_label_value(), 0..5),
            prop::collection::vec(arb_selector_requirement(), 0..4),
        )
            .prop_map(|(match_labels, match_expressions)| LabelSelector {
                match_labels,
                match_expressions,
            })
    }

    pub fn arb_label_mapping() -> impl Strategy<Value = LabelMapping> {
        (
            arb_target_label_name(),
            prop::option::of(arb_target_label_name()),
        )
            .prop_map(|(from, to)| LabelMapping { from, to })
    }

    pub fn arb_monitoring_target() -> impl Strategy<Value = MonitoringTarget> {
        (
            "[a-z]([a-z0-9-]{0,14}[a-z0-9])?",
            "[a-z]([a-z0-9-]{0,14}[a-z0-9])?",
            0i64..1000,
            arb_label_selector(),
            prop::collection::vec(arb_endpoint(), 1..4),
            prop::collection::vec(arb_label_mapping(), 0..4),
        )
            .prop_map(
                |(namespace, name, generation, selector, endpoints, target_labels)| {
                    MonitoringTarget {
                        namespace,
                        name,
                        generation,
                        selector,
                        endpoints,
                        target_labels,
                    }
                },
            )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// A single valid `PodMonitoring` manifest.
    pub const POD_MONITORING_YAML: &str = r#"apiVersion: monitoring.googleapis.com/v1alpha1
kind: PodMonitoring
metadata:
  name: app
  namespace: ns1
  generation: 2
spec:
  selector:
    matchLabels:
      app: x
  endpoints:
  - port: web
    interval: 30s
"#;

    pub fn endpoint(port: PortSpec, interval: &str) -> Endpoint {
        Endpoint {
            port,
            path: None,
            interval: interval.to_string(),
            timeout: None,
        }
    }

    /// `{ns1, app, {app: x}, [{port: web, interval: 30s}]}`
    pub fn minimal_target() -> MonitoringTarget {
        TargetBuilder::new("ns1", "app")
            .match_label("app", "x")
            .named_endpoint("web", "30s")
            .build()
    }

    /// Target exercising every selector operator, both port kinds and label mappings.
    pub fn full_target() -> MonitoringTarget {
        TargetBuilder::new("prod", "frontend")
            .generation(4)
            .match_label("app.kubernetes.io/name", "frontend")
            .match_label("tier", "web")
            .expression("env", "In", &["prod", "staging"])
            .expression("canary", "NotIn", &["true"])
            .expression("team", "Exists", &[])
            .expression("legacy", "DoesNotExist", &[])
            .named_endpoint("metrics", "30s")
            .numeric_endpoint(9090, "1m")
            .target_label("team", None)
            .target_label("app.kubernetes.io/version", Some("version"))
            .build()
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for compiled output.

    use super::*;

    /// Assert that a CompileResult is Ok.
    #[track_caller]
    pub fn assert_compile_ok<T: std::fmt::Debug>(result: &CompileResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a CompileResult is Err.
    #[track_caller]
    pub fn assert_compile_err<T: std::fmt::Debug>(result: &CompileResult<T>) {
        assert!(result.is_err(), "Expected Err, got Ok: {:?}", result);
    }

    /// Assert the sequence of rule actions.
    #[track_caller]
    pub fn assert_actions(rules: &[Rule], expected: &[&str]) {
        let actions: Vec<&str> = rules.iter().map(Rule::action).collect();
        assert_eq!(actions, expected, "rule actions differ");
    }

    /// Assert that the first rule keeps only targets of `namespace`.
    #[track_caller]
    pub fn assert_namespace_filter_first(job: &JobSpec, namespace: &str) {
        match job.relabel_configs.first() {
            Some(Rule::Keep {
                source_labels,
                regex,
            }) => {
                assert_eq!(source_labels, &["__meta_kubernetes_namespace".to_string()]);
                assert_eq!(regex, namespace);
            }
            other => panic!("Expected namespace Keep rule first, got: {:?}", other),
        }
    }

    /// Assert no Replace rule writes a reserved label, apart from the
    /// compiler's own identity rules.
    #[track_caller]
    pub fn assert_mappings_avoid_reserved(job: &JobSpec, mapping_count: usize) {
        let start = job.relabel_configs.len().saturating_sub(mapping_count);
        for rule in &job.relabel_configs[start..] {
            if let Some(target) = rule.target_label() {
                assert!(
                    !is_reserved_label(target),
                    "mapping writes reserved label {:?}",
                    target
                );
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
