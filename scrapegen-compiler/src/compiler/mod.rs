//! Scrape Compiler - Transform monitoring targets into scrape jobs
//!
//! Each endpoint of a target compiles to one [`JobSpec`] whose relabel rules
//! are assembled from fixed pipeline stages. Rule order is load-bearing: the
//! collector applies rules top to bottom and later Replace rules overwrite
//! earlier ones.
//!
//! # Pipeline
//!
//! ```text
//! MonitoringTarget → Validator → Selector rules → Identity rules
//!                                                      ↓
//!                          JobSpec ← Label mappings ← Port rules
//! ```

mod mapping;
mod port;
mod selector;

pub use mapping::compile_label_mappings;
pub use port::{port_rules, resolve_port, ResolvedPort};
pub use selector::{compile_selector, identity_rules, SelectorOperator};

use crate::validator::validate_endpoint;
use scrapegen_core::labels::META_POD_LABEL_PREFIX;
use scrapegen_core::{
    CompileError, CompileResult, DiscoveryConfig, JobSpec, MonitoringTarget, KIND_POD_MONITORING,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// OPTIONS
// ============================================================================

/// How selector expressions with an unrecognized operator are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorPolicy {
    /// Fail compilation with [`CompileError::UnsupportedOperator`].
    #[default]
    Reject,
    /// Skip the expression. The target then selects more pods than declared.
    Ignore,
}

/// Compiler settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub unknown_operators: OperatorPolicy,
}

// ============================================================================
// COMPILER
// ============================================================================

/// Compiles monitoring targets into scrape jobs.
///
/// Stateless apart from its options; one instance can serve any number of
/// targets, from any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrapeCompiler {
    options: CompileOptions,
}

impl ScrapeCompiler {
    /// Create a compiler with the given options.
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compile the endpoint at `index` into one scrape job.
    pub fn compile_endpoint(
        &self,
        target: &MonitoringTarget,
        index: usize,
    ) -> CompileResult<JobSpec> {
        let endpoint = target
            .endpoints
            .get(index)
            .ok_or(CompileError::EndpointOutOfRange {
                endpoint: index,
                count: target.endpoints.len(),
            })?;

        let validated = validate_endpoint(index, endpoint)?;

        let mut relabel_configs = compile_selector(
            &target.selector,
            &target.namespace,
            self.options.unknown_operators,
        )?;
        relabel_configs.extend(identity_rules(&target.name)?);
        relabel_configs.extend(port_rules(&validated.port));
        relabel_configs.extend(compile_label_mappings(
            index,
            &target.target_labels,
            META_POD_LABEL_PREFIX,
        )?);

        Ok(JobSpec {
            job_name: job_name(target, &validated.port),
            discovery: DiscoveryConfig::same_node(),
            metrics_path: endpoint.metrics_path().to_string(),
            scrape_interval: validated.interval,
            scrape_timeout: validated.timeout,
            relabel_configs,
        })
    }

    /// Compile every endpoint independently. A failing endpoint does not
    /// affect the others.
    pub fn compile_endpoints(&self, target: &MonitoringTarget) -> Vec<CompileResult<JobSpec>> {
        (0..target.endpoints.len())
            .map(|i| self.compile_endpoint(target, i))
            .collect()
    }

    /// Compile every endpoint, failing on the first error.
    pub fn scrape_configs(&self, target: &MonitoringTarget) -> CompileResult<Vec<JobSpec>> {
        if target.endpoints.is_empty() {
            return Err(CompileError::NoEndpoints);
        }
        self.compile_endpoints(target).into_iter().collect()
    }
}

/// Job name for one endpoint: `PodMonitoring/<namespace>/<name>/<port>`.
pub fn job_name(target: &MonitoringTarget, port: &ResolvedPort) -> String {
    format!(
        "{}/{}/{}/{}",
        KIND_POD_MONITORING, target.namespace, target.name, port
    )
}

/// [`ScrapeCompiler::compile_endpoint`] with default options.
pub fn compile_endpoint(target: &MonitoringTarget, index: usize) -> CompileResult<JobSpec> {
    ScrapeCompiler::default().compile_endpoint(target, index)
}

/// [`ScrapeCompiler::compile_endpoints`] with default options.
pub fn compile_endpoints(target: &MonitoringTarget) -> Vec<CompileResult<JobSpec>> {
    ScrapeCompiler::default().compile_endpoints(target)
}

/// [`ScrapeCompiler::scrape_configs`] with default options.
pub fn scrape_configs(target: &MonitoringTarget) -> CompileResult<Vec<JobSpec>> {
    ScrapeCompiler::default().scrape_configs(target)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scrapegen_core::{
        DurationField, Endpoint, LabelMapping, LabelSelector, PortSpec, PromDuration, Rule,
        SelectorRequirement,
    };
    use std::collections::HashMap;
    use std::time::Duration;

    fn endpoint(port: PortSpec, interval: &str) -> Endpoint {
        Endpoint {
            port,
            path: None,
            interval: interval.to_string(),
            timeout: None,
        }
    }

    fn target(endpoints: Vec<Endpoint>) -> MonitoringTarget {
        MonitoringTarget {
            namespace: "ns1".to_string(),
            name: "app".to_string(),
            generation: 1,
            selector: LabelSelector {
                match_labels: HashMap::from([("app".to_string(), "x".to_string())]),
                match_expressions: vec![],
            },
            endpoints,
            target_labels: vec![],
        }
    }

    fn keep(label: &str, regex: &str) -> Rule {
        Rule::Keep {
            source_labels: vec![label.to_string()],
            regex: regex.to_string(),
        }
    }

    #[test]
    fn test_end_to_end_named_port() {
        let t = target(vec![endpoint(PortSpec::named("web"), "30s")]);
        let job = compile_endpoint(&t, 0).unwrap();

        assert_eq!(job.job_name, "PodMonitoring/ns1/app/web");
        assert_eq!(job.metrics_path, "/metrics");
        assert_eq!(job.scrape_interval.to_string(), "30s");
        assert_eq!(job.scrape_timeout.to_string(), "30s");
        assert_eq!(job.discovery.field_selector, "spec.nodeName=$(NODE_NAME)");
        assert_eq!(
            job.relabel_configs,
            vec![
                keep("__meta_kubernetes_namespace", "ns1"),
                keep("__meta_kubernetes_pod_label_app", "x"),
                Rule::Replace {
                    source_labels: vec!["__meta_kubernetes_namespace".to_string()],
                    regex: None,
                    replacement: None,
                    target_label: "namespace".to_string(),
                },
                Rule::Replace {
                    source_labels: vec![],
                    regex: None,
                    replacement: Some("app".to_string()),
                    target_label: "job".to_string(),
                },
                keep("__meta_kubernetes_pod_container_port_name", "web"),
                Rule::Replace {
                    source_labels: vec![
                        "__meta_kubernetes_pod_name".to_string(),
                        "__meta_kubernetes_pod_container_port_name".to_string(),
                    ],
                    regex: Some("(.+);(.+)".to_string()),
                    replacement: Some("$1:$2".to_string()),
                    target_label: "instance".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_label_mappings_come_last() {
        let mut t = target(vec![endpoint(PortSpec::number(8080), "10s")]);
        t.target_labels = vec![LabelMapping::new("team", None)];
        let job = compile_endpoint(&t, 0).unwrap();

        assert_eq!(job.job_name, "PodMonitoring/ns1/app/8080");
        let last = job.relabel_configs.last().unwrap();
        assert_eq!(last.target_label(), Some("team"));
        assert_eq!(
            last.source_labels(),
            ["__meta_kubernetes_pod_label_team".to_string()]
        );
    }

    #[test]
    fn test_endpoint_out_of_range() {
        let t = target(vec![endpoint(PortSpec::named("web"), "30s")]);
        assert_eq!(
            compile_endpoint(&t, 1),
            Err(CompileError::EndpointOutOfRange {
                endpoint: 1,
                count: 1
            })
        );
    }

    #[test]
    fn test_endpoints_compile_in_isolation() {
        let t = target(vec![
            endpoint(PortSpec::named("web"), "30s"),
            endpoint(PortSpec::default(), "30s"),
            endpoint(PortSpec::number(9090), "bogus"),
        ]);
        let results = compile_endpoints(&t);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(CompileError::MissingPort { endpoint: 1 }));
        assert!(matches!(
            results[2],
            Err(CompileError::InvalidDuration {
                endpoint: 2,
                field: DurationField::Interval,
                ..
            })
        ));

        assert_eq!(scrape_configs(&t), Err(CompileError::MissingPort { endpoint: 1 }));
    }

    #[test]
    fn test_scrape_configs_requires_endpoints() {
        let t = target(vec![]);
        assert_eq!(scrape_configs(&t), Err(CompileError::NoEndpoints));
        assert!(compile_endpoints(&t).is_empty());
    }

    #[test]
    fn test_timeout_bound() {
        let mut ep = endpoint(PortSpec::named("web"), "30s");
        ep.timeout = Some("45s".to_string());
        let err = compile_endpoint(&target(vec![ep]), 0).unwrap_err();
        assert_eq!(
            err,
            CompileError::TimeoutExceedsInterval {
                endpoint: 0,
                timeout: PromDuration::try_from(Duration::from_secs(45)).unwrap(),
                interval: PromDuration::try_from(Duration::from_secs(30)).unwrap(),
            }
        );
    }

    #[test]
    fn test_operator_policy_is_applied() {
        let mut t = target(vec![endpoint(PortSpec::named("web"), "30s")]);
        t.selector
            .match_expressions
            .push(SelectorRequirement::new("tier", "Gt", &["1"]));

        assert!(matches!(
            scrape_configs(&t),
            Err(CompileError::UnsupportedOperator { .. })
        ));

        let lenient = ScrapeCompiler::new(CompileOptions {
            unknown_operators: OperatorPolicy::Ignore,
        });
        let jobs = lenient.scrape_configs(&t).unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_operator_policy_serde() {
        let p: OperatorPolicy = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(p, OperatorPolicy::Ignore);
        assert_eq!(OperatorPolicy::default(), OperatorPolicy::Reject);
    }
}
