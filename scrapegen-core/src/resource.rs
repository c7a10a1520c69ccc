//! The monitoring-target resource as the compiler sees it.
//!
//! These values are owned by whoever fetched the resource; the compiler only
//! ever borrows them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Metrics path used when an endpoint does not declare one.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Resource kind used in generated job names.
pub const KIND_POD_MONITORING: &str = "PodMonitoring";

/// A declarative description of which pods to scrape and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringTarget {
    pub namespace: String,
    pub name: String,
    /// Resource generation, echoed back as `observedGeneration` in status.
    #[serde(default)]
    pub generation: i64,
    #[serde(default)]
    pub selector: LabelSelector,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    /// Pod labels copied onto targets. Later entries win on conflict.
    #[serde(default)]
    pub target_labels: Vec<LabelMapping>,
}

/// Kubernetes-style label selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSelector {
    /// Exact-match labels. Iteration order is unspecified.
    #[serde(default)]
    pub match_labels: HashMap<String, String>,
    /// Set-based requirements, applied in declaration order.
    #[serde(default)]
    pub match_expressions: Vec<SelectorRequirement>,
}

/// One set-based selector expression.
///
/// The operator is kept as written in the resource so that unknown operators
/// reach the compiler, which decides how to treat them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorRequirement {
    pub key: String,
    pub operator: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl SelectorRequirement {
    pub fn new(key: impl Into<String>, operator: impl Into<String>, values: &[&str]) -> Self {
        Self {
            key: key.into(),
            operator: operator.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// One scrapeable port/path combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub port: PortSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl Endpoint {
    /// HTTP path to scrape, falling back to `/metrics`.
    pub fn metrics_path(&self) -> &str {
        match self.path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_METRICS_PATH,
        }
    }

    /// The declared timeout, treating an empty string as absent.
    pub fn timeout(&self) -> Option<&str> {
        self.timeout.as_deref().filter(|t| !t.is_empty())
    }
}

/// Port of an endpoint, by container port name or by number.
///
/// Both fields are kept so that a resource with both populated can be
/// represented; the name wins. In YAML/JSON a port is written as either a
/// string or an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IntOrString", into = "IntOrString")]
pub struct PortSpec {
    pub name: Option<String>,
    pub number: Option<i32>,
}

impl PortSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            number: None,
        }
    }

    pub fn number(number: i32) -> Self {
        Self {
            name: None,
            number: Some(number),
        }
    }

    /// The port name, if one is set and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// The port number, if one is set and non-zero.
    pub fn value(&self) -> Option<i32> {
        self.number.filter(|n| *n != 0)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.number) {
            (Some(name), _) => write!(f, "{}", name),
            (None, Some(n)) => write!(f, "{}", n),
            (None, None) => Ok(()),
        }
    }
}

/// Wire shape of a port: `port: web` or `port: 8080`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i32),
    String(String),
}

impl From<IntOrString> for PortSpec {
    fn from(v: IntOrString) -> Self {
        match v {
            IntOrString::Int(n) => PortSpec::number(n),
            IntOrString::String(s) => PortSpec::named(s),
        }
    }
}

impl From<PortSpec> for IntOrString {
    fn from(p: PortSpec) -> Self {
        match (p.name, p.number) {
            (Some(name), _) if !name.is_empty() => IntOrString::String(name),
            (_, Some(n)) => IntOrString::Int(n),
            _ => IntOrString::Int(0),
        }
    }
}

/// Copies a pod label onto scraped targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl LabelMapping {
    pub fn new(from: impl Into<String>, to: Option<&str>) -> Self {
        Self {
            from: from.into(),
            to: to.map(str::to_string),
        }
    }

    /// Target label name; defaults to `from` when `to` is absent or empty.
    pub fn target(&self) -> &str {
        match self.to.as_deref() {
            Some(to) if !to.is_empty() => to,
            _ => &self.from,
        }
    }
}
