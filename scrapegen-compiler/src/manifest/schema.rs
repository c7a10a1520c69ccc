//! Wire shape of a `PodMonitoring` object.
//!
//! `metadata` tolerates any extra field (labels, annotations, uid, ...) since
//! objects exported from a cluster carry them. `spec` is strict: a typo there
//! would silently change what gets scraped.

use scrapegen_core::{
    Endpoint, LabelMapping, LabelSelector, MonitoringTarget, PortSpec, SelectorRequirement,
};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct PodMonitoringManifest {
    #[serde(default, rename = "apiVersion")]
    _api_version: IgnoredAny,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Option<PodMonitoringSpec>,
    /// Controller-owned; accepted and ignored.
    #[serde(default, rename = "status")]
    _status: IgnoredAny,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ObjectMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub generation: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct PodMonitoringSpec {
    #[serde(default)]
    pub selector: SelectorSpec,
    #[serde(default)]
    pub endpoints: Vec<EndpointSpec>,
    #[serde(default)]
    pub target_labels: TargetLabelsSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct SelectorSpec {
    #[serde(default)]
    pub match_labels: HashMap<String, String>,
    #[serde(default)]
    pub match_expressions: Vec<RequirementSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RequirementSpec {
    pub key: String,
    pub operator: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EndpointSpec {
    #[serde(default)]
    pub port: PortSpec,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct TargetLabelsSpec {
    #[serde(default)]
    pub from_pod: Vec<MappingSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MappingSpec {
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
}

impl PodMonitoringSpec {
    /// Build the compiler's view of this object.
    pub fn into_target(self, namespace: String, name: String, generation: i64) -> MonitoringTarget {
        MonitoringTarget {
            namespace,
            name,
            generation,
            selector: LabelSelector {
                match_labels: self.selector.match_labels,
                match_expressions: self
                    .selector
                    .match_expressions
                    .into_iter()
                    .map(|r| SelectorRequirement {
                        key: r.key,
                        operator: r.operator,
                        values: r.values,
                    })
                    .collect(),
            },
            endpoints: self
                .endpoints
                .into_iter()
                .map(|e| Endpoint {
                    port: e.port,
                    path: e.path,
                    interval: e.interval.unwrap_or_default(),
                    timeout: e.timeout,
                })
                .collect(),
            target_labels: self
                .target_labels
                .from_pod
                .into_iter()
                .map(|m| LabelMapping {
                    from: m.from,
                    to: m.to,
                })
                .collect(),
        }
    }
}
