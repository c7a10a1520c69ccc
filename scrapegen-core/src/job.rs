//! Compiled output: relabeling rules and scrape job specifications.

use crate::labels::ENV_VAR_NODE_NAME;
use crate::PromDuration;
use serde::{Deserialize, Serialize};

/// One target-filtering or label-rewriting step.
///
/// Serializes in the collector's `relabel_configs` shape, with the variant
/// name as `action`. The values of `source_labels` are joined with `;` before
/// `regex` is applied, and regexes are anchored on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Rule {
    /// Keep only targets whose joined source labels match `regex`.
    Keep {
        source_labels: Vec<String>,
        regex: String,
    },
    /// Drop targets whose joined source labels match `regex`.
    Drop {
        source_labels: Vec<String>,
        regex: String,
    },
    /// Write `replacement` (expanded against `regex` captures) to `target_label`.
    /// The collector defaults are `(.*)` and `$1`.
    Replace {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        source_labels: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        regex: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replacement: Option<String>,
        target_label: String,
    },
}

impl Rule {
    pub fn action(&self) -> &'static str {
        match self {
            Rule::Keep { .. } => "keep",
            Rule::Drop { .. } => "drop",
            Rule::Replace { .. } => "replace",
        }
    }

    pub fn source_labels(&self) -> &[String] {
        match self {
            Rule::Keep { source_labels, .. }
            | Rule::Drop { source_labels, .. }
            | Rule::Replace { source_labels, .. } => source_labels,
        }
    }

    /// Target label written by a Replace rule.
    pub fn target_label(&self) -> Option<&str> {
        match self {
            Rule::Replace { target_label, .. } => Some(target_label),
            Rule::Keep { .. } | Rule::Drop { .. } => None,
        }
    }
}

/// Discovery role. Only pods are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryRole {
    Pod,
}

/// Service-discovery settings of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub role: DiscoveryRole,
    /// Field selector restricting discovery; may contain `$(VAR)` tokens.
    pub field_selector: String,
}

impl DiscoveryConfig {
    /// Pods scheduled on the same node as the collector.
    ///
    /// The `$(NODE_NAME)` token is left for the config-reloader sidecar.
    pub fn same_node() -> Self {
        Self {
            role: DiscoveryRole::Pod,
            field_selector: format!("spec.nodeName=$({})", ENV_VAR_NODE_NAME),
        }
    }
}

/// A fully compiled scrape job for one endpoint of one target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobSpec {
    /// Traceability only; the `job` label is set by relabeling.
    pub job_name: String,
    pub discovery: DiscoveryConfig,
    pub metrics_path: String,
    pub scrape_interval: PromDuration,
    pub scrape_timeout: PromDuration,
    pub relabel_configs: Vec<Rule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_serializes_as_relabel_config() {
        let keep = Rule::Keep {
            source_labels: vec!["__meta_kubernetes_namespace".to_string()],
            regex: "ns1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&keep).unwrap(),
            json!({
                "action": "keep",
                "source_labels": ["__meta_kubernetes_namespace"],
                "regex": "ns1",
            })
        );

        let job = Rule::Replace {
            source_labels: vec![],
            regex: None,
            replacement: Some("app".to_string()),
            target_label: "job".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({"action": "replace", "replacement": "app", "target_label": "job"})
        );
    }

    #[test]
    fn test_rule_accessors() {
        let rule = Rule::Drop {
            source_labels: vec!["a".to_string()],
            regex: "true".to_string(),
        };
        assert_eq!(rule.action(), "drop");
        assert_eq!(rule.source_labels(), ["a".to_string()]);
        assert_eq!(rule.target_label(), None);
    }

    #[test]
    fn test_same_node_discovery_keeps_token_literal() {
        let d = DiscoveryConfig::same_node();
        assert_eq!(d.role, DiscoveryRole::Pod);
        assert_eq!(d.field_selector, "spec.nodeName=$(NODE_NAME)");
    }
}
