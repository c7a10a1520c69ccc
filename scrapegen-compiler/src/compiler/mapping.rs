//! Label mapping compiler: pod label remaps → Replace rules.

use crate::sanitize::{is_valid_label_name, meta_label};
use scrapegen_core::{is_reserved_label, CompileError, CompileResult, LabelMapping, Rule};

/// One Replace rule per mapping, in declaration order.
///
/// When two mappings write the same target label the later one wins, because
/// the collector applies rules in order.
pub fn compile_label_mappings(
    endpoint: usize,
    mappings: &[LabelMapping],
    prefix: &str,
) -> CompileResult<Vec<Rule>> {
    mappings
        .iter()
        .map(|m| {
            let to = m.target();
            if is_reserved_label(to) {
                return Err(CompileError::ReservedLabelCollision {
                    endpoint,
                    from: m.from.clone(),
                    to: to.to_string(),
                });
            }
            if !is_valid_label_name(to) {
                return Err(CompileError::InvalidLabelName {
                    endpoint,
                    from: m.from.clone(),
                    to: to.to_string(),
                });
            }
            Ok(Rule::Replace {
                source_labels: vec![meta_label(prefix, &m.from)],
                regex: None,
                replacement: None,
                target_label: to.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapegen_core::labels::META_POD_LABEL_PREFIX;
    use scrapegen_core::RESERVED_LABELS;

    fn replace(source: &str, target: &str) -> Rule {
        Rule::Replace {
            source_labels: vec![source.to_string()],
            regex: None,
            replacement: None,
            target_label: target.to_string(),
        }
    }

    #[test]
    fn test_mappings_keep_declaration_order() {
        let mappings = vec![
            LabelMapping::new("team", None),
            LabelMapping::new("app.kubernetes.io/version", Some("version")),
            LabelMapping::new("owner", Some("team")),
        ];
        let rules = compile_label_mappings(0, &mappings, META_POD_LABEL_PREFIX).unwrap();
        assert_eq!(
            rules,
            vec![
                replace("__meta_kubernetes_pod_label_team", "team"),
                replace("__meta_kubernetes_pod_label_app_kubernetes_io_version", "version"),
                replace("__meta_kubernetes_pod_label_owner", "team"),
            ]
        );
    }

    #[test]
    fn test_every_reserved_label_collides() {
        for reserved in RESERVED_LABELS {
            let mappings = vec![LabelMapping::new("src", Some(reserved))];
            let err = compile_label_mappings(3, &mappings, META_POD_LABEL_PREFIX).unwrap_err();
            assert_eq!(
                err,
                CompileError::ReservedLabelCollision {
                    endpoint: 3,
                    from: "src".to_string(),
                    to: reserved.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_defaulted_target_is_checked_too() {
        let mappings = vec![LabelMapping::new("instance", None)];
        let err = compile_label_mappings(0, &mappings, META_POD_LABEL_PREFIX).unwrap_err();
        assert!(matches!(err, CompileError::ReservedLabelCollision { .. }));
    }

    #[test]
    fn test_invalid_target_name() {
        let mappings = vec![LabelMapping::new("app.kubernetes.io/name", None)];
        let err = compile_label_mappings(0, &mappings, META_POD_LABEL_PREFIX).unwrap_err();
        assert!(matches!(err, CompileError::InvalidLabelName { ref to, .. } if to == "app.kubernetes.io/name"));
    }

    #[test]
    fn test_custom_prefix() {
        let mappings = vec![LabelMapping::new("zone", None)];
        let rules = compile_label_mappings(0, &mappings, "__meta_kubernetes_node_label_").unwrap();
        assert_eq!(rules, vec![replace("__meta_kubernetes_node_label_zone", "zone")]);
    }
}
