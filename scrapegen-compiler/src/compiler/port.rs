//! Port resolver: endpoint port → filtering and identity rules.
//!
//! A named port filters discovered targets down to the matching container
//! port. A numeric port is hardcoded into the scrape address instead of being
//! filtered on: pods that never declared the port still yield one substitute
//! target, and the collector's target deduplication collapses the copies.

use crate::sanitize::check_relabel_regex;
use scrapegen_core::labels::{
    ADDRESS_LABEL, KEY_INSTANCE, META_POD_CONTAINER_PORT_NAME, META_POD_IP, META_POD_NAME,
};
use scrapegen_core::{CompileError, CompileResult, PortSpec, Rule};
use std::fmt;

/// A port that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedPort {
    Named(String),
    Number(u16),
}

impl fmt::Display for ResolvedPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedPort::Named(name) => write!(f, "{}", name),
            ResolvedPort::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Resolve the port of endpoint `endpoint`. A name takes precedence over a number.
pub fn resolve_port(endpoint: usize, port: &PortSpec) -> CompileResult<ResolvedPort> {
    if let Some(name) = port.name() {
        check_relabel_regex(name).map_err(|reason| CompileError::InvalidPortName {
            endpoint,
            name: name.to_string(),
            reason,
        })?;
        return Ok(ResolvedPort::Named(name.to_string()));
    }
    if let Some(number) = port.value() {
        let number = u16::try_from(number)
            .ok()
            .filter(|n| *n != 0)
            .ok_or(CompileError::InvalidPortNumber { endpoint, number })?;
        return Ok(ResolvedPort::Number(number));
    }
    Err(CompileError::MissingPort { endpoint })
}

/// Rules selecting the port and setting the `instance` label.
pub fn port_rules(port: &ResolvedPort) -> Vec<Rule> {
    match port {
        ResolvedPort::Named(name) => vec![
            Rule::Keep {
                source_labels: vec![META_POD_CONTAINER_PORT_NAME.to_string()],
                regex: name.clone(),
            },
            // Pod name alone is not unique when a pod exposes several
            // metrics ports, so the port name is part of the instance.
            Rule::Replace {
                source_labels: vec![
                    META_POD_NAME.to_string(),
                    META_POD_CONTAINER_PORT_NAME.to_string(),
                ],
                regex: Some("(.+);(.+)".to_string()),
                replacement: Some("$1:$2".to_string()),
                target_label: KEY_INSTANCE.to_string(),
            },
        ],
        ResolvedPort::Number(number) => vec![
            Rule::Replace {
                source_labels: vec![META_POD_NAME.to_string()],
                regex: None,
                replacement: Some(format!("$1:{}", number)),
                target_label: KEY_INSTANCE.to_string(),
            },
            // Discovery may have pre-filled the address from another declared port.
            Rule::Replace {
                source_labels: vec![META_POD_IP.to_string()],
                regex: None,
                replacement: Some(format!("$1:{}", number)),
                target_label: ADDRESS_LABEL.to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_takes_precedence_over_number() {
        let both = PortSpec {
            name: Some("web".to_string()),
            number: Some(8080),
        };
        assert_eq!(
            resolve_port(0, &both).unwrap(),
            ResolvedPort::Named("web".to_string())
        );
    }

    #[test]
    fn test_missing_port() {
        assert_eq!(
            resolve_port(4, &PortSpec::default()),
            Err(CompileError::MissingPort { endpoint: 4 })
        );
        let zero = PortSpec {
            name: Some(String::new()),
            number: Some(0),
        };
        assert_eq!(
            resolve_port(1, &zero),
            Err(CompileError::MissingPort { endpoint: 1 })
        );
    }

    #[test]
    fn test_invalid_port_name() {
        let err = resolve_port(2, &PortSpec::named("web(")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidPortName { endpoint: 2, ref name, .. } if name == "web("
        ));
    }

    #[test]
    fn test_invalid_port_number() {
        for n in [-1, 65536, 100_000] {
            assert_eq!(
                resolve_port(0, &PortSpec::number(n)),
                Err(CompileError::InvalidPortNumber {
                    endpoint: 0,
                    number: n
                })
            );
        }
        assert_eq!(
            resolve_port(0, &PortSpec::number(65535)).unwrap(),
            ResolvedPort::Number(65535)
        );
    }

    #[test]
    fn test_named_port_rules() {
        let rules = port_rules(&ResolvedPort::Named("web".to_string()));
        assert_eq!(
            rules,
            vec![
                Rule::Keep {
                    source_labels: vec!["__meta_kubernetes_pod_container_port_name".to_string()],
                    regex: "web".to_string(),
                },
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
    fn test_numeric_port_overrides_address() {
        let rules = port_rules(&ResolvedPort::Number(8080));
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].target_label(), Some("instance"));
        assert_eq!(rules[1].target_label(), Some("__address__"));
        assert_eq!(
            rules[1],
            Rule::Replace {
                source_labels: vec!["__meta_kubernetes_pod_ip".to_string()],
                regex: None,
                replacement: Some("$1:8080".to_string()),
                target_label: "__address__".to_string(),
            }
        );
        assert!(rules.iter().all(|r| !matches!(r, Rule::Keep { .. })));
    }
}
