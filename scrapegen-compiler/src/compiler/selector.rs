//! Selector compiler: label selectors → target-filtering rules.

use super::OperatorPolicy;
use crate::sanitize::{check_relabel_regex, is_dns1123_label, is_dns1123_subdomain, meta_label};
use scrapegen_core::labels::{
    KEY_JOB, KEY_NAMESPACE, META_NAMESPACE, META_POD_LABEL_PREFIX, META_POD_LABEL_PRESENT_PREFIX,
};
use scrapegen_core::{CompileError, CompileResult, LabelSelector, Rule, SelectorRequirement};
use std::fmt;

/// Set-based selector operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

impl SelectorOperator {
    /// Parse the operator as written in a resource. Case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "In" => Some(SelectorOperator::In),
            "NotIn" => Some(SelectorOperator::NotIn),
            "Exists" => Some(SelectorOperator::Exists),
            "DoesNotExist" => Some(SelectorOperator::DoesNotExist),
            _ => None,
        }
    }
}

impl fmt::Display for SelectorOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SelectorOperator::In => "In",
            SelectorOperator::NotIn => "NotIn",
            SelectorOperator::Exists => "Exists",
            SelectorOperator::DoesNotExist => "DoesNotExist",
        };
        write!(f, "{}", s)
    }
}

/// Compile the namespace filter plus all selector rules.
///
/// Output order: namespace Keep, exact-match Keeps sorted by key, then one
/// rule per expression in declaration order. The namespace must be a
/// DNS-1123 label so that the filter matches it literally.
pub fn compile_selector(
    selector: &LabelSelector,
    namespace: &str,
    policy: OperatorPolicy,
) -> CompileResult<Vec<Rule>> {
    if !is_dns1123_label(namespace) {
        return Err(CompileError::InvalidNamespace {
            namespace: namespace.to_string(),
        });
    }

    let mut rules = vec![Rule::Keep {
        source_labels: vec![META_NAMESPACE.to_string()],
        regex: namespace.to_string(),
    }];

    // Map iteration order is unspecified; sort for reproducible output.
    let mut keys: Vec<&String> = selector.match_labels.keys().collect();
    keys.sort();

    for key in keys {
        let value = &selector.match_labels[key];
        check_pattern(key, value)?;
        rules.push(Rule::Keep {
            source_labels: vec![meta_label(META_POD_LABEL_PREFIX, key)],
            regex: value.clone(),
        });
    }

    for expr in &selector.match_expressions {
        if let Some(rule) = compile_expression(expr, policy)? {
            rules.push(rule);
        }
    }

    Ok(rules)
}

/// Compile one set-based expression. `None` means the expression was skipped.
fn compile_expression(
    expr: &SelectorRequirement,
    policy: OperatorPolicy,
) -> CompileResult<Option<Rule>> {
    let Some(op) = SelectorOperator::parse(&expr.operator) else {
        return match policy {
            OperatorPolicy::Reject => Err(CompileError::UnsupportedOperator {
                key: expr.key.clone(),
                operator: expr.operator.clone(),
            }),
            OperatorPolicy::Ignore => Ok(None),
        };
    };

    let rule = match op {
        SelectorOperator::In | SelectorOperator::NotIn => {
            if expr.values.is_empty() {
                return Err(CompileError::InvalidSelector {
                    key: expr.key.clone(),
                    reason: format!("operator {} requires at least one value", op),
                });
            }
            let regex = expr.values.join("|");
            check_pattern(&expr.key, &regex)?;
            let source_labels = vec![meta_label(META_POD_LABEL_PREFIX, &expr.key)];
            if op == SelectorOperator::In {
                Rule::Keep {
                    source_labels,
                    regex,
                }
            } else {
                Rule::Drop {
                    source_labels,
                    regex,
                }
            }
        }
        SelectorOperator::Exists => Rule::Keep {
            source_labels: vec![meta_label(META_POD_LABEL_PRESENT_PREFIX, &expr.key)],
            regex: "true".to_string(),
        },
        SelectorOperator::DoesNotExist => Rule::Drop {
            source_labels: vec![meta_label(META_POD_LABEL_PRESENT_PREFIX, &expr.key)],
            regex: "true".to_string(),
        },
    };
    Ok(Some(rule))
}

fn check_pattern(key: &str, pattern: &str) -> CompileResult<()> {
    check_relabel_regex(pattern).map_err(|reason| CompileError::InvalidSelector {
        key: key.to_string(),
        reason: format!("value {:?} is not a valid regex: {}", pattern, reason),
    })
}

/// Rules that set clean `namespace` and `job` labels on every target.
///
/// The target name becomes a replacement template, so it must be a DNS-1123
/// subdomain (no `$` references).
pub fn identity_rules(target_name: &str) -> CompileResult<Vec<Rule>> {
    if !is_dns1123_subdomain(target_name) {
        return Err(CompileError::InvalidTargetName {
            name: target_name.to_string(),
        });
    }
    Ok(vec![
        Rule::Replace {
            source_labels: vec![META_NAMESPACE.to_string()],
            regex: None,
            replacement: None,
            target_label: KEY_NAMESPACE.to_string(),
        },
        Rule::Replace {
            source_labels: vec![],
            regex: None,
            replacement: Some(target_name.to_string()),
            target_label: KEY_JOB.to_string(),
        },
    ])
}
