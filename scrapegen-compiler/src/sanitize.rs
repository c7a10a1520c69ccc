//! Label-name sanitization and pattern checks shared by every compiler stage.
//!
//! Discovery exposes pod labels as `__meta_kubernetes_pod_label_<name>` after
//! replacing every character outside `[a-zA-Z0-9_]` with `_`. Generated rules
//! must reference the exact same names, so all stages go through
//! [`meta_label`].

use once_cell::sync::Lazy;
use regex::Regex;

static INVALID_LABEL_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("sanitize pattern is a valid regex"));

static LABEL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("label name pattern is a valid regex"));

static DNS1123_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("DNS-1123 label pattern is a valid regex")
});

static DNS1123_SUBDOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("DNS-1123 subdomain pattern is a valid regex")
});

/// Class set operators the `regex` crate understands and RE2 does not.
const CLASS_SET_OPERATORS: [&str; 3] = ["--", "&&", "~~"];

const DNS1123_LABEL_MAX_LEN: usize = 63;
const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;

/// Replace every character outside `[a-zA-Z0-9_]` with `_`.
pub fn sanitize_label_name(name: &str) -> String {
    INVALID_LABEL_CHAR_RE.replace_all(name, "_").into_owned()
}

/// Discovery label for `name` under `prefix`, e.g. `__meta_kubernetes_pod_label_app`.
pub fn meta_label(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, sanitize_label_name(name))
}

/// Whether `name` is usable as a target label name.
pub fn is_valid_label_name(name: &str) -> bool {
    LABEL_NAME_RE.is_match(name)
}

/// Whether `name` is a DNS-1123 label, the format of Kubernetes namespaces.
///
/// Such names contain no regex metacharacters, so they match only themselves
/// when used as a relabel regex.
pub fn is_dns1123_label(name: &str) -> bool {
    name.len() <= DNS1123_LABEL_MAX_LEN && DNS1123_LABEL_RE.is_match(name)
}

/// Whether `name` is a DNS-1123 subdomain, the format of Kubernetes object names.
pub fn is_dns1123_subdomain(name: &str) -> bool {
    name.len() <= DNS1123_SUBDOMAIN_MAX_LEN && DNS1123_SUBDOMAIN_RE.is_match(name)
}

/// Check that `pattern` compiles the way the collector compiles relabel
/// regexes (anchored on both ends).
///
/// This uses the `regex` crate, while the collector uses Go's RE2. The two
/// syntaxes mostly overlap but not fully: `\Q...\E` literals are rejected
/// here although RE2 accepts them, and character-class set operations such as
/// `[a-z--c]` or `[a-z&&b]` are rejected because the two engines read them
/// differently.
pub fn check_relabel_regex(pattern: &str) -> Result<(), String> {
    if let Some(op) = class_set_operator(pattern) {
        return Err(format!(
            "character class set operation {:?} is not supported by the collector",
            op
        ));
    }
    Regex::new(&format!("^(?:{})$", pattern))
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// First class set operator that appears inside a bracket expression.
fn class_set_operator(pattern: &str) -> Option<&'static str> {
    let bytes = pattern.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => {
                depth += 1;
                // A `]` right after the opening bracket (or `[^`) is a literal.
                if bytes.get(i + 1) == Some(&b'^') {
                    i += 1;
                }
                if bytes.get(i + 1) == Some(&b']') {
                    i += 1;
                }
            }
            b']' if depth > 0 => depth -= 1,
            _ if depth > 0 => {
                if let Some(op) = CLASS_SET_OPERATORS
                    .iter()
                    .find(|op| bytes[i..].starts_with(op.as_bytes()))
                {
                    return Some(*op);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
