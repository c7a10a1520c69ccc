//! Manifest loader for `PodMonitoring` objects.
//! Uses serde_yaml for all parsing; JSON input is valid YAML.

mod schema;

use schema::PodMonitoringManifest;
use scrapegen_core::{MonitoringTarget, KIND_POD_MONITORING};
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors raised while loading manifests. `document` is the zero-based
/// position of the YAML document in the input.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("document {document}: {source}")]
    Yaml {
        document: usize,
        source: serde_yaml::Error,
    },

    #[error("document {document}: unsupported kind {kind:?}, expected PodMonitoring")]
    UnsupportedKind { document: usize, kind: String },

    #[error("document {document}: missing required field {field}")]
    MissingField {
        document: usize,
        field: &'static str,
    },
}

impl ManifestError {
    pub fn document(&self) -> usize {
        match self {
            ManifestError::Yaml { document, .. }
            | ManifestError::UnsupportedKind { document, .. }
            | ManifestError::MissingField { document, .. } => *document,
        }
    }
}

// ============================================================================
// LOADER
// ============================================================================

/// Parse every `PodMonitoring` document in `text`. Empty documents are skipped.
pub fn load_manifests(text: &str) -> Result<Vec<MonitoringTarget>, ManifestError> {
    let mut targets = Vec::new();

    for (document, de) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let value = serde_yaml::Value::deserialize(de)
            .map_err(|source| ManifestError::Yaml { document, source })?;
        if value.is_null() {
            continue;
        }
        let manifest: PodMonitoringManifest = serde_yaml::from_value(value)
            .map_err(|source| ManifestError::Yaml { document, source })?;
        targets.push(into_target(document, manifest)?);
    }

    Ok(targets)
}

fn into_target(
    document: usize,
    manifest: PodMonitoringManifest,
) -> Result<MonitoringTarget, ManifestError> {
    match manifest.kind.as_deref() {
        Some(KIND_POD_MONITORING) => {}
        Some(other) => {
            return Err(ManifestError::UnsupportedKind {
                document,
                kind: other.to_string(),
            })
        }
        None => {
            return Err(ManifestError::MissingField {
                document,
                field: "kind",
            })
        }
    }

    let meta = manifest.metadata;
    let name = required(document, "metadata.name", meta.name)?;
    let namespace = required(document, "metadata.namespace", meta.namespace)?;
    let spec = manifest.spec.ok_or(ManifestError::MissingField {
        document,
        field: "spec",
    })?;

    Ok(spec.into_target(namespace, name, meta.generation.unwrap_or_default()))
}

fn required(
    document: usize,
    field: &'static str,
    value: Option<String>,
) -> Result<String, ManifestError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ManifestError::MissingField { document, field })
}
