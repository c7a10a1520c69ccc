//! scrapegen Compiler - Monitoring targets to scrape configuration
//!
//! This crate turns declarative pod-monitoring resources into the scrape jobs
//! and relabeling rules a Prometheus-compatible collector understands.
//! Compilation is synchronous, pure and deterministic: the same target always
//! yields byte-identical output.
//!
//! Architecture:
//! ```text
//! Manifest text (YAML/JSON)
//!     ↓
//! Manifest Loader (PodMonitoring → MonitoringTarget)
//!     ↓
//! Validator (durations, timeout bound, port)
//!     ↓
//! Compiler (selector → identity → port → label mappings)
//!     ↓
//! JobSpec list
//!     ↓
//! Renderer (scrape_configs YAML/JSON + fingerprint)
//! ```

pub mod compiler;
pub mod manifest;
pub mod render;
pub mod sanitize;
pub mod status;
pub mod validator;

// Re-export key types for convenience
pub use compiler::*;
pub use manifest::{load_manifests, ManifestError};
pub use render::{fingerprint, render_json, render_yaml, RenderError};
pub use sanitize::{is_valid_label_name, meta_label, sanitize_label_name};
pub use status::{condition_from_result, observe};
pub use validator::{
    validate_create, validate_delete, validate_endpoint, validate_update, ValidatedEndpoint,
};
