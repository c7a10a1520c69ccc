//! scrapegen Core - Data Types
//!
//! Pure data structures shared by the compiler and its front ends. All other
//! crates depend on this one. Behavior lives in `scrapegen-compiler`; the only
//! logic here is parsing/printing of durations and small accessors.

pub mod duration;
pub mod error;
pub mod job;
pub mod labels;
pub mod resource;
pub mod status;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use duration::PromDuration;
pub use error::{CompileError, CompileResult, DurationError, DurationField};
pub use job::{DiscoveryConfig, DiscoveryRole, JobSpec, Rule};
pub use labels::{is_reserved_label, RESERVED_LABELS};
pub use resource::{
    Endpoint, IntOrString, LabelMapping, LabelSelector, MonitoringTarget, PortSpec,
    SelectorRequirement, DEFAULT_METRICS_PATH, KIND_POD_MONITORING,
};
pub use status::{
    default_conditions, ConditionStatus, ConditionType, MonitoringCondition, MonitoringStatus,
};
