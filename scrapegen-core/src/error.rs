//! Error types for scrapegen operations

use crate::PromDuration;
use std::fmt;
use thiserror::Error;

/// Which endpoint duration field failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationField {
    Interval,
    Timeout,
}

impl fmt::Display for DurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationField::Interval => write!(f, "interval"),
            DurationField::Timeout => write!(f, "timeout"),
        }
    }
}

/// Errors produced while parsing a Prometheus duration string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration string")]
    Empty,

    #[error("not a valid duration string: {value:?}")]
    Malformed { value: String },

    #[error("duration out of range: {value:?}")]
    Overflow { value: String },
}

/// Errors that can occur while compiling a monitoring target into scrape jobs.
///
/// Endpoint-scoped variants carry the index of the offending endpoint so the
/// admission boundary can point the user at the right list entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("at least one endpoint is required")]
    NoEndpoints,

    #[error("endpoint index {endpoint} is out of range ({count} endpoints declared)")]
    EndpointOutOfRange { endpoint: usize, count: usize },

    #[error("endpoint {endpoint}: port must be set to a name or a non-zero number")]
    MissingPort { endpoint: usize },

    #[error("endpoint {endpoint}: invalid port name {name:?}: {reason}")]
    InvalidPortName {
        endpoint: usize,
        name: String,
        reason: String,
    },

    #[error("endpoint {endpoint}: port number {number} is outside 1..=65535")]
    InvalidPortNumber { endpoint: usize, number: i32 },

    #[error("endpoint {endpoint}: invalid scrape {field} {value:?}: {source}")]
    InvalidDuration {
        endpoint: usize,
        field: DurationField,
        value: String,
        source: DurationError,
    },

    #[error("endpoint {endpoint}: scrape timeout {timeout} must not be greater than scrape interval {interval}")]
    TimeoutExceedsInterval {
        endpoint: usize,
        timeout: PromDuration,
        interval: PromDuration,
    },

    #[error("endpoint {endpoint}: relabel {from:?} to {to:?} conflicts with a reserved target label")]
    ReservedLabelCollision {
        endpoint: usize,
        from: String,
        to: String,
    },

    #[error("endpoint {endpoint}: relabel {from:?} to {to:?}: target is not a valid label name")]
    InvalidLabelName {
        endpoint: usize,
        from: String,
        to: String,
    },

    #[error("selector key {key:?}: unsupported operator {operator:?}")]
    UnsupportedOperator { key: String, operator: String },

    #[error("selector key {key:?}: {reason}")]
    InvalidSelector { key: String, reason: String },

    #[error("namespace {namespace:?} is not a valid DNS-1123 label")]
    InvalidNamespace { namespace: String },

    #[error("name {name:?} is not a valid DNS-1123 subdomain")]
    InvalidTargetName { name: String },
}

impl CompileError {
    /// Index of the endpoint this error is scoped to, if any.
    pub fn endpoint(&self) -> Option<usize> {
        match self {
            CompileError::EndpointOutOfRange { endpoint, .. }
            | CompileError::MissingPort { endpoint }
            | CompileError::InvalidPortName { endpoint, .. }
            | CompileError::InvalidPortNumber { endpoint, .. }
            | CompileError::InvalidDuration { endpoint, .. }
            | CompileError::TimeoutExceedsInterval { endpoint, .. }
            | CompileError::ReservedLabelCollision { endpoint, .. }
            | CompileError::InvalidLabelName { endpoint, .. } => Some(*endpoint),
            CompileError::NoEndpoints
            | CompileError::UnsupportedOperator { .. }
            | CompileError::InvalidSelector { .. }
            | CompileError::InvalidNamespace { .. }
            | CompileError::InvalidTargetName { .. } => None,
        }
    }
}

/// Result type alias for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

// =============================================================================
// TESTS
// =============================================================================
