//! Admission-time validation of monitoring targets.
//!
//! Create and update share one code path that compiles every endpoint, so a
//! target passes validation exactly when it compiles. Delete is always allowed.

use crate::compiler::{resolve_port, scrape_configs, ResolvedPort};
use scrapegen_core::{
    CompileError, CompileResult, DurationField, Endpoint, MonitoringTarget, PromDuration,
};

/// An endpoint whose durations and port have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEndpoint {
    pub interval: PromDuration,
    /// Equal to `interval` when the endpoint declares no timeout.
    pub timeout: PromDuration,
    pub port: ResolvedPort,
}

/// Check durations and port of the endpoint at `index`.
pub fn validate_endpoint(index: usize, endpoint: &Endpoint) -> CompileResult<ValidatedEndpoint> {
    let interval = parse_field(index, DurationField::Interval, &endpoint.interval)?;
    let timeout = match endpoint.timeout() {
        Some(raw) => parse_field(index, DurationField::Timeout, raw)?,
        None => interval,
    };
    if timeout > interval {
        return Err(CompileError::TimeoutExceedsInterval {
            endpoint: index,
            timeout,
            interval,
        });
    }
    let port = resolve_port(index, &endpoint.port)?;
    Ok(ValidatedEndpoint {
        interval,
        timeout,
        port,
    })
}

fn parse_field(endpoint: usize, field: DurationField, raw: &str) -> CompileResult<PromDuration> {
    raw.parse::<PromDuration>()
        .map_err(|source| CompileError::InvalidDuration {
            endpoint,
            field,
            value: raw.to_string(),
            source,
        })
}

/// Validate a newly created target.
pub fn validate_create(target: &MonitoringTarget) -> CompileResult<()> {
    validate(target)
}

/// Validate an updated target. The previous version plays no part.
pub fn validate_update(new: &MonitoringTarget, _old: &MonitoringTarget) -> CompileResult<()> {
    validate(new)
}

/// Deletion is always allowed.
pub fn validate_delete(_target: &MonitoringTarget) -> CompileResult<()> {
    Ok(())
}

fn validate(target: &MonitoringTarget) -> CompileResult<()> {
    scrape_configs(target).map(|_| ())
}
