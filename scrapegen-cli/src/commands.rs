//! The `compile` and `validate` commands.
//!
//! Both load every manifest file first, so a malformed file fails the command
//! before anything is compiled.

use crate::config::OutputFormat;
use crate::error::CliError;
use chrono::{DateTime, Utc};
use scrapegen_compiler::{
    fingerprint, load_manifests, observe, render_json, render_yaml, ScrapeCompiler,
};
use scrapegen_core::{ConditionStatus, ConditionType, JobSpec, MonitoringStatus, MonitoringTarget};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Read and parse every manifest file, in argument order.
pub fn load_targets(paths: &[PathBuf]) -> Result<Vec<MonitoringTarget>, CliError> {
    let mut targets = Vec::new();
    for path in paths {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        let loaded = load_manifests(&text).map_err(|source| CliError::Manifest {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), targets = loaded.len(), "loaded manifests");
        targets.extend(loaded);
    }
    Ok(targets)
}

fn target_id(target: &MonitoringTarget) -> String {
    format!("{}/{}", target.namespace, target.name)
}

// ============================================================================
// COMPILE
// ============================================================================

/// Rendered configuration for a set of targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub fingerprint: String,
    pub jobs: usize,
}

/// Compile all targets into one document. Any invalid target fails the whole run.
pub fn compile(
    targets: &[MonitoringTarget],
    compiler: &ScrapeCompiler,
    format: OutputFormat,
) -> Result<Rendered, CliError> {
    let mut jobs: Vec<JobSpec> = Vec::new();
    for target in targets {
        let compiled = compiler
            .scrape_configs(target)
            .map_err(|source| CliError::Compile {
                target: target_id(target),
                source,
            })?;
        debug!(resource = %target_id(target), jobs = compiled.len(), "compiled target");
        jobs.extend(compiled);
    }

    let text = match format {
        OutputFormat::Yaml => render_yaml(&jobs)?,
        OutputFormat::Json => render_json(&jobs)?,
    };
    let fingerprint = fingerprint(&text);
    info!(jobs = jobs.len(), %fingerprint, "rendered scrape configuration");

    Ok(Rendered {
        text,
        fingerprint,
        jobs: jobs.len(),
    })
}

/// Write `text` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, text).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| CliError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
    }
}

// ============================================================================
// VALIDATE
// ============================================================================

/// Admission outcome of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: String,
    pub status: MonitoringStatus,
}

impl TargetReport {
    pub fn is_valid(&self) -> bool {
        self.status
            .condition(ConditionType::ConfigurationCreateSuccess)
            .map(|c| c.status == ConditionStatus::True)
            .unwrap_or(false)
    }
}

impl fmt::Display for TargetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (generation {}):",
            self.target, self.status.observed_generation
        )?;
        match self
            .status
            .condition(ConditionType::ConfigurationCreateSuccess)
        {
            Some(c) if c.message.is_empty() => {
                write!(f, " ConfigurationCreateSuccess={:?} {}", c.status, c.reason)
            }
            Some(c) => write!(
                f,
                " ConfigurationCreateSuccess={:?} {}: {}",
                c.status, c.reason, c.message
            ),
            None => write!(f, " no condition"),
        }
    }
}

/// Validate every target independently.
pub fn validate(
    targets: &[MonitoringTarget],
    compiler: &ScrapeCompiler,
    now: DateTime<Utc>,
) -> Vec<TargetReport> {
    targets
        .iter()
        .map(|target| {
            let result = compiler.scrape_configs(target);
            if let Err(e) = &result {
                warn!(resource = %target_id(target), error = %e, "target is invalid");
            }
            TargetReport {
                target: target_id(target),
                status: observe(target, &result, &MonitoringStatus::default(), now),
            }
        })
        .collect()
}
