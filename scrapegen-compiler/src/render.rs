//! Renderer: compiled jobs → collector configuration text.
//!
//! The output is a document with a single `scrape_configs` list in the
//! collector's native syntax. Rendering is a pure mapping of [`JobSpec`]
//! fields; nothing is reordered, so equal input renders to equal bytes.

use scrapegen_core::{DiscoveryRole, JobSpec, PromDuration, Rule};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised while serializing rendered output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct CollectorConfig<'a> {
    scrape_configs: Vec<ScrapeConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct ScrapeConfig<'a> {
    job_name: &'a str,
    kubernetes_sd_configs: Vec<KubernetesSdConfig<'a>>,
    metrics_path: &'a str,
    scrape_interval: PromDuration,
    scrape_timeout: PromDuration,
    relabel_configs: &'a [Rule],
}

#[derive(Debug, Serialize)]
struct KubernetesSdConfig<'a> {
    role: DiscoveryRole,
    selectors: Vec<SdSelector<'a>>,
}

#[derive(Debug, Serialize)]
struct SdSelector<'a> {
    role: DiscoveryRole,
    field: &'a str,
}

impl<'a> From<&'a JobSpec> for ScrapeConfig<'a> {
    fn from(job: &'a JobSpec) -> Self {
        ScrapeConfig {
            job_name: &job.job_name,
            kubernetes_sd_configs: vec![KubernetesSdConfig {
                role: job.discovery.role,
                selectors: vec![SdSelector {
                    role: job.discovery.role,
                    field: &job.discovery.field_selector,
                }],
            }],
            metrics_path: &job.metrics_path,
            scrape_interval: job.scrape_interval,
            scrape_timeout: job.scrape_timeout,
            relabel_configs: &job.relabel_configs,
        }
    }
}

fn collector_config(jobs: &[JobSpec]) -> CollectorConfig<'_> {
    CollectorConfig {
        scrape_configs: jobs.iter().map(ScrapeConfig::from).collect(),
    }
}

/// Render jobs as a YAML collector configuration.
pub fn render_yaml(jobs: &[JobSpec]) -> Result<String, RenderError> {
    Ok(serde_yaml::to_string(&collector_config(jobs))?)
}

/// Render jobs as a pretty-printed JSON collector configuration.
pub fn render_json(jobs: &[JobSpec]) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(&collector_config(jobs))?)
}

/// Hex SHA-256 of rendered output, used to detect configuration changes.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
