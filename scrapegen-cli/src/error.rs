//! Error types for the CLI.

use crate::config::ConfigError;
use scrapegen_compiler::{ManifestError, RenderError};
use scrapegen_core::CompileError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: ManifestError,
    },
    #[error("{target}: {source}")]
    Compile {
        target: String,
        source: CompileError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
