//! Command-line arguments.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scrapegen")]
#[command(about = "Compile PodMonitoring resources into scrape configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $SCRAPEGEN_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile manifests into one scrape configuration document
    Compile {
        /// Manifest files (YAML or JSON, multi-document allowed)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides the config file)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Report the admission status of every target in the manifests
    Validate {
        /// Manifest files (YAML or JSON, multi-document allowed)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}
