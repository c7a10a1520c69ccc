//! scrapegen entry point.

use chrono::Utc;
use clap::Parser;
use scrapegen_cli::cli::{Cli, Command};
use scrapegen_cli::commands;
use scrapegen_cli::config::ScrapegenConfig;
use scrapegen_cli::error::CliError;
use scrapegen_cli::logging::init_logging;
use scrapegen_compiler::ScrapeCompiler;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "scrapegen failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = ScrapegenConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging)?;
    let compiler = ScrapeCompiler::new(config.compile_options());

    match cli.command {
        Command::Compile {
            files,
            output,
            format,
        } => {
            let targets = commands::load_targets(&files)?;
            let format = format.unwrap_or(config.output.format);
            let rendered = commands::compile(&targets, &compiler, format)?;
            commands::write_output(output.as_deref(), &rendered.text)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { files } => {
            let targets = commands::load_targets(&files)?;
            let reports = commands::validate(&targets, &compiler, Utc::now());
            for report in &reports {
                println!("{}", report);
            }
            if reports.iter().all(|r| r.is_valid()) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
