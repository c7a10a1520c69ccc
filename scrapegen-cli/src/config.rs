//! Configuration loading for the scrapegen CLI.
//!
//! Every section is optional; a missing file means built-in defaults.

use clap::ValueEnum;
use scrapegen_compiler::{CompileOptions, OperatorPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "SCRAPEGEN_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapegenConfig {
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    #[serde(default)]
    pub unknown_operators: OperatorPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Format of rendered scrape configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ScrapegenConfig {
    /// Load from `explicit`, else from `$SCRAPEGEN_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match resolve_config_path(explicit, env) {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ScrapegenConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: "must not be empty".to_string(),
            });
        }
        if let Err(e) = EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: e.to_string(),
            });
        }
        Ok(())
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            unknown_operators: self.compiler.unknown_operators,
        }
    }
}

/// `--config` wins over the environment variable.
pub fn resolve_config_path(explicit: Option<&Path>, env: Option<PathBuf>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ScrapegenConfig::from_toml("").unwrap();
        assert_eq!(config, ScrapegenConfig::default());
        assert_eq!(config.compiler.unknown_operators, OperatorPolicy::Reject);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.output.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_all_sections() {
        let config = ScrapegenConfig::from_toml(
            r#"
[compiler]
unknown_operators = "ignore"

[logging]
format = "json"
filter = "scrapegen=debug,warn"

[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.compiler.unknown_operators, OperatorPolicy::Ignore);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(
            config.compile_options().unknown_operators,
            OperatorPolicy::Ignore
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = ScrapegenConfig::from_toml("[compiler]\nunknown_operator = \"ignore\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ScrapegenConfig::from_toml("[compiler]\nunknown_operators = \"warn\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_filter_rejected() {
        let err = ScrapegenConfig::from_toml("[logging]\nfilter = \" \"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "logging.filter",
                ..
            }
        ));
        assert!(err
            .to_string()
            .starts_with("invalid config value for logging.filter"));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"json\"").unwrap();
        let config = ScrapegenConfig::from_path(file.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);

        let err = ScrapegenConfig::from_path(Path::new("/nonexistent/scrapegen.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().starts_with("failed to read config file"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = Path::new("a.toml");
        assert_eq!(
            resolve_config_path(Some(explicit), Some(PathBuf::from("b.toml"))),
            Some(PathBuf::from("a.toml"))
        );
        assert_eq!(
            resolve_config_path(None, Some(PathBuf::from("b.toml"))),
            Some(PathBuf::from("b.toml"))
        );
        assert_eq!(resolve_config_path(None, None), None);
    }
}
