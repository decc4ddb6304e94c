//! CLI configuration: defaults, then `tally.toml`, then `TALLY_*`
//! environment overrides, validated before use.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub report: ReportConfig,
    pub data: DataConfig,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub page_size: u32,
}

#[derive(Clone, Debug)]
pub struct DataConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig { level: "info".to_string() },
            report: ReportConfig { page_size: 20 },
            data: DataConfig { path: None },
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
        }

        if let Some(report) = patch.report {
            if let Some(page_size) = report.page_size {
                self.report.page_size = page_size;
            }
        }

        if let Some(data) = patch.data {
            if let Some(path) = data.path {
                self.data.path = Some(path);
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("TALLY_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("TALLY_PAGE_SIZE") {
            self.report.page_size =
                value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "TALLY_PAGE_SIZE".to_string(),
                    value,
                })?;
        }
        if let Some(value) = read_env("TALLY_DATA_PATH") {
            self.data.path = Some(PathBuf::from(value));
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim().to_ascii_lowercase();
        if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            ));
        }

        if self.report.page_size == 0 || self.report.page_size > 500 {
            return Err(ConfigError::Validation(
                "report.page_size must be in range 1..=500".to_string(),
            ));
        }

        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("tally.toml"), PathBuf::from("config/tally.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    logging: Option<LoggingPatch>,
    report: Option<ReportPatch>,
    data: Option<DataPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReportPatch {
    page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    path: Option<PathBuf>,
}
