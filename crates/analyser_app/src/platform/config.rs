use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use analyser_engine::UploadSettings;
use engine_logging::engine_info;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use super::cli::Cli;
use super::logging::LogDestination;

const DEFAULT_CONFIG_FILENAME: &str = "analyser.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub chunk_size: usize,
    pub save_dir: Option<PathBuf>,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let upload = UploadSettings::default();
        Self {
            base_url: upload.base_url,
            request_timeout_secs: upload.request_timeout.as_secs(),
            connect_timeout_secs: upload.connect_timeout.as_secs(),
            chunk_size: upload.chunk_size,
            save_dir: None,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `explicit`, or `./analyser.ron` if it exists, or falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&path, &content)?;
        engine_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Command-line flags win over the file.
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(dir) = &cli.save_dir {
            self.save_dir = Some(dir.clone());
        }
        self.validate()?;
        Ok(self)
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            chunk_size: self.chunk_size,
            ..UploadSettings::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be at least 1".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".into()));
        }
        if LevelFilter::from_str(&self.log_level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level {:?}",
                self.log_level
            )));
        }
        Ok(())
    }
}
