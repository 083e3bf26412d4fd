//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `STOCKPRICE_LOADER_*` environment variables. Command-line overrides are
//! applied on top by the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::app::models::{MalformedLinePolicy, TickerFilter};
use crate::app::services::line_source::SourceDescriptor;
use crate::app::services::record_parser::RecordParser;
use crate::constants::{APP_NAME, DEFAULT_LOG_LEVEL, DEFAULT_SOURCE, LOG_LEVELS, env};
use crate::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

/// Where prices are read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File path, `file://` URI or `-` for stdin
    pub descriptor: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            descriptor: DEFAULT_SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub on_malformed: MalformedLinePolicy,

    /// Tickers to keep; empty keeps everything
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when no `-v`/`-q` flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `path` (or the per-user file if present), then the environment
    ///
    /// An explicit `path` must exist; the per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid config file: {}", e)))
    }

    /// Apply `STOCKPRICE_LOADER_*` variables from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Values are taken as-is; [`validate`](Self::validate) and the accessors
    /// report anything unusable.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(env::SOURCE) {
            debug!("{} overrides source", env::SOURCE);
            self.source.descriptor = source;
        }
        if let Some(tickers) = lookup(env::TICKERS) {
            self.parsing.tickers = split_list(&tickers);
        }
        if let Some(policy) = lookup(env::ON_MALFORMED) {
            match MalformedLinePolicy::from_str(&policy) {
                Ok(policy) => self.parsing.on_malformed = policy,
                Err(e) => warn!("Ignoring {}: {}", env::ON_MALFORMED, e),
            }
        }
        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.source.descriptor.trim().is_empty() {
            return Err(Error::configuration("source descriptor cannot be empty"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "unknown log level '{}' (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn with_source(mut self, descriptor: impl Into<String>) -> Self {
        self.source.descriptor = descriptor.into();
        self
    }

    pub fn with_tickers(mut self, tickers: Vec<String>) -> Self {
        self.parsing.tickers = tickers;
        self
    }

    pub fn with_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.parsing.on_malformed = policy;
        self
    }

    pub fn source_descriptor(&self) -> Result<SourceDescriptor> {
        self.source.descriptor.parse()
    }

    /// `None` when no tickers are configured
    pub fn ticker_filter(&self) -> Result<Option<TickerFilter>> {
        if self.parsing.tickers.iter().all(|t| t.trim().is_empty()) {
            return Ok(None);
        }
        TickerFilter::new(&self.parsing.tickers).map(Some)
    }

    /// Parser configured with this policy and filter
    pub fn record_parser(&self) -> Result<RecordParser> {
        Ok(RecordParser::new()
            .with_policy(self.parsing.on_malformed)
            .with_filter(self.ticker_filter()?))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
