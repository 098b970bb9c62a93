//! TOML configuration file loading
//!
//! Keys mirror the long command line options (`capacity`, `put-timeout`,
//! `log-level`, ...). A value from the file is only used when the same option
//! was not given on the command line.

use crate::core::error_handling::ContextualError;
use crate::core::validation::{validate_delay, validate_timeout, ValidationError};
use crate::queue::Timeout;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::args::Args;
use crate::app::report::ReportFormat;

/// The configuration file could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    fn invalid(path: &Path, message: String) -> Self {
        ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Invalid { path, .. } | ConfigError::Read { path, .. } => path,
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ConfigError::Invalid { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { message, .. } => Some(message),
            ConfigError::Read { .. } => None,
        }
    }
}

/// `<config dir>/Handoff/handoff.toml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Handoff").join("handoff.toml"))
}

impl Args {
    /// Pick the file to load
    ///
    /// A file named with `--config-file` must exist. The default file is
    /// used only when present.
    pub fn resolve_config_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        match &self.config_file {
            Some(path) if !path.exists() => Err(ConfigError::invalid(
                path,
                format!(
                    "The specified configuration file does not exist: {}",
                    path.display()
                ),
            )),
            Some(path) => Ok(Some(path.clone())),
            None => Ok(default_config_path().filter(|path| path.exists())),
        }
    }

    /// Read the configuration file, if any, and merge it into these arguments
    ///
    /// Returns the path that was loaded.
    pub fn load_config_file(&mut self) -> Result<Option<PathBuf>, ConfigError> {
        let Some(path) = self.resolve_config_path()? else {
            return Ok(None);
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str::<toml::Table>(&contents).map_err(|e| {
            ConfigError::invalid(
                &path,
                format!("Error parsing configuration file {}: {}", path.display(), e),
            )
        })?;
        self.apply_toml_values(&config).map_err(|e| {
            ConfigError::invalid(
                &path,
                format!("Error in configuration file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(path))
    }

    /// Fill options not given on the command line from a TOML table
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ValidationError> {
        fill(&mut self.capacity, || positive(config, "capacity"))?;
        fill(&mut self.producers, || positive(config, "producers"))?;
        fill(&mut self.consumers, || positive(config, "consumers"))?;
        fill(&mut self.items, || count(config, "items"))?;
        fill(&mut self.producer_delay, || delay(config, "producer-delay"))?;
        fill(&mut self.consumer_delay, || delay(config, "consumer-delay"))?;
        fill(&mut self.put_timeout, || timeout(config, "put-timeout"))?;
        fill(&mut self.get_timeout, || timeout(config, "get-timeout"))?;
        fill(&mut self.report_format, || report_format(config))?;

        if !self.show_transfers {
            self.show_transfers = boolean(config, "show-transfers")?.unwrap_or(false);
        }

        fill(&mut self.log_level, || string(config, "log-level"))?;
        fill(&mut self.log_format, || string(config, "log-format"))?;
        if self.log_file.is_none() {
            // "none" and "-" disable file logging
            self.log_file = string(config, "log-file")?
                .filter(|file| !file.eq_ignore_ascii_case("none") && file != "-")
                .map(PathBuf::from);
        }

        if let Some(color) = boolean(config, "color")? {
            self.config_color = Some(color);
        }
        if let Some(no_color) = boolean(config, "no-color")? {
            self.config_color = Some(!no_color);
        }

        Ok(())
    }
}

fn fill<T>(
    target: &mut Option<T>,
    from_config: impl FnOnce() -> Result<Option<T>, ValidationError>,
) -> Result<(), ValidationError> {
    if target.is_none() {
        *target = from_config()?;
    }
    Ok(())
}

fn wrong_type(key: &str, expected: &str) -> ValidationError {
    ValidationError::new(&format!("'{}' must be {}", key, expected))
}

fn string(config: &toml::Table, key: &str) -> Result<Option<String>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| wrong_type(key, "a string")),
    }
}

fn boolean(config: &toml::Table, key: &str) -> Result<Option<bool>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| wrong_type(key, "true or false")),
    }
}

fn count(config: &toml::Table, key: &str) -> Result<Option<usize>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| wrong_type(key, "a non-negative integer")),
    }
}

fn positive(config: &toml::Table, key: &str) -> Result<Option<usize>, ValidationError> {
    match count(config, key) {
        Ok(Some(0)) | Err(_) => Err(wrong_type(key, "an integer greater than 0")),
        other => other,
    }
}

/// Integers are milliseconds; strings use the command line syntax
fn duration_text(config: &toml::Table, key: &str) -> Result<Option<String>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(toml::Value::Integer(ms)) if *ms >= 0 => Ok(Some(ms.to_string())),
        Some(toml::Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(wrong_type(key, "milliseconds or a duration string")),
    }
}

fn timeout(config: &toml::Table, key: &str) -> Result<Option<Timeout>, ValidationError> {
    duration_text(config, key)?
        .map(|text| validate_timeout(&text).map_err(|e| ValidationError::new(&e)))
        .transpose()
}

fn delay(config: &toml::Table, key: &str) -> Result<Option<Duration>, ValidationError> {
    duration_text(config, key)?
        .map(|text| validate_delay(&text).map_err(|e| ValidationError::new(&e)))
        .transpose()
}

fn report_format(config: &toml::Table) -> Result<Option<ReportFormat>, ValidationError> {
    string(config, "report-format")?
        .map(|text| {
            <ReportFormat as clap::ValueEnum>::from_str(&text, true)
                .map_err(|_| wrong_type("report-format", "'text' or 'json'"))
        })
        .transpose()
}
