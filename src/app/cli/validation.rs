//! Cross-field validation of the merged arguments
//!
//! Individual values are checked while parsing; this catches what only
//! shows up once command line and config file are combined.

use crate::app::pipeline::PipelineSettings;
use crate::core::logging::LOG_FORMATS;
use crate::core::validation::{validate_worker_counts, ValidationError};

use super::args::Args;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl Args {
    /// Validate merged arguments for consistency and constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_sizes()?;
        self.validate_logging()?;
        let settings = self.pipeline_settings();
        validate_worker_counts(
            settings.producers,
            settings.consumers,
            settings.items_per_producer,
        )
    }

    fn validate_sizes(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("Queue capacity", self.capacity),
            ("Producer count", self.producers),
            ("Consumer count", self.consumers),
        ] {
            if value == Some(0) {
                return Err(ValidationError::new(&format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }
        Ok(())
    }

    fn validate_logging(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ValidationError::new(&format!(
                    "Invalid log level '{}': expected one of {}",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }
        if let Some(format) = &self.log_format {
            if !LOG_FORMATS.contains(&format.as_str()) {
                return Err(ValidationError::new(&format!(
                    "Invalid log format '{}': expected one of {}",
                    format,
                    LOG_FORMATS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Settings for the run, with defaults for anything still unset
    pub fn pipeline_settings(&self) -> PipelineSettings {
        let defaults = PipelineSettings::default();
        PipelineSettings {
            capacity: self.capacity.unwrap_or(defaults.capacity),
            producers: self.producers.unwrap_or(defaults.producers),
            consumers: self.consumers.unwrap_or(defaults.consumers),
            items_per_producer: self.items.unwrap_or(defaults.items_per_producer),
            producer_delay: self.producer_delay.unwrap_or(defaults.producer_delay),
            consumer_delay: self.consumer_delay.unwrap_or(defaults.consumer_delay),
            put_timeout: self.put_timeout.unwrap_or(defaults.put_timeout),
            get_timeout: self.get_timeout.unwrap_or(defaults.get_timeout),
            show_transfers: self.show_transfers,
        }
    }
}
