//! Command line arguments
//!
//! Every option is optional on the command line so that values missing there
//! can be filled from the configuration file and then from built-in
//! defaults. Validation and config loading live in sibling modules.

use crate::app::report::ReportFormat;
use crate::core::logging::LOG_FORMATS;
use crate::core::validation::{
    validate_count, validate_delay, validate_positive_int, validate_timeout,
};
use crate::queue::Timeout;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "handoff")]
#[command(about = "Move items from producer threads to consumer threads through a bounded queue")]
#[command(version)]
#[command(after_help = "Timeouts and delays accept 'unbounded', milliseconds, or values such as '250ms' and '1.5s'")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Queue capacity
    #[arg(short = 'q', long = "capacity", value_name = "N", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// Number of producer threads
    #[arg(short = 'p', long = "producers", value_name = "N", value_parser = validate_positive_int)]
    pub producers: Option<usize>,

    /// Number of consumer threads
    #[arg(short = 'n', long = "consumers", value_name = "N", value_parser = validate_positive_int)]
    pub consumers: Option<usize>,

    /// Items generated by each producer
    #[arg(short = 'i', long = "items", value_name = "N", value_parser = validate_count)]
    pub items: Option<usize>,

    /// Pause after each produced item
    #[arg(long = "producer-delay", value_name = "DELAY", value_parser = validate_delay)]
    pub producer_delay: Option<Duration>,

    /// Pause after each consumed item
    #[arg(long = "consumer-delay", value_name = "DELAY", value_parser = validate_delay)]
    pub consumer_delay: Option<Duration>,

    /// Wait budget for each put
    #[arg(long = "put-timeout", value_name = "TIMEOUT", value_parser = validate_timeout)]
    pub put_timeout: Option<Timeout>,

    /// Wait budget for each get between stop checks
    #[arg(long = "get-timeout", value_name = "TIMEOUT", value_parser = validate_timeout)]
    pub get_timeout: Option<Timeout>,

    /// Final report format
    #[arg(short = 'r', long = "report-format", value_name = "FORMAT", value_enum)]
    pub report_format: Option<ReportFormat>,

    /// Print every produced and consumed item
    #[arg(short = 's', long = "show-transfers")]
    pub show_transfers: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = LOG_FORMATS)]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force coloured output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Colour preference from the configuration file
    #[arg(skip)]
    pub config_color: Option<bool>,
}

impl Args {
    /// Parse the process arguments, styling help output when stdout is a TTY
    pub fn parse_with_styles() -> Self {
        Self::parse_from_with_styles(std::env::args_os())
    }

    /// Parse an explicit argument list with styled help output
    pub fn parse_from_with_styles<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<std::ffi::OsString> + Clone,
    {
        use clap::{CommandFactory, FromArgMatches};

        let colors = std::io::IsTerminal::is_terminal(&std::io::stdout());
        let matches = Self::command()
            .styles(crate::core::styles::palette_to_clap(colors))
            .get_matches_from(args);
        match Self::from_arg_matches(&matches) {
            Ok(args) => args,
            Err(err) => err.exit(),
        }
    }

    /// Resolve colour: explicit flags, then the config file, then TTY detection
    pub fn use_color(&self) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            self.config_color
                .unwrap_or_else(|| std::io::IsTerminal::is_terminal(&std::io::stdout()))
        }
    }

    pub fn report_format(&self) -> ReportFormat {
        self.report_format.unwrap_or_default()
    }

    /// Log file as a string for the logger, if one is set
    pub fn log_file_str(&self) -> Option<String> {
        self.log_file
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned())
    }
}
