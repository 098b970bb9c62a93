//! Application startup
//!
//! Stages: parse arguments, merge the config file, start logging, validate,
//! install signal handling, run the pipeline, print the report.

use crate::app::cli::args::Args;
use crate::app::pipeline::run_pipeline;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{flush_logging, init_logging};
use crate::core::shutdown::{ShutdownCoordinator, FORCED_EXIT_CODE};
use crate::core::time::SystemTimeProvider;
use crate::core::version;
use std::process::ExitCode;

/// Exit status for invalid arguments or configuration
const USAGE_EXIT_CODE: u8 = 2;

pub fn startup() -> ExitCode {
    let code = run();
    flush_logging();
    code
}

fn run() -> ExitCode {
    let mut args = Args::parse_with_styles();

    // Logging is not up yet, so config problems go straight to stderr
    let config_path = match args.load_config_file() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    let use_color = args.use_color();
    let log_file = args.log_file_str();
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    log::info!("handoff {} starting", version::long_version());
    match &config_path {
        Some(path) => log::debug!("Loaded configuration from {}", path.display()),
        None => log::debug!("No configuration file loaded"),
    }

    if let Err(e) = args.validate() {
        log_error_with_context(&e, "Argument validation");
        return ExitCode::from(USAGE_EXIT_CODE);
    }
    let settings = args.pipeline_settings();
    log::debug!("Pipeline settings: {:?}", settings);

    let coordinator = ShutdownCoordinator::new();
    coordinator.install_signal_handlers();

    let report = match run_pipeline(&settings, &coordinator, &SystemTimeProvider) {
        Ok(report) => report,
        Err(e) => {
            log_error_with_context(&e, "Pipeline run");
            return ExitCode::FAILURE;
        }
    };

    match report.render(args.report_format(), use_color) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            log::error!("FATAL: could not render report: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if report.interrupted {
        ExitCode::from(FORCED_EXIT_CODE as u8)
    } else if !report.all_accounted {
        log::warn!("Some items were not delivered");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
