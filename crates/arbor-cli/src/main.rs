//! Arbor CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};
use miette::Diagnostic as _;

use arbor_cli::{Args, error_adapter::to_reportables, exit_code, failure_summary};

fn init_logger(level: &str) -> LevelFilter {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    log_level
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let log_level = init_logger(&args.log_level);

    info!(
        input = args.input,
        modifiers = args.modifiers.len(),
        ignored_warnings = args.ignored_warnings.len(),
        log_level:?;
        "Loading morphology"
    );
    debug!(args:?; "Parsed arguments");

    let Err(err) = arbor_cli::run(&args) else {
        info!(input = args.input; "Morphology loaded");
        return;
    };

    let reporter = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(&err) {
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, &reportable)
            .expect("Writing to String buffer is infallible");

        match reportable.severity() {
            Some(miette::Severity::Warning) => warn!("{writer}"),
            _ => error!("{writer}"),
        }
    }

    let code = exit_code(&err);
    error!(exit_code = code; "{}", failure_summary(&args.input, &err));
    process::exit(code);
}
