//! CLI logic for the Arbor morphology tool.
//!
//! This module contains the core CLI logic: it loads a morphology file
//! through the [`MorphologyLoader`] and prints a summary report.

pub mod error_adapter;

mod args;
mod config;
mod report;

pub use args::{Args, Traversal};

use std::fs;

use log::info;

use arbor::{ArborError, MorphologyLoader, Severity};

use report::Report;

/// Run the Arbor CLI application
///
/// This function loads the input file through the Arbor pipeline and
/// writes the report to the output file, or to standard output.
///
/// Modifiers and ignored warnings given on the command line are added to
/// those of the configuration file.
///
/// # Errors
///
/// Returns `ArborError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Load errors (lexing, parsing, sanitizing, modifiers)
pub fn run(args: &Args) -> Result<(), ArborError> {
    info!(input_path = args.input; "Processing morphology");

    // Load configuration
    let mut app_config = config::load_config(args.config.as_ref())?;
    let load = app_config.load_mut();
    for modifier in &args.modifiers {
        load.add_modifier(*modifier);
    }
    for kind in &args.ignored_warnings {
        load.add_ignored_warning(*kind);
    }

    let loader = MorphologyLoader::new(app_config);
    let loaded = loader.load_file(&args.input)?;
    let report = Report::new(&loaded, args.sections).to_string();

    match &args.output {
        Some(output) => {
            fs::write(output, report)?;
            info!(output_file = output; "Report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}

/// Process exit status for a failed run.
///
/// Load failures exit with 1, configuration errors with 2 and I/O errors
/// with 3, so scripts can tell a malformed morphology from a bad setup.
pub fn exit_code(err: &ArborError) -> i32 {
    match err {
        ArborError::Load { .. } => 1,
        ArborError::Config(_) => 2,
        ArborError::Io(_) => 3,
    }
}

/// One-line summary of a failed run, logged after the rendered diagnostics.
pub fn failure_summary(input: &str, err: &ArborError) -> String {
    match err {
        ArborError::Load { err: load_err, .. } => {
            let diagnostics = load_err.diagnostics();
            let errors = diagnostics
                .iter()
                .filter(|diag| diag.severity() == Severity::Error)
                .count();
            let warnings = diagnostics.len() - errors;
            format!("Loading {input} failed with {errors} error(s) and {warnings} warning(s)")
        }
        ArborError::Config(_) => format!("Loading {input} failed: invalid configuration"),
        ArborError::Io(_) => format!("Loading {input} failed: I/O error"),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use arbor::{Diagnostic, ErrorCode, LoadError, WarningKind};

    use super::*;

    #[test]
    fn test_exit_code_per_failure_kind() {
        let load = ArborError::new_load_error(
            LoadError::from(Diagnostic::error("boom").with_code(ErrorCode::E201)),
            "",
        );
        let config = ArborError::Config("bad modifier".to_string());
        let io = ArborError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));

        assert_eq!(exit_code(&load), 1);
        assert_eq!(exit_code(&config), 2);
        assert_eq!(exit_code(&io), 3);
    }

    #[test]
    fn test_failure_summary_counts_diagnostics() {
        let diags = vec![
            Diagnostic::error("duplicate soma").with_code(ErrorCode::E201),
            Diagnostic::warning(WarningKind::OnlyChild, "only child").with_label(2, "here"),
            Diagnostic::warning(WarningKind::OnlyChild, "only child").with_label(5, "here"),
        ];
        let err = ArborError::new_load_error(LoadError::new(diags), "");

        assert_eq!(
            failure_summary("cell.asc", &err),
            "Loading cell.asc failed with 1 error(s) and 2 warning(s)"
        );
    }

    #[test]
    fn test_failure_summary_for_setup_errors() {
        let config = ArborError::Config("bad modifier".to_string());
        assert_eq!(
            failure_summary("cell.asc", &config),
            "Loading cell.asc failed: invalid configuration"
        );

        let run_args = Args {
            input: "does/not/exist.asc".to_string(),
            output: None,
            modifiers: Vec::new(),
            ignored_warnings: Vec::new(),
            sections: None,
            config: None,
            log_level: "off".to_string(),
        };
        let err = run(&run_args).unwrap_err();
        assert_eq!(exit_code(&err), 3);
        assert_eq!(
            failure_summary(&run_args.input, &err),
            "Loading does/not/exist.asc failed: I/O error"
        );
    }
}
