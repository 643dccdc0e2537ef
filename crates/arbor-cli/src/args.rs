//! Command-line argument definitions for the Arbor CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input and output paths, the load
//! pipeline, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

use arbor::{WarningKind, options::Modifier};

/// Command-line arguments for the Arbor morphology tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input ASC file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Write the report to this file instead of standard output
    #[arg(short, long)]
    pub output: Option<String>,

    /// Modifier to apply after sanitization (repeatable)
    #[arg(short, long = "modifier", value_name = "MODIFIER")]
    pub modifiers: Vec<Modifier>,

    /// Warning kind to suppress (repeatable)
    #[arg(long = "ignore-warning", value_name = "KIND")]
    pub ignored_warnings: Vec<WarningKind>,

    /// List every section in the given traversal order
    #[arg(short, long, value_enum)]
    pub sections: Option<Traversal>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Order in which sections are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Traversal {
    /// Depth-first, children in stored order
    Depth,
    /// Breadth-first, one root after another
    Breadth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_flags() {
        let args = Args::parse_from([
            "arbor",
            "cell.asc",
            "--modifier",
            "soma-sphere",
            "-m",
            "nrn-order",
            "--ignore-warning",
            "only-child",
            "--sections",
            "breadth",
        ]);

        assert_eq!(args.modifiers, vec![Modifier::SomaSphere, Modifier::NrnOrder]);
        assert_eq!(args.ignored_warnings, vec![WarningKind::OnlyChild]);
        assert_eq!(args.sections, Some(Traversal::Breadth));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_unknown_modifier_is_rejected() {
        let result = Args::try_parse_from(["arbor", "cell.asc", "--modifier", "shrink"]);

        assert!(result.is_err());
    }
}
