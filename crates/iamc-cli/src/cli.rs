//! CLI argument definitions for the IAMC validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "iamc-vet",
    version,
    about = "IAMC scenario validator - check model results against the reference nomenclature and vetting ranges",
    long_about = "Validate IAMC-format scenario results.\n\n\
                  Checks name consistency against a reference nomenclature, flags\n\
                  duplicate records, evaluates IPCC AR6 vetting ranges, and verifies\n\
                  that aggregate variables match the sum of their components."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a results file and write the annotated outputs.
    Validate(ValidateArgs),

    /// List the active vetting criteria.
    Criteria(CriteriaArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the IAMC-format results CSV.
    #[arg(value_name = "RESULTS_FILE")]
    pub data: PathBuf,

    /// Directory holding the reference nomenclature CSVs
    /// (models.csv, regions.csv, variable_units.csv).
    #[arg(long = "nomenclature", value_name = "DIR")]
    pub nomenclature: Option<PathBuf>,

    /// JSON file with vetting criteria (default: built-in IPCC AR6 set).
    #[arg(long = "criteria", value_name = "PATH")]
    pub criteria: Option<PathBuf>,

    /// Output directory for annotated data and the JSON report
    /// (default: <RESULTS_FILE dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip name-consistency checks (required when no nomenclature is given).
    #[arg(long = "skip-names")]
    pub skip_names: bool,

    /// Skip duplicate detection.
    #[arg(long = "skip-duplicates")]
    pub skip_duplicates: bool,

    /// Skip the vetting checks.
    #[arg(long = "skip-vetting")]
    pub skip_vetting: bool,

    /// Also check aggregate variables against the sum of their components.
    #[arg(long = "aggregation")]
    pub aggregation: bool,

    /// Report blank Model/Region/Variable cells instead of skipping them.
    #[arg(long = "flag-blank-names")]
    pub flag_blank_names: bool,

    /// Print the summary without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CriteriaArgs {
    /// JSON file with vetting criteria (default: built-in IPCC AR6 set).
    #[arg(long = "criteria", value_name = "PATH")]
    pub criteria: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
