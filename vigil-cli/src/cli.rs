//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Vigil -- validate robot log streams against declarative safety rules.
///
/// Reads structured log entries from a JSON array file (`--input`) or a
/// line-delimited JSON stream on stdin (`--stream`), evaluates each entry
/// against the rule document, prints alerts as violations occur, and renders
/// a final summary. The exit code stays 0 when violations are found; only
/// operational failures (bad rules, unreadable input) are non-zero.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON rule document.
    #[arg(short, long)]
    pub rules: PathBuf,

    /// Path to a JSON array file of log entries.
    #[arg(short, long, required_unless_present = "stream", conflicts_with = "stream")]
    pub input: Option<PathBuf>,

    /// Read line-delimited JSON entries from stdin instead of a file.
    #[arg(long)]
    pub stream: bool,

    /// Write the final JSON report to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Summary output format on stdout.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Show field/actual/expected details for each alert.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress alerts and the console summary (the report file is still written).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Print at most N alerts to the console (violations are still counted).
    #[arg(long, value_name = "N")]
    pub max_violations: Option<usize>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Supported summary output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console summary.
    Text,
    /// Machine-readable JSON report on stdout.
    Json,
}
