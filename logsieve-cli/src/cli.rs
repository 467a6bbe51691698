//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// logsieve -- classify, extract and query heterogeneous log files.
///
/// Use `logsieve <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logsieve", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logsieve.toml configuration file.
    ///
    /// When omitted, `logsieve.toml` in the working directory is used if it
    /// exists, otherwise built-in defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a log file and print the extracted records.
    Parse(ParseArgs),

    /// Print the records matching a set of filters.
    Query(QueryArgs),

    /// Count the records matching a set of filters.
    Count(QueryArgs),

    /// Count records grouped by a field.
    Group(GroupArgs),

    /// Detect the timestamp layout and per-format line counts of a file.
    Detect(DetectArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- parse ----

/// Parse a log file into records.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Log file to read.
    pub file: PathBuf,

    /// Rewrite timestamps to RFC 3339 (overrides `pipeline.normalize_timestamps`).
    #[arg(short, long)]
    pub normalize: bool,
}

// ---- query / count ----

/// Record filters shared by `query` and `count`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Source address (exact match).
    #[arg(long)]
    pub ip: Option<String>,

    /// Status code (exact match).
    #[arg(long)]
    pub status: Option<i64>,

    /// Log level (case-insensitive).
    #[arg(long)]
    pub level: Option<String>,

    /// Text contained in the message or request (case-insensitive).
    #[arg(long)]
    pub contains: Option<String>,

    /// HTTP method (case-insensitive).
    #[arg(long)]
    pub method: Option<String>,

    /// Minimum status code (inclusive).
    #[arg(long)]
    pub min_status: Option<i64>,

    /// Maximum status code (inclusive).
    #[arg(long)]
    pub max_status: Option<i64>,

    /// Maximum number of records to return.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Time range: `last <N><unit>` or `<start> to <end>`.
    #[arg(long)]
    pub range: Option<String>,

    /// Timestamp layout for `--range` and time filtering.
    ///
    /// Either a built-in layout name (apache, syslog, rfc3339, ...) or a
    /// chrono format string such as `%Y-%m-%d`.
    #[arg(long)]
    pub layout: Option<String>,
}

/// Filter the records of a log file.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Log file to read.
    pub file: PathBuf,

    #[command(flatten)]
    pub filters: FilterArgs,
}

// ---- group ----

/// Group the records of a log file by a field.
#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Log file to read.
    pub file: PathBuf,

    /// Field to group by (ip, level, status, request).
    #[arg(long)]
    pub by: String,
}

// ---- detect ----

/// Inspect a log file.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Log file to read.
    pub file: PathBuf,
}

// ---- config ----

/// Manage logsieve configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, pipeline).
        #[arg(long)]
        section: Option<String>,
    },
}
