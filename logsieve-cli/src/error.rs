//! CLI-specific error types and exit code mapping

use logsieve_core::error::{LogsieveError, ParseError};
use logsieve_log_pipeline::LogPipelineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The `--range` expression could not be parsed.
    #[error("time range error: {0}")]
    TimeRange(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logsieve-core.
    #[error("{0}")]
    Core(#[from] LogsieveError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                  |
    /// |------|--------------------------|
    /// | 0    | Success                  |
    /// | 1    | General / command error  |
    /// | 2    | Configuration error      |
    /// | 3    | Invalid time range       |
    /// | 10   | IO error                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::TimeRange(_) => 3,
            Self::Io(_) => 10,
            Self::Core(LogsieveError::Config(_)) => 2,
            Self::Core(LogsieveError::Parse(ParseError::TimeRange(_))) => 3,
            Self::Core(LogsieveError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<LogPipelineError> for CliError {
    fn from(e: LogPipelineError) -> Self {
        if e.is_time_range() {
            return Self::TimeRange(e.to_string());
        }
        match e {
            LogPipelineError::Io(io) => Self::Io(io),
            e @ (LogPipelineError::Config { .. } | LogPipelineError::UnknownLayout(_)) => {
                Self::Config(e.to_string())
            }
            other => Self::Command(other.to_string()),
        }
    }
}
