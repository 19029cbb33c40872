//! CLI-specific error types and exit code mapping

use vigil_core::error::VigilError;
use vigil_validator::ValidatorError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
/// Finding violations is not an error: a completed run exits 0.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Rule document loading or validation failure.
    #[error("rule error: {0}")]
    Rule(String),

    /// The input document could not be read or parsed at all.
    #[error("input error: {0}")]
    Input(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from vigil-core.
    #[error("{0}")]
    Core(#[from] VigilError),

    /// Any other operational failure.
    #[error("{0}")]
    Command(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success (including runs with violations) |
    /// | 1    | General / command error                  |
    /// | 2    | Rule document error                      |
    /// | 10   | Unreadable input / IO error              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Rule(_) => 2,
            Self::Input(_) | Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Core(_) | Self::Command(_) => 1,
        }
    }
}

impl From<ValidatorError> for CliError {
    fn from(e: ValidatorError) -> Self {
        match e {
            ValidatorError::RuleLoad { .. }
            | ValidatorError::RuleValidation { .. }
            | ValidatorError::Regex { .. } => Self::Rule(e.to_string()),
            ValidatorError::EntryParse(_) => Self::Input(e.to_string()),
            ValidatorError::Io(io) => Self::Io(io),
            ValidatorError::InvalidState(_)
            | ValidatorError::Channel(_)
            | ValidatorError::Config { .. } => Self::Command(e.to_string()),
        }
    }
}
