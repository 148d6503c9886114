//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::domain::TreeError;
use crate::error::AppError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Usage(String),
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        CliError::App(AppError::Tree(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::App(e) => match e {
                AppError::Io { .. } => crate::exitcode::IOERR,
                AppError::Config { .. } => crate::exitcode::CONFIG,
                AppError::Parse { .. } | AppError::TooManyRecords { .. } => {
                    crate::exitcode::DATAERR
                }
                AppError::Tree(TreeError::Internal(_)) => crate::exitcode::SOFTWARE,
                AppError::Tree(_) => crate::exitcode::DATAERR,
            },
        }
    }
}
