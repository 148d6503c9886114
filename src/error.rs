//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::TreeError;

/// Application errors wrap domain errors and add I/O and configuration concerns.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("record file holds {count} records, limit is {limit}")]
    TooManyRecords { count: usize, limit: usize },
}

impl AppError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for application layer operations.
pub type AppResult<T> = Result<T, AppError>;
