//! Error types for tasktrack
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad argument, unknown task id, bad config)
//! - 4: Operation failed (unreadable storage, failed save)

use std::path::PathBuf;
use thiserror::Error;

use crate::task::TaskId;

/// Exit codes for the tasktrack CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tasktrack operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No such task with id {0}")]
    NotFound(TaskId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Corrupt task file {path}: {reason}")]
    CorruptStorage { path: PathBuf, reason: String },

    #[error("Failed to save {path}: {source}; previous contents left unchanged")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) | Error::NotFound(_) | Error::InvalidConfig(_) => {
                exit_codes::USER_ERROR
            }

            Error::CorruptStorage { .. }
            | Error::Persist { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::NotFound(_) => "not_found",
            Error::InvalidConfig(_) | Error::TomlParse(_) => "invalid_config",
            Error::CorruptStorage { .. } => "corrupt_storage",
            Error::Persist { .. } | Error::Io(_) => "io_failure",
            Error::Json(_) => "serialization",
        }
    }
}

/// Result type alias for tasktrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    pub kind: &'static str,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
        }
    }
}
