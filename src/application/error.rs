//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{DomainError, ValidationError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("profile is incomplete: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid data in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("authentication required: run 'taxsel session login <token>' first")]
    NotAuthenticated,

    #[error("cannot open input: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
