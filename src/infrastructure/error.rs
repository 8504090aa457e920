//! Errors from the file-backed stores and config writes

use thiserror::Error;

use crate::application::ApplicationError;

/// Either a service failure passed through unchanged, or a raw I/O failure
/// from work the CLI does directly on config files.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// `context` names the action and path, e.g. "write ~/.config/taxsel/taxsel.toml".
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
