//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the taxonomy, selection and deal rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: level {level}, id '{id}'")]
    NodeNotFound { level: usize, id: String },

    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("level schema must name at least one level")]
    EmptySchema,

    #[error("node '{id}' at level {level} exceeds schema depth {depth}")]
    LevelOutOfRange {
        id: String,
        level: usize,
        depth: usize,
    },

    #[error("duplicate id '{id}' at level {level}")]
    DuplicateId { level: usize, id: String },

    #[error("node has empty {field}")]
    EmptyField { field: &'static str },

    #[error("deal not found: '{0}'")]
    DealNotFound(String),

    #[error("document '{document}' not found on deal '{deal}'")]
    DocumentNotFound { deal: String, document: String },

    #[error("deal '{id}' cannot move from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
