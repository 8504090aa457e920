//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(DomainError::NodeNotFound { .. })
                    | ApplicationError::Domain(DomainError::UnknownLevel(_))
                    | ApplicationError::Domain(DomainError::DealNotFound(_))
                    | ApplicationError::Domain(DomainError::DocumentNotFound { .. }) => {
                        crate::exitcode::NOTFOUND
                    }
                    ApplicationError::Domain(_)
                    | ApplicationError::Validation(_)
                    | ApplicationError::Parse { .. } => crate::exitcode::DATAERR,
                    ApplicationError::NotAuthenticated => crate::exitcode::NOPERM,
                    ApplicationError::MissingInput { .. } => crate::exitcode::NOINPUT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    #[test]
    fn given_error_kinds_when_mapping_exit_codes_then_uses_sysexits() {
        let not_found: CliError = DomainError::NodeNotFound {
            level: 0,
            id: "x".into(),
        }
        .into();
        assert_eq!(not_found.exit_code(), crate::exitcode::NOTFOUND);

        let invalid: CliError = ApplicationError::Validation(ValidationError::NoContacts).into();
        assert_eq!(invalid.exit_code(), crate::exitcode::DATAERR);

        let unauth: CliError = ApplicationError::NotAuthenticated.into();
        assert_eq!(unauth.exit_code(), crate::exitcode::NOPERM);

        let missing: CliError = ApplicationError::MissingInput {
            path: "cim.pdf".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        let no_deal: CliError = DomainError::DealNotFound("9".into()).into();
        assert_eq!(no_deal.exit_code(), crate::exitcode::NOTFOUND);

        assert_eq!(
            CliError::Usage("x".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
