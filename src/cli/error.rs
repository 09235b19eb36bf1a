//! CLI-level errors (wraps every lower layer)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// `Display` is exactly what gets printed to stderr.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Usage(#[from] DomainError),

    #[error("{0}")]
    Collaborator(#[from] ApplicationError),

    #[error("{0}")]
    Infra(#[from] InfraError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Every failure at this layer exits with 1; there is no caller to retry.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) | CliError::Collaborator(_) | CliError::Infra(_) => {
                crate::exitcode::FAILURE
            }
        }
    }
}
