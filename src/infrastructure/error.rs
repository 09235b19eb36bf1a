//! Errors raised while wiring the process handle

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    /// Settings could not be loaded.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("cannot determine the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

pub type InfraResult<T> = Result<T, InfraError>;
