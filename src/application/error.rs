//! Collaborator errors

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the default collaborators.
///
/// `Display` is what the user sees on stderr, verbatim.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("No version of Cypress is installed in: {0}\n\nPlease reinstall Cypress by running: cypress install")]
    BinaryNotFound(PathBuf),

    #[error("Cypress binary version could not be determined: {message}")]
    Resolution { message: String },

    #[error("Cypress verification failed.\n\n{message}")]
    Verification { message: String },

    #[error("Cypress could not be installed: {message}")]
    Install { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    /// The OS reason is part of the message: it is all the user gets to see.
    #[error("could not {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
