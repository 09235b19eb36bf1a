//! Attaching the failed action and its path to `io::Error`

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait IoResultExt<T> {
    /// `fs.copy(&src, &dst).with_path_context("copy binary", &dst)?`
    fn with_path_context(self, action: &'static str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &'static str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_os_error_when_adding_context_then_cause_is_displayed() {
        let result: io::Result<()> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        let err = result
            .with_path_context("spawn", Path::new("/x/Cypress"))
            .unwrap_err();
        assert_eq!(err.to_string(), "could not spawn /x/Cypress: permission denied");
    }
}
