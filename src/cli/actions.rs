//! Collaborator seam between the dispatcher and the services
//!
//! The dispatcher only knows this trait; the service container implements
//! it by calling the services and printing their outcomes.

use tracing::instrument;

use crate::application::services::{InstallOutcome, Versions, VerifyOutcome};
use crate::cli::error::CliResult;
use crate::cli::output::{detail, note, success, titleize};
use crate::config::INSTALL_BINARY_VAR;
use crate::domain::{CacheAction, OptionBag};
use crate::infrastructure::di::ServiceContainer;

/// Operations a dispatched command can invoke.
pub trait Actions {
    /// Package version plus the installed binary's version.
    fn versions(&self) -> CliResult<Versions>;

    /// Run headlessly; `None` if the child died without an exit code.
    fn run(&self, options: &OptionBag) -> CliResult<Option<i32>>;

    fn open(&self, options: &OptionBag) -> CliResult<()>;

    fn install(&self, options: &OptionBag) -> CliResult<()>;

    /// Verify the binary. `welcome_message` prints the opening banner.
    fn verify(&self, options: &OptionBag, welcome_message: bool) -> CliResult<()>;

    fn cache(&self, action: CacheAction) -> CliResult<()>;
}

impl Actions for ServiceContainer {
    fn versions(&self) -> CliResult<Versions> {
        Ok(self.binary.versions()?)
    }

    fn run(&self, options: &OptionBag) -> CliResult<Option<i32>> {
        Ok(self.runner.run(options)?)
    }

    fn open(&self, options: &OptionBag) -> CliResult<()> {
        Ok(self.runner.open(options)?)
    }

    #[instrument(skip(self))]
    fn install(&self, options: &OptionBag) -> CliResult<()> {
        match self.binary.install(options.flag("force"))? {
            InstallOutcome::Skipped => {
                self.console.out(&note(&format!(
                    "Skipping binary installation: Environment variable {} = 0.",
                    INSTALL_BINARY_VAR
                )));
            }
            InstallOutcome::AlreadyInstalled { version, dir } => {
                self.console.out(&format!(
                    "Cypress {} is installed in {}",
                    version,
                    dir.display()
                ));
                self.console.out("");
                self.console.out(&detail(
                    "Skipping installation: Pass the --force option if you'd like to reinstall anyway.",
                ));
            }
            InstallOutcome::Installed { version, dir } => {
                let version_part = format!("(version: {})", version);
                self.console
                    .out(&titleize(&["Installed Cypress", &version_part]));
                self.console
                    .out(&success(&format!("Installed in {}", dir.display())));
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn verify(&self, options: &OptionBag, welcome_message: bool) -> CliResult<()> {
        let binary = match self.binary.verify(options.flag("force"))? {
            VerifyOutcome::Verified { binary } | VerifyOutcome::AlreadyVerified { binary } => {
                binary
            }
        };
        self.console
            .out(&success(&format!("Verified Cypress! {}", binary.display())));
        if welcome_message {
            self.console.out("");
            self.console.out("Opening Cypress...");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn cache(&self, action: CacheAction) -> CliResult<()> {
        match action {
            CacheAction::Path => self.console.out(&self.cache.path().display().to_string()),
            CacheAction::List => {
                for version in self.cache.list()? {
                    self.console.out(&version);
                }
            }
            CacheAction::Clear => self.cache.clear()?,
        }
        Ok(())
    }
}
