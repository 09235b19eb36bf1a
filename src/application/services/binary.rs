//! Binary service
//!
//! Locates the externally-managed binary, resolves its version, runs its
//! smoke test and installs it from a local source.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::env::is_post_install;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::{Settings, INSTALL_BINARY_VAR};
use crate::domain::text::{is_semver, stdout_line_matches};
use crate::infrastructure::traits::{CommandRunner, EnvSource, FileSystem};
use crate::util::path::form_absolute_path;

/// Marker written next to a binary once its smoke test passed.
const VERIFIED_MARKER: &str = "verified";

/// Package and binary versions, as printed by `cypress version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub package: String,
    pub binary: String,
}

/// Result of a verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Smoke test ran and passed.
    Verified { binary: PathBuf },
    /// Already verified and not forced.
    AlreadyVerified { binary: PathBuf },
}

/// Result of an install request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// `CYPRESS_INSTALL_BINARY=0`
    Skipped,
    AlreadyInstalled { version: String, dir: PathBuf },
    Installed { version: String, dir: PathBuf },
}

/// Service for the binary's lifecycle.
pub struct BinaryService {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    env: Arc<dyn EnvSource>,
    cwd: PathBuf,
    package_version: String,
}

impl BinaryService {
    /// Create a new binary service.
    pub fn new(
        settings: Arc<Settings>,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        env: Arc<dyn EnvSource>,
        cwd: PathBuf,
        package_version: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            fs,
            cmd,
            env,
            cwd,
            package_version: package_version.into(),
        }
    }

    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Executable to launch for this package version.
    pub fn binary_path(&self) -> PathBuf {
        self.settings.binary_path(&self.package_version)
    }

    fn require_binary(&self) -> ApplicationResult<PathBuf> {
        let path = self.binary_path();
        if !self.fs.is_file(&path) {
            return Err(ApplicationError::BinaryNotFound(path));
        }
        Ok(path)
    }

    /// Package version plus the version the binary reports.
    #[instrument(skip(self))]
    pub fn versions(&self) -> ApplicationResult<Versions> {
        let path = self.require_binary()?;
        let output = self
            .cmd
            .output(&path, &["--version".to_string()])
            .map_err(|e| ApplicationError::Resolution {
                message: format!("{}: {}", path.display(), e),
            })?;

        if !output.status.success() {
            return Err(ApplicationError::Resolution {
                message: format!("{} --version exited with {}", path.display(), output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = stdout.split_whitespace().last().unwrap_or_default();
        if !is_semver(reported) {
            return Err(ApplicationError::Resolution {
                message: format!("unexpected version output: {:?}", stdout.trim()),
            });
        }

        Ok(Versions {
            package: self.package_version.clone(),
            binary: reported.to_string(),
        })
    }

    /// Run the binary's smoke test unless it already passed (or `force`).
    ///
    /// The binary must echo the ping value back on a line of its own. A
    /// `CYPRESS_RUN_BINARY` override is verified every time.
    #[instrument(skip(self))]
    pub fn verify(&self, force: bool) -> ApplicationResult<VerifyOutcome> {
        let binary = self.require_binary()?;
        let marker = self.marker_path();

        if let Some(marker) = marker.as_deref().filter(|m| !force && self.fs.exists(m)) {
            debug!("binary already verified: {}", marker.display());
            return Ok(VerifyOutcome::AlreadyVerified { binary });
        }

        let ping = std::process::id().to_string();
        let args = vec!["--smoke-test".to_string(), format!("--ping={}", ping)];
        let output = self
            .cmd
            .output(&binary, &args)
            .with_path_context("run smoke test", &binary)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() || !stdout_line_matches(&ping, &stdout) {
            return Err(ApplicationError::Verification {
                message: format!(
                    "This command failed with the following output:\n\n{} {}\n\n{}\n{}",
                    binary.display(),
                    args.join(" "),
                    stdout.trim(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        if let Some(marker) = marker {
            self.fs
                .write(&marker, &self.package_version)
                .with_path_context("write verification marker", &marker)?;
        }
        Ok(VerifyOutcome::Verified { binary })
    }

    fn marker_path(&self) -> Option<PathBuf> {
        if self.settings.run_binary.is_some() {
            return None;
        }
        Some(
            self.settings
                .version_dir(&self.package_version)
                .join(VERIFIED_MARKER),
        )
    }

    /// Copy a local binary into the cache.
    ///
    /// Downloads are not performed: the source must be a file path.
    #[instrument(skip(self))]
    pub fn install(&self, force: bool) -> ApplicationResult<InstallOutcome> {
        if self.settings.skip_install() {
            return Ok(InstallOutcome::Skipped);
        }

        let version = self.package_version.clone();
        let dir = self.settings.version_dir(&version);
        let target = self.settings.cached_binary_path(&version);

        if !force && self.fs.is_file(&target) {
            return Ok(InstallOutcome::AlreadyInstalled { version, dir });
        }

        let source = self.settings.install_binary.clone().ok_or_else(|| ApplicationError::Install {
            message: format!(
                "no install source configured; set {} to the path of a Cypress binary",
                INSTALL_BINARY_VAR
            ),
        })?;
        if is_semver(&source) {
            return Err(ApplicationError::Install {
                message: format!(
                    "{}={} names a version; only local binary paths can be installed",
                    INSTALL_BINARY_VAR, source
                ),
            });
        }

        let source = if is_post_install(self.env.as_ref()) {
            form_absolute_path(Path::new(&source), &self.cwd)
        } else {
            PathBuf::from(source)
        };
        if !self.fs.is_file(&source) {
            return Err(ApplicationError::Install {
                message: format!("binary not found: {}", source.display()),
            });
        }

        debug!("installing {} -> {}", source.display(), target.display());
        self.fs
            .ensure_parent(&target)
            .with_path_context("create install directory", &target)?;
        self.fs
            .copy(&source, &target)
            .with_path_context("copy binary", &target)?;

        Ok(InstallOutcome::Installed { version, dir })
    }
}
