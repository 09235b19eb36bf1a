//! Runner service
//!
//! Launches the binary in `run` or `open` mode with the capability probe's
//! environment overrides, so the child renders like this process would.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::probe::CapabilityProbe;
use crate::application::services::BinaryService;
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::OptionBag;
use crate::infrastructure::traits::CommandRunner;

/// `reporterOptions` -> `reporter-options`
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Turn a bag into `--key=value` arguments for the binary.
pub fn option_args(mode: &str, options: &OptionBag) -> Vec<String> {
    std::iter::once(mode.to_string())
        .chain(
            options
                .iter()
                .map(|(k, v)| format!("--{}={}", kebab_case(k), v)),
        )
        .collect()
}

/// Service for spawning the binary.
pub struct RunnerService {
    binary: Arc<BinaryService>,
    cmd: Arc<dyn CommandRunner>,
    probe: CapabilityProbe,
}

impl RunnerService {
    /// Create a new runner service.
    pub fn new(binary: Arc<BinaryService>, cmd: Arc<dyn CommandRunner>, probe: CapabilityProbe) -> Self {
        Self { binary, cmd, probe }
    }

    /// `dev` skips the binary check.
    fn ensure_verified(&self, options: &OptionBag) -> ApplicationResult<()> {
        if options.flag("dev") {
            debug!("dev mode: skipping binary verification");
            return Ok(());
        }
        self.binary.verify(false).map(|_| ())
    }

    /// Run tests headlessly and wait; returns the binary's exit code.
    #[instrument(skip(self))]
    pub fn run(&self, options: &OptionBag) -> ApplicationResult<Option<i32>> {
        self.ensure_verified(options)?;

        let binary = self.binary.binary_path();
        let args = option_args("run", options);
        debug!("spawning {} {:?}", binary.display(), args);
        self.cmd
            .status(&binary, &args, &self.probe.env_overrides())
            .with_path_context("spawn", &binary)
    }

    /// Open the interactive app; `detached` returns without waiting.
    #[instrument(skip(self))]
    pub fn open(&self, options: &OptionBag) -> ApplicationResult<()> {
        self.ensure_verified(options)?;

        let binary = self.binary.binary_path();
        let args = option_args("open", options);
        let env = self.probe.env_overrides();
        debug!("spawning {} {:?}", binary.display(), args);

        if options.flag("detached") {
            return self
                .cmd
                .spawn_detached(&binary, &args, &env)
                .with_path_context("spawn detached process", &binary);
        }
        self.cmd
            .status(&binary, &args, &env)
            .map(|_| ())
            .with_path_context("spawn", &binary)
    }
}
