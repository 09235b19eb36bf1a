//! Service container for dependency injection
//!
//! Wires up the probe and collaborator services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{BinaryService, CacheService, RunnerService};
use crate::application::CapabilityProbe;
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, Console, EnvSource, FileSystem, ProcessEnv, RealCommandRunner, RealFileSystem,
    StdConsole, StdTerminal, Terminal,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Package version the binary must match.
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The process handle: every piece of global state the services touch.
#[derive(Clone)]
pub struct Deps {
    pub fs: Arc<dyn FileSystem>,
    pub cmd: Arc<dyn CommandRunner>,
    pub env: Arc<dyn EnvSource>,
    pub terminal: Arc<dyn Terminal>,
    pub console: Arc<dyn Console>,
    pub cwd: PathBuf,
}

impl Deps {
    /// Real implementations bound to this process.
    pub fn real(cwd: PathBuf) -> Self {
        let env: Arc<dyn EnvSource> = Arc::new(ProcessEnv);
        Self {
            fs: Arc::new(RealFileSystem),
            cmd: Arc::new(RealCommandRunner),
            terminal: Arc::new(StdTerminal::new(env.clone())),
            env,
            console: Arc::new(StdConsole),
            cwd,
        }
    }
}

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Where user-facing output goes
    pub console: Arc<dyn Console>,

    pub probe: CapabilityProbe,
    pub binary: Arc<BinaryService>,
    pub runner: RunnerService,
    pub cache: CacheService,
}

impl ServiceContainer {
    /// Load settings from this process's environment and wire real implementations.
    pub fn from_process() -> InfraResult<Self> {
        let cwd = std::env::current_dir().map_err(InfraError::WorkingDir)?;
        let deps = Deps::real(cwd);
        let settings = Settings::load(deps.env.as_ref())?;
        Ok(Self::with_deps(settings, deps))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, deps: Deps) -> Self {
        Self::with_version(settings, deps, PACKAGE_VERSION)
    }

    /// Like [`ServiceContainer::with_deps`] with an explicit package version.
    pub fn with_version(settings: Settings, deps: Deps, package_version: &str) -> Self {
        let settings = Arc::new(settings);
        let probe = CapabilityProbe::new(deps.env.clone(), deps.terminal.clone());
        let binary = Arc::new(BinaryService::new(
            settings.clone(),
            deps.fs.clone(),
            deps.cmd.clone(),
            deps.env.clone(),
            deps.cwd.clone(),
            package_version,
        ));
        let runner = RunnerService::new(binary.clone(), deps.cmd.clone(), probe.clone());
        let cache = CacheService::new(settings.clone(), deps.fs.clone());

        Self {
            settings,
            console: deps.console,
            probe,
            binary,
            runner,
            cache,
        }
    }
}
