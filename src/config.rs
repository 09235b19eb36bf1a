//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cypress/cypress.toml`
//! 3. Environment variables, each looked up as `<NAME>`, `npm_config_<NAME>`,
//!    then `npm_package_config_<NAME>`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::env::get_env;
use crate::application::ApplicationError;
use crate::infrastructure::traits::EnvSource;

/// Env var naming the binary cache folder.
pub const CACHE_FOLDER_VAR: &str = "CYPRESS_CACHE_FOLDER";
/// Env var pointing at a binary to run instead of the cached one.
pub const RUN_BINARY_VAR: &str = "CYPRESS_RUN_BINARY";
/// Env var naming a local binary to install, or `0` to skip installing.
pub const INSTALL_BINARY_VAR: &str = "CYPRESS_INSTALL_BINARY";

/// Folder name of the binary inside a versioned cache entry.
const BINARY_DIR: &str = "Cypress";

/// Unified configuration for the front door.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Where versioned binaries live (default: platform cache dir + `Cypress`)
    pub cache_folder: PathBuf,
    /// Run this binary instead of the cached one
    pub run_binary: Option<PathBuf>,
    /// Install source: a local binary path, or `0` to skip installation
    pub install_binary: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_folder: default_cache_folder(),
            run_binary: None,
            install_binary: None,
        }
    }
}

fn default_cache_folder() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.cache_dir().join(BINARY_DIR))
        .unwrap_or_else(|| PathBuf::from("~/.cache").join(BINARY_DIR))
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cypress").map(|dirs| dirs.config_dir().join("cypress.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`; leave the input alone if a variable is undefined.
fn expand(s: &str) -> String {
    shellexpand::full(s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

impl Settings {
    /// Load settings from the global config file (if any) and the environment.
    pub fn load(env: &dyn EnvSource) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), env)
    }

    /// Load settings with an explicit config file location.
    pub fn load_from(config_file: Option<&Path>, env: &dyn EnvSource) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "cache_folder",
                defaults.cache_folder.to_string_lossy().to_string(),
            )
            .map_err(config_err)?;

        if let Some(path) = config_file {
            debug!("config file: {}", path.display());
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        // Environment replaces file values: explicit user override
        builder = builder
            .set_override_option("cache_folder", get_env(env, CACHE_FOLDER_VAR))
            .map_err(config_err)?
            .set_override_option("run_binary", get_env(env, RUN_BINARY_VAR))
            .map_err(config_err)?
            .set_override_option("install_binary", get_env(env, INSTALL_BINARY_VAR))
            .map_err(config_err)?;

        let mut settings: Settings = builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;
        settings.expand_paths();

        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    fn expand_paths(&mut self) {
        self.cache_folder = PathBuf::from(expand(&self.cache_folder.to_string_lossy()));
        self.run_binary = self
            .run_binary
            .as_ref()
            .map(|p| PathBuf::from(expand(&p.to_string_lossy())));
    }

    /// Cache entry for one binary version.
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.cache_folder.join(version)
    }

    /// Where `install` puts the executable for `version`.
    pub fn cached_binary_path(&self, version: &str) -> PathBuf {
        self.version_dir(version).join(BINARY_DIR).join(BINARY_DIR)
    }

    /// Executable for `version`, honoring the run-binary override.
    pub fn binary_path(&self, version: &str) -> PathBuf {
        self.run_binary
            .clone()
            .unwrap_or_else(|| self.cached_binary_path(version))
    }

    /// True if installation was explicitly switched off (`CYPRESS_INSTALL_BINARY=0`).
    pub fn skip_install(&self) -> bool {
        self.install_binary.as_deref() == Some("0")
    }
}
