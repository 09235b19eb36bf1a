//! Environment lookups with package-manager fallbacks

use tracing::debug;

use crate::infrastructure::traits::EnvSource;

/// Resolve `name` from the environment.
///
/// Precedence: `<name>`, then `npm_config_<name>` (set by `npm --<name>=`),
/// then `npm_package_config_<name>` (the `config` block of the project's
/// package manifest). Empty values are skipped.
pub fn get_env(env: &dyn EnvSource, name: &str) -> Option<String> {
    let candidates = [
        (name.to_string(), "environment variable"),
        (format!("npm_config_{}", name), "npm config"),
        (format!("npm_package_config_{}", name), "package.json config"),
    ];

    for (key, source) in candidates {
        if let Some(value) = env.var(&key).filter(|v| !v.is_empty()) {
            debug!("Using {} from {}", name, source);
            return Some(value);
        }
    }
    None
}

pub fn is_ci(env: &dyn EnvSource) -> bool {
    env.is_set("CI")
}

/// True when running as the package's own `postinstall` hook.
pub fn is_post_install(env: &dyn EnvSource) -> bool {
    env.var("npm_lifecycle_event").as_deref() == Some("postinstall")
}
