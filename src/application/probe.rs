//! Capability probe: TTY and color facts for this process and its children
//!
//! A child process detects its own streams, and that detection disagrees with
//! ours whenever we are piped or run under CI. The probe computes what *we*
//! see and turns it into `FORCE_*` environment variables so the child renders
//! the same way.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::env::is_ci;
use crate::infrastructure::traits::{EnvSource, StdStream, Terminal};

pub const FORCE_STDIN_TTY: &str = "FORCE_STDIN_TTY";
pub const FORCE_STDOUT_TTY: &str = "FORCE_STDOUT_TTY";
pub const FORCE_STDERR_TTY: &str = "FORCE_STDERR_TTY";
pub const FORCE_COLOR: &str = "FORCE_COLOR";
pub const DEBUG_COLORS: &str = "DEBUG_COLORS";
pub const MOCHA_COLORS: &str = "MOCHA_COLORS";

/// Per-stream TTY hints for a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceTtyOverrides {
    pub stdin: bool,
    pub stdout: bool,
    pub stderr: bool,
}

/// Color hints for a child process.
///
/// `mocha_colors` is `None` when color is unsupported: consumers tell
/// "unset" apart from "off".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOverrides {
    pub color: bool,
    pub debug_colors: bool,
    pub mocha_colors: Option<bool>,
}

/// Answers TTY/color questions from an environment and a terminal.
///
/// Nothing is cached; every query reads the sources again.
#[derive(Clone)]
pub struct CapabilityProbe {
    env: Arc<dyn EnvSource>,
    terminal: Arc<dyn Terminal>,
}

impl CapabilityProbe {
    pub fn new(env: Arc<dyn EnvSource>, terminal: Arc<dyn Terminal>) -> Self {
        Self { env, terminal }
    }

    pub fn is_tty(&self, stream: StdStream) -> bool {
        self.terminal.is_tty(stream)
    }

    /// `NO_COLOR` wins, then `CI`, then both stdout and stderr must agree.
    ///
    /// CI providers often report non-TTY streams but render ANSI color in
    /// their log viewers, hence the unconditional `true`.
    pub fn supports_color(&self) -> bool {
        if self.env.is_set("NO_COLOR") {
            return false;
        }
        if is_ci(self.env.as_ref()) {
            return true;
        }
        self.terminal.stream_supports_color(StdStream::Stdout)
            && self.terminal.stream_supports_color(StdStream::Stderr)
    }

    pub fn force_tty_overrides(&self) -> ForceTtyOverrides {
        ForceTtyOverrides {
            stdin: self.is_tty(StdStream::Stdin),
            stdout: self.is_tty(StdStream::Stdout),
            stderr: self.is_tty(StdStream::Stderr),
        }
    }

    pub fn env_color_overrides(&self) -> ColorOverrides {
        let sc = self.supports_color();
        ColorOverrides {
            color: sc,
            debug_colors: sc,
            mocha_colors: sc.then_some(true),
        }
    }

    /// Environment for a child process: `"1"`/`"0"` per hint, absent hints omitted.
    pub fn env_overrides(&self) -> BTreeMap<String, String> {
        let colors = self.env_color_overrides();
        let tty = self.force_tty_overrides();

        let hints: [(&str, Option<bool>); 6] = [
            (FORCE_COLOR, Some(colors.color)),
            (DEBUG_COLORS, Some(colors.debug_colors)),
            (MOCHA_COLORS, colors.mocha_colors),
            (FORCE_STDIN_TTY, Some(tty.stdin)),
            (FORCE_STDOUT_TTY, Some(tty.stdout)),
            (FORCE_STDERR_TTY, Some(tty.stderr)),
        ];

        let overrides: BTreeMap<String, String> = hints
            .into_iter()
            .filter_map(|(k, v)| v.map(|b| (k.to_string(), bool_to_env(b))))
            .collect();
        debug!(?overrides, "child environment overrides");
        overrides
    }
}

fn bool_to_env(value: bool) -> String {
    let s = if value { "1" } else { "0" };
    s.to_string()
}

impl std::fmt::Debug for CapabilityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityProbe").finish_non_exhaustive()
    }
}
