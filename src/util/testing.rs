//! Test support: one-time logging setup and fakes for the I/O boundary traits

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{CommandRunner, Console, EnvSource, StdStream, Terminal};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Console that records every line instead of printing it.
#[derive(Debug, Default)]
pub struct CapturedConsole {
    out: Mutex<Vec<String>>,
    err: Mutex<Vec<String>>,
}

impl CapturedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written to stdout, one line per entry.
    pub fn out_lines(&self) -> Vec<String> {
        self.out.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Everything written to stderr, one line per entry.
    pub fn err_lines(&self) -> Vec<String> {
        self.err.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn stdout(&self) -> String {
        self.out_lines().join("\n")
    }

    pub fn stderr(&self) -> String {
        self.err_lines().join("\n")
    }
}

impl Console for CapturedConsole {
    fn out(&self, line: &str) {
        if let Ok(mut out) = self.out.lock() {
            out.push(line.to_string());
        }
    }

    fn err(&self, line: &str) {
        if let Ok(mut err) = self.err.lock() {
            err.push(line.to_string());
        }
    }
}

/// Environment backed by a fixed map.
#[derive(Debug, Default, Clone)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Terminal with fixed answers per stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedTerminal {
    pub stdin_tty: bool,
    pub stdout_tty: bool,
    pub stderr_tty: bool,
    pub stdout_color: bool,
    pub stderr_color: bool,
}

impl FixedTerminal {
    /// Interactive session: every stream is a color-capable TTY.
    pub fn interactive() -> Self {
        Self {
            stdin_tty: true,
            stdout_tty: true,
            stderr_tty: true,
            stdout_color: true,
            stderr_color: true,
        }
    }

    /// Fully piped: no TTY, no color.
    pub fn piped() -> Self {
        Self::default()
    }
}

impl Terminal for FixedTerminal {
    fn is_tty(&self, stream: StdStream) -> bool {
        match stream {
            StdStream::Stdin => self.stdin_tty,
            StdStream::Stdout => self.stdout_tty,
            StdStream::Stderr => self.stderr_tty,
        }
    }

    fn stream_supports_color(&self, stream: StdStream) -> bool {
        match stream {
            StdStream::Stdin => false,
            StdStream::Stdout => self.stdout_color,
            StdStream::Stderr => self.stderr_color,
        }
    }
}

/// One recorded child-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub cmd: PathBuf,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub detached: bool,
}

/// Command runner that records calls and replays scripted results.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    stdout: String,
    success: bool,
    exit_code: Option<i32>,
    launch_error: Option<io::ErrorKind>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    /// Captured runs succeed with `stdout`; waited runs exit with `exit_code`.
    pub fn new(stdout: &str, exit_code: Option<i32>) -> Self {
        Self {
            stdout: stdout.to_string(),
            success: true,
            exit_code,
            launch_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every spawn fails with `kind`, as if the binary could not be executed.
    pub fn unlaunchable(kind: io::ErrorKind) -> Self {
        Self {
            launch_error: Some(kind),
            ..Self::default()
        }
    }

    fn launch(&self) -> io::Result<()> {
        match self.launch_error {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(()),
        }
    }

    /// Captured runs exit non-zero with empty stdout.
    pub fn failing() -> Self {
        Self {
            success: false,
            exit_code: Some(1),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn record(&self, cmd: &Path, args: &[String], env: &BTreeMap<String, String>, detached: bool) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                cmd: cmd.to_path_buf(),
                args: args.to_vec(),
                env: env.clone(),
                detached,
            });
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn output(&self, cmd: &Path, args: &[String]) -> io::Result<Output> {
        self.record(cmd, args, &BTreeMap::new(), false);
        self.launch()?;
        Ok(Output {
            status: exit_status(if self.success { 0 } else { 1 }),
            stdout: self.stdout.clone().into_bytes(),
            stderr: Vec::new(),
        })
    }

    fn status(
        &self,
        cmd: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> io::Result<Option<i32>> {
        self.record(cmd, args, env, false);
        self.launch()?;
        Ok(self.exit_code)
    }

    fn spawn_detached(
        &self,
        cmd: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> io::Result<()> {
        self.record(cmd, args, env, true);
        self.launch()
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code as u32)
}
