//! I/O boundary traits for testability
//!
//! These traits abstract process-wide state (standard streams, environment,
//! terminal, filesystem, child processes), allowing the dispatcher and
//! services to be tested with fake implementations.

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::Arc;

/// One of the three standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdStream {
    Stdin,
    Stdout,
    Stderr,
}

/// Line-oriented writer for the process's stdout/stderr.
pub trait Console: Send + Sync {
    /// Write one line to standard output.
    fn out(&self, line: &str);

    /// Write one line to standard error.
    fn err(&self, line: &str);
}

/// Read access to environment variables.
pub trait EnvSource: Send + Sync {
    /// Value of `name`, or None if unset or not valid unicode.
    fn var(&self, name: &str) -> Option<String>;

    /// True if `name` is set to a non-empty value.
    fn is_set(&self, name: &str) -> bool {
        self.var(name).is_some_and(|v| !v.is_empty())
    }
}

/// Terminal facts about the standard streams.
pub trait Terminal: Send + Sync {
    /// Whether the stream is attached to an interactive terminal.
    fn is_tty(&self, stream: StdStream) -> bool;

    /// Whether the stream can render ANSI color on its own.
    fn stream_supports_color(&self, stream: StdStream) -> bool;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and all its contents.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy file from source to destination.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Immediate subdirectories of `path`, sorted by name.
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its output.
    fn output(&self, cmd: &Path, args: &[String]) -> io::Result<Output>;

    /// Run a command with inherited stdio and extra environment, wait for it,
    /// and return its exit code (None if killed by a signal).
    fn status(
        &self,
        cmd: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> io::Result<Option<i32>>;

    /// Start a command with extra environment and do not wait for it.
    fn spawn_detached(
        &self,
        cmd: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real console writing to the process's stdout/stderr.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn out(&self, line: &str) {
        println!("{}", line);
    }

    fn err(&self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Real environment backed by `std::env`.
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Real terminal detection on the process's own streams.
///
/// `TERM=dumb` disables color; `FORCE_COLOR` (anything but `0`/`false`)
/// forces it; otherwise a stream has color when it is a TTY.
pub struct StdTerminal {
    env: Arc<dyn EnvSource>,
}

impl StdTerminal {
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self { env }
    }
}

impl Terminal for StdTerminal {
    fn is_tty(&self, stream: StdStream) -> bool {
        match stream {
            StdStream::Stdin => io::stdin().is_terminal(),
            StdStream::Stdout => io::stdout().is_terminal(),
            StdStream::Stderr => io::stderr().is_terminal(),
        }
    }

    fn stream_supports_color(&self, stream: StdStream) -> bool {
        if self.env.var("TERM").as_deref() == Some("dumb") {
            return false;
        }
        if self
            .env
            .var("FORCE_COLOR")
            .is_some_and(|v| v != "0" && v != "false")
        {
            return true;
        }
        self.is_tty(stream)
    }
}

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn list_dirs(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        let mut dirs = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
        Ok(dirs)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn output(&self, cmd: &Path, args: &[String]) -> io::Result<Output> {
        std::process::Command::new(cmd).args(args).output()
    }

    fn status(
        &self,
        cmd: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> io::Result<Option<i32>> {
        let status = std::process::Command::new(cmd)
            .args(args)
            .envs(env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.code())
    }

    fn spawn_detached(
        &self,
        cmd: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> io::Result<()> {
        std::process::Command::new(cmd)
            .args(args)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}
