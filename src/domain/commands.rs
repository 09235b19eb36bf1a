//! Commands the front door can route to

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, UnknownKind};

/// Every token accepted as the first argument after the program name.
pub const KNOWN_COMMANDS: &[&str] = &[
    "version",
    "run",
    "open",
    "install",
    "verify",
    "-v",
    "--version",
    "help",
    "-h",
    "--help",
    "cache",
];

/// Tokens that request version output wherever they appear.
pub const VERSION_TOKENS: &[&str] = &["version", "--version", "-v"];

/// Tokens that request top-level help when given first.
pub const HELP_TOKENS: &[&str] = &["help", "-h", "--help"];

pub fn is_known_command(token: &str) -> bool {
    KNOWN_COMMANDS.contains(&token)
}

/// True if any token asks for version output, not only the first one.
pub fn includes_version<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter().any(|a| VERSION_TOKENS.contains(&a.as_ref()))
}

/// Mutually exclusive actions of the `cache` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    List,
    Path,
    Clear,
}

impl CacheAction {
    pub const ALL: [CacheAction; 3] = [CacheAction::List, CacheAction::Path, CacheAction::Clear];

    pub fn name(self) -> &'static str {
        match self {
            CacheAction::List => "list",
            CacheAction::Path => "path",
            CacheAction::Clear => "clear",
        }
    }

    /// Parse the positional token given to `cache`.
    ///
    /// A missing or unrecognized token is an unknown sub-command.
    pub fn parse_token(token: Option<&str>) -> Result<Self, DomainError> {
        let token = token.unwrap_or_default();
        token.parse().map_err(|_| DomainError::UnknownOption {
            kind: UnknownKind::SubCommand,
            flag: format!("cache {}", token).trim_end().to_string(),
        })
    }
}

impl FromStr for CacheAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheAction::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or(())
    }
}

impl fmt::Display for CacheAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    Open,
    Install,
    Verify,
    Cache(CacheAction),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Run => "run",
            Command::Open => "open",
            Command::Install => "install",
            Command::Verify => "verify",
            Command::Cache(_) => "cache",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Cache(action) => write!(f, "cache {}", action),
            other => f.write_str(other.name()),
        }
    }
}
