//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// What kind of token the unknown-option policy is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKind {
    /// A `-x` / `--xyz` flag that the matched subcommand does not declare.
    Option,
    /// A positional token where a fixed sub-action name was expected (`cache <x>`).
    SubCommand,
}

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownKind::Option => f.write_str("option"),
            UnknownKind::SubCommand => f.write_str("sub-command"),
        }
    }
}

/// Domain errors represent invocations that violate the command grammar.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),

    #[error("error: unknown {kind}: {flag}")]
    UnknownOption { kind: UnknownKind, flag: String },

    #[error("{0}")]
    InvalidArgs(String),
}
