//! Domain layer: grammar types and pure logic
//!
//! This layer is independent of external concerns (no I/O, no CLI parsing, no config loading).

pub mod commands;
pub mod error;
pub mod options;
pub mod progress;
pub mod text;

pub use commands::{includes_version, is_known_command, CacheAction, Command, KNOWN_COMMANDS};
pub use error::{DomainError, UnknownKind};
pub use options::{coerce_false, OptionBag, OptionValue, ParsedOptions, OPTION_WHITELIST};
pub use progress::{calculate_eta, secs_remaining};
