//! Application services
//!
//! Default collaborators behind the dispatcher. Services depend on I/O
//! boundary traits (FileSystem, CommandRunner, etc.) but are themselves
//! concrete structs, not traits.

mod binary;
mod cache;
mod runner;

pub use binary::{BinaryService, InstallOutcome, Versions, VerifyOutcome};
pub use cache::CacheService;
pub use runner::{kebab_case, option_args, RunnerService};
