//! CLI layer: argument parsing and command dispatch

pub mod actions;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod registry;

pub use actions::Actions;
pub use dispatch::{route, run_with, Dispatcher, Outcome};
pub use error::{CliError, CliResult};
