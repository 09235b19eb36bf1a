//! Command front door for the Cypress test runner
//!
//! Parses the command line, normalizes options and hands them to one
//! collaborator. The capability probe decides how the child process
//! should render (TTY and color overrides).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
