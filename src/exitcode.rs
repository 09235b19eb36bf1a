//! Process exit codes

/// Successful termination
pub const OK: i32 = 0;

/// Usage error, collaborator failure, or unresolved version
pub const FAILURE: i32 = 1;
