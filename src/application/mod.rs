//! Application layer: capability probe and collaborator services
//!
//! This layer depends on I/O boundary traits, never on real process state.

pub mod env;
pub mod error;
pub mod error_ext;
pub mod probe;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use probe::{CapabilityProbe, ColorOverrides, ForceTtyOverrides};
