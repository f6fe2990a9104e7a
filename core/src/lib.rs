//! drlatest core - foundational types.
//!
//! Error and configuration types shared by the resolution runtime and the
//! command-line shell.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Credentials, FailurePolicy, ResolveConfig, LATEST_TAG};
pub use error::{Result, SyncError};

/// drlatest version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
