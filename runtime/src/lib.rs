//! drlatest runtime - latest tag resolution for container images.
//!
//! Turns image locations into registry targets, lists their tags, and picks
//! the highest version-like tag for each declaration.

pub mod oci;
pub mod pipeline;

// Re-export common types
pub use oci::{compare_versions, latest_tag, sort_versions};
pub use oci::{OciTagLister, RegistryAuth, RegistryTarget, TagLister};
pub use pipeline::{Resolution, Resolver};

/// drlatest runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
