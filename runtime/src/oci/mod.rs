//! Container registry support.
//!
//! - Image location normalization (`reference`)
//! - Tag listing against OCI distribution registries (`registry`)
//! - Dotted-numeric tag ordering (`version`)

pub mod reference;
pub mod registry;
pub mod version;

pub use reference::RegistryTarget;
pub use registry::{OciTagLister, RegistryAuth, TagLister};
pub use version::{compare_versions, latest_tag, sort_versions};
