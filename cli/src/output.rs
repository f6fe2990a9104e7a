//! YAML output of resolved tags.

use std::collections::BTreeMap;
use std::io::Write;

use drlatest_core::error::Result;

/// Write resolved tags as a single YAML mapping.
///
/// Nothing is written for an empty map, so "no images" stays distinct from an
/// empty document.
pub fn write_tags<W: Write>(writer: W, tags: &BTreeMap<String, String>) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }
    serde_yaml::to_writer(writer, tags)?;
    Ok(())
}
