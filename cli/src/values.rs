//! YAML values loading.
//!
//! Values files are read in order and their top-level mappings merged into
//! one; a key seen again overwrites the earlier value. Files may hold several
//! documents, which merge the same way.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use drlatest_core::config::ResolveConfig;
use drlatest_core::error::{Result, SyncError};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Read and merge values files in order.
pub fn load_files(paths: &[PathBuf]) -> Result<Mapping> {
    let mut merged = Mapping::new();
    for path in paths {
        merge_file(&mut merged, path)?;
    }
    Ok(merged)
}

/// Merge every document of one values file into `merged`.
pub fn merge_file(merged: &mut Mapping, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| SyncError::InputError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut documents = 0usize;
    for document in serde_yaml::Deserializer::from_str(&content) {
        let value = Value::deserialize(document).map_err(|e| SyncError::InputError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match value {
            Value::Mapping(mapping) => {
                for (key, value) in mapping {
                    if let Some(previous) = merged.insert(key.clone(), value) {
                        tracing::debug!(
                            file = %path.display(),
                            key = ?key,
                            previous = ?previous,
                            "Overriding value"
                        );
                    }
                }
            }
            Value::Null => {}
            other => {
                return Err(SyncError::InputError {
                    path: path.to_path_buf(),
                    message: format!("top level is not a mapping: {}", kind(&other)),
                })
            }
        }
        documents += 1;
    }

    tracing::debug!(file = %path.display(), documents, "Loaded values file");
    Ok(())
}

/// Collect image declarations: string keys starting with the configured
/// prefix, with their values rendered as strings.
pub fn image_declarations(values: &Mapping, config: &ResolveConfig) -> BTreeMap<String, String> {
    let mut declarations = BTreeMap::new();
    for (key, value) in values {
        let Some(key) = key.as_str() else {
            continue;
        };
        if !config.is_image_key(key) {
            continue;
        }
        match scalar_string(value) {
            Some(location) => {
                declarations.insert(key.to_string(), location);
            }
            None => {
                tracing::warn!(key, kind = kind(value), "Image location is not a scalar, skipping");
            }
        }
    }
    declarations
}

/// Render a scalar as a string; `None` for sequences and mappings.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
