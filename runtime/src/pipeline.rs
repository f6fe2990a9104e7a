//! Latest tag resolution for a set of image declarations.
//!
//! For every declaration: parse the location, list the registry's tags, pick
//! the highest one, and record it under the remapped output key.
//!
//! Declarations are taken in key order. Up to `concurrency` registry calls
//! run at once but results are applied in key order.
//!
//! Keys carrying the configured prefix remap one-to-one. A key without it
//! gets the replacement prepended and can land on the same output key as a
//! prefixed one; the later key in key order then wins. The binary filters by
//! prefix before resolving, so only direct library callers can hit this.

use std::collections::BTreeMap;

use drlatest_core::config::{FailurePolicy, ResolveConfig, LATEST_TAG};
use drlatest_core::error::{Result, SyncError};
use futures::stream::{self, StreamExt};

use crate::oci::{latest_tag, RegistryAuth, RegistryTarget, TagLister};

/// Outcome of a resolution run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Output key → selected tag
    pub tags: BTreeMap<String, String>,
    /// Declaration keys that produced no tag
    pub skipped: Vec<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Per-declaration result before aggregation.
enum Outcome {
    Resolved {
        key: String,
        output_key: String,
        tag: String,
    },
    Skipped {
        key: String,
    },
}

/// Resolves declarations against container registries.
pub struct Resolver<L> {
    config: ResolveConfig,
    lister: L,
    auth: RegistryAuth,
}

impl<L: TagLister> Resolver<L> {
    pub fn new(config: ResolveConfig, lister: L) -> Self {
        let auth = RegistryAuth::from_credentials(&config.credentials);
        Self {
            config,
            lister,
            auth,
        }
    }

    /// Resolve every declaration (key → image location).
    ///
    /// Fails on the first malformed location, and under the strict policy on
    /// the first registry error or empty tag list.
    pub async fn resolve_all(&self, declarations: &BTreeMap<String, String>) -> Result<Resolution> {
        tracing::debug!(
            count = declarations.len(),
            policy = %self.config.policy,
            concurrency = self.config.concurrency,
            "Resolving image declarations"
        );

        let mut outcomes = stream::iter(
            declarations
                .iter()
                .map(|(key, location)| self.resolve_one(key, location)),
        )
        .buffered(self.config.concurrency.max(1));

        let mut resolution = Resolution::default();
        while let Some(outcome) = outcomes.next().await {
            match outcome? {
                Outcome::Resolved {
                    key,
                    output_key,
                    tag,
                } => {
                    if let Some(previous) = resolution.tags.insert(output_key.clone(), tag) {
                        tracing::warn!(
                            key = %key,
                            output_key = %output_key,
                            previous = %previous,
                            "Output key collision, overwriting previous tag"
                        );
                    }
                }
                Outcome::Skipped { key } => resolution.skipped.push(key),
            }
        }

        tracing::info!(
            resolved = resolution.tags.len(),
            skipped = resolution.skipped.len(),
            "Resolution finished"
        );

        Ok(resolution)
    }

    async fn resolve_one(&self, key: &str, location: &str) -> Result<Outcome> {
        if location.is_empty() {
            tracing::warn!(key, "Empty image location, skipping");
            return Ok(Outcome::Skipped { key: key.to_string() });
        }

        tracing::debug!(key, location, "Resolving image");
        let target = RegistryTarget::parse(location)?;
        tracing::debug!(
            key,
            registry = %target.endpoint(),
            repository = %target.repository,
            "Parsed image location"
        );

        let tags = match self.lister.list_tags(&target, &self.auth).await {
            Ok(tags) => tags,
            Err(e) => match self.config.policy {
                FailurePolicy::Strict => return Err(e),
                FailurePolicy::Lenient => {
                    tracing::warn!(key, location, error = %e, "Failed to list tags, skipping");
                    return Ok(Outcome::Skipped { key: key.to_string() });
                }
            },
        };

        let tag = match latest_tag(&tags) {
            Some(tag) => tag.to_string(),
            None => match self.config.policy {
                FailurePolicy::Strict => {
                    return Err(SyncError::NoTags {
                        repository: target.to_string(),
                    })
                }
                FailurePolicy::Lenient => {
                    tracing::warn!(key, location, "No tags listed, using '{}'", LATEST_TAG);
                    LATEST_TAG.to_string()
                }
            },
        };

        let output_key = self.config.output_key(key);
        tracing::debug!(key, output_key = %output_key, tag = %tag, "Selected tag");

        Ok(Outcome::Resolved {
            key: key.to_string(),
            output_key,
            tag,
        })
    }
}
