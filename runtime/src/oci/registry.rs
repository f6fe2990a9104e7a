//! Registry tag listing.
//!
//! Uses the `oci-distribution` crate to list tags on container registries
//! (Docker Hub, GHCR, self-hosted distribution servers, etc.).

use std::collections::HashSet;

use async_trait::async_trait;
use drlatest_core::config::{Credentials, LATEST_TAG};
use drlatest_core::error::{Result, SyncError};
use oci_distribution::client::{ClientConfig, ClientProtocol};
use oci_distribution::secrets::RegistryAuth as OciRegistryAuth;
use oci_distribution::{Client, Reference};

use super::reference::RegistryTarget;

/// Page size requested when listing tags.
const TAG_PAGE_SIZE: usize = 1000;

/// Authentication credentials for a container registry.
#[derive(Debug, Clone)]
pub struct RegistryAuth {
    username: Option<String>,
    password: Option<String>,
}

impl RegistryAuth {
    /// Create anonymous authentication (no credentials).
    pub fn anonymous() -> Self {
        Self {
            username: None,
            password: None,
        }
    }

    /// Create basic authentication with username and password.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Create authentication from configured credentials.
    ///
    /// Falls back to anonymous unless both username and password are set.
    pub fn from_credentials(credentials: &Credentials) -> Self {
        if credentials.is_anonymous() {
            Self::anonymous()
        } else {
            Self::basic(&credentials.username, &credentials.password)
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_none() || self.password.is_none()
    }

    /// Convert to oci-distribution auth type.
    fn to_oci_auth(&self) -> OciRegistryAuth {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => OciRegistryAuth::Basic(u.clone(), p.clone()),
            _ => OciRegistryAuth::Anonymous,
        }
    }
}

/// Lists the tags available for a repository.
#[async_trait]
pub trait TagLister: Send + Sync {
    /// List all tags of `target.repository` on the target's registry.
    ///
    /// The returned tags are in registry order and may be empty.
    async fn list_tags(&self, target: &RegistryTarget, auth: &RegistryAuth) -> Result<Vec<String>>;
}

/// Tag lister backed by an OCI distribution client.
pub struct OciTagLister {
    https: Client,
    http: Client,
}

impl OciTagLister {
    /// Create a tag lister that verifies registry TLS certificates.
    pub fn new() -> Self {
        Self::with_insecure(false)
    }

    /// Create a tag lister, optionally accepting invalid TLS certificates.
    pub fn with_insecure(insecure: bool) -> Self {
        let client = |protocol| {
            Client::new(ClientConfig {
                protocol,
                accept_invalid_certificates: insecure,
                ..Default::default()
            })
        };

        Self {
            https: client(ClientProtocol::Https),
            http: client(ClientProtocol::Http),
        }
    }

    fn client_for(&self, target: &RegistryTarget) -> &Client {
        if target.is_plain_http() {
            &self.http
        } else {
            &self.https
        }
    }
}

impl Default for OciTagLister {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagLister for OciTagLister {
    async fn list_tags(&self, target: &RegistryTarget, auth: &RegistryAuth) -> Result<Vec<String>> {
        let oci_ref = to_oci_reference(target)?;
        let oci_auth = auth.to_oci_auth();
        let client = self.client_for(target);

        tracing::debug!(
            registry = %target.endpoint(),
            repository = %oci_ref.repository(),
            anonymous = auth.is_anonymous(),
            "Listing tags"
        );

        let mut tags: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut last: Option<String> = None;
        loop {
            let page = client
                .list_tags(&oci_ref, &oci_auth, Some(TAG_PAGE_SIZE), last.as_deref())
                .await
                .map_err(|e| SyncError::RegistryError {
                    registry: target.endpoint(),
                    message: format!("Failed to list tags for {}: {}", target.repository, e),
                })?;

            // A page may be shorter than `n` without being the last one.
            // Keep paging until a page brings no tag not seen before, which
            // also ends the loop on registries that ignore `last`.
            let before = tags.len();
            for tag in page.tags {
                if seen.insert(tag.clone()) {
                    tags.push(tag);
                }
            }
            if tags.len() == before {
                break;
            }

            last = tags.last().cloned();
            tracing::trace!(count = tags.len() - before, last = ?last, "Fetching next tag page");
        }

        tracing::debug!(
            registry = %target.endpoint(),
            repository = %target.repository,
            count = tags.len(),
            "Listed tags"
        );

        Ok(tags)
    }
}

/// Convert a RegistryTarget to an oci-distribution Reference.
///
/// The tag is irrelevant for listing; the leading slash of the path is not
/// part of the repository name on the wire.
fn to_oci_reference(target: &RegistryTarget) -> Result<Reference> {
    let repository = target.repository.trim_start_matches('/');
    if repository.is_empty() {
        return Err(SyncError::RegistryError {
            registry: target.endpoint(),
            message: "Empty repository path".to_string(),
        });
    }

    Ok(Reference::with_tag(
        target.host.clone(),
        repository.to_string(),
        LATEST_TAG.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(location: &str) -> RegistryTarget {
        RegistryTarget::parse(location).unwrap()
    }

    #[test]
    fn test_registry_auth_anonymous() {
        let auth = RegistryAuth::anonymous();
        assert!(auth.username.is_none());
        assert!(auth.password.is_none());
        assert!(auth.is_anonymous());
    }

    #[test]
    fn test_registry_auth_basic() {
        let auth = RegistryAuth::basic("user", "pass");
        assert_eq!(auth.username, Some("user".to_string()));
        assert_eq!(auth.password, Some("pass".to_string()));
        assert!(!auth.is_anonymous());
    }

    #[test]
    fn test_registry_auth_from_credentials() {
        let auth = RegistryAuth::from_credentials(&Credentials::new("user", "pass"));
        assert!(matches!(auth.to_oci_auth(), OciRegistryAuth::Basic(_, _)));

        let auth = RegistryAuth::from_credentials(&Credentials::new("user", ""));
        assert!(matches!(auth.to_oci_auth(), OciRegistryAuth::Anonymous));

        let auth = RegistryAuth::from_credentials(&Credentials::anonymous());
        assert!(matches!(auth.to_oci_auth(), OciRegistryAuth::Anonymous));
    }

    #[test]
    fn test_to_oci_reference_strips_leading_slash() {
        let oci_ref = to_oci_reference(&target("ghcr.io/org/app")).unwrap();
        assert_eq!(oci_ref.registry(), "ghcr.io");
        assert_eq!(oci_ref.repository(), "org/app");
    }

    #[test]
    fn test_to_oci_reference_keeps_port() {
        let oci_ref = to_oci_reference(&target("http://localhost:5000/app")).unwrap();
        assert_eq!(oci_ref.registry(), "localhost:5000");
        assert_eq!(oci_ref.repository(), "app");
    }

    #[test]
    fn test_to_oci_reference_empty_repository() {
        let err = to_oci_reference(&target("registry.example.com")).unwrap_err();
        assert!(matches!(err, SyncError::RegistryError { .. }));
    }

    #[test]
    fn test_client_selection() {
        let lister = OciTagLister::with_insecure(true);
        let http = target("http://localhost:5000/app");
        let https = target("registry.example.com/app");
        let oci = target("oci://registry.example.com/app");

        assert!(std::ptr::eq(lister.client_for(&http), &lister.http));
        assert!(std::ptr::eq(lister.client_for(&https), &lister.https));
        assert!(std::ptr::eq(lister.client_for(&oci), &lister.https));
    }
}
