use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Tag reported when a registry lists no tags under the lenient policy.
pub const LATEST_TAG: &str = "latest";

/// How per-image registry failures are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log and skip failed images; empty tag lists fall back to `latest`.
    #[default]
    Lenient,
    /// Abort the run on the first failed image or empty tag list.
    Strict,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Static registry credentials.
///
/// Anonymous unless both username and password are non-empty.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolution configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Prefix selecting image location keys (e.g. `image.`)
    pub key_prefix: String,

    /// Prefix substituted for `key_prefix` in output keys (e.g. `tag.`)
    pub key_prefix_replace: String,

    /// Registry credentials
    pub credentials: Credentials,

    /// Per-image failure handling
    pub policy: FailurePolicy,

    /// Maximum number of registry calls in flight
    pub concurrency: usize,

    /// Accept invalid TLS certificates from registries
    pub insecure: bool,
}

impl ResolveConfig {
    /// Create a configuration with default policy, anonymous access and
    /// sequential resolution.
    pub fn new(key_prefix: impl Into<String>, key_prefix_replace: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            key_prefix_replace: key_prefix_replace.into(),
            credentials: Credentials::anonymous(),
            policy: FailurePolicy::default(),
            concurrency: 1,
            insecure: true,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Check startup invariants: both prefixes set, concurrency at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.key_prefix.is_empty() {
            return Err(SyncError::ConfigError("KeyPrefix is empty".to_string()));
        }
        if self.key_prefix_replace.is_empty() {
            return Err(SyncError::ConfigError(
                "KeyPrefixReplace is empty".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(SyncError::ConfigError(
                "Concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a values key declares an image location.
    pub fn is_image_key(&self, key: &str) -> bool {
        key.starts_with(&self.key_prefix)
    }

    /// Map a declaration key to its output key.
    ///
    /// Only the leading occurrence of `key_prefix` is replaced; keys without
    /// the prefix get the replacement prepended unchanged.
    pub fn output_key(&self, key: &str) -> String {
        let suffix = key.strip_prefix(&self.key_prefix).unwrap_or(key);
        format!("{}{}", self.key_prefix_replace, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolveConfig::new("image.", "tag.");
        assert_eq!(config.policy, FailurePolicy::Lenient);
        assert_eq!(config.concurrency, 1);
        assert!(config.insecure);
        assert!(config.credentials.is_anonymous());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_prefix() {
        let err = ResolveConfig::new("", "tag.").validate().unwrap_err();
        assert!(matches!(err, SyncError::ConfigError(_)));
        assert!(err.to_string().contains("KeyPrefix"));
    }

    #[test]
    fn test_validate_empty_replacement() {
        let err = ResolveConfig::new("image.", "").validate().unwrap_err();
        assert!(err.to_string().contains("KeyPrefixReplace"));
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let config = ResolveConfig::new("image.", "tag.").with_concurrency(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_key() {
        let config = ResolveConfig::new("image.", "tag.");
        assert_eq!(config.output_key("image.worker"), "tag.worker");
        assert_eq!(config.output_key("image."), "tag.");
    }

    #[test]
    fn test_output_key_strips_prefix_once() {
        let config = ResolveConfig::new("image.", "tag.");
        assert_eq!(config.output_key("image.image.api"), "tag.image.api");
    }

    #[test]
    fn test_is_image_key() {
        let config = ResolveConfig::new("image.", "tag.");
        assert!(config.is_image_key("image.api"));
        assert!(!config.is_image_key("replicas"));
        assert!(!config.is_image_key("tag.api"));
    }

    #[test]
    fn test_credentials_anonymous() {
        assert!(Credentials::anonymous().is_anonymous());
        assert!(Credentials::new("user", "").is_anonymous());
        assert!(Credentials::new("", "pass").is_anonymous());
        assert!(!Credentials::new("user", "pass").is_anonymous());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("user", "hunter2"));
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_failure_policy_display() {
        assert_eq!(FailurePolicy::Lenient.to_string(), "lenient");
        assert_eq!(FailurePolicy::Strict.to_string(), "strict");
    }
}
