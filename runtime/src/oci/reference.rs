//! Image location parsing.
//!
//! Turns location values like `registry.example.com/team/app` into the
//! registry endpoint and repository path used for tag listing.

use drlatest_core::error::{Result, SyncError};
use url::Url;

/// Scheme assumed when a location carries none.
const DEFAULT_SCHEME: &str = "https";

/// Location prefixes kept as-is; anything else gets `https://`.
const KNOWN_PREFIXES: [&str; 3] = ["http://", "https://", "oci://"];

/// Registry endpoint and repository derived from an image location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryTarget {
    /// URL scheme (`https`, `http` or `oci`)
    pub scheme: String,
    /// Registry host, including the port when one is given
    pub host: String,
    /// URL path, leading slash included (e.g. "/team/app")
    pub repository: String,
}

impl RegistryTarget {
    /// Parse an image location.
    ///
    /// Supports formats:
    /// - `registry.example.com/app` → https, registry.example.com, /app
    /// - `http://localhost:5000/app` → http, localhost:5000, /app
    /// - `oci://ghcr.io/org/app` → oci, ghcr.io, /org/app
    pub fn parse(location: &str) -> Result<Self> {
        let normalized = normalize_location(location);

        let url = Url::parse(&normalized).map_err(|e| SyncError::InvalidLocation {
            location: location.to_string(),
            message: e.to_string(),
        })?;

        let host = match (url.host_str().filter(|h| !h.is_empty()), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(SyncError::InvalidLocation {
                    location: location.to_string(),
                    message: "missing registry host".to_string(),
                })
            }
        };

        Ok(RegistryTarget {
            scheme: url.scheme().to_string(),
            host,
            repository: url.path().to_string(),
        })
    }

    /// Registry endpoint, e.g. `https://registry.example.com`.
    pub fn endpoint(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Whether the registry is reached over plain HTTP.
    pub fn is_plain_http(&self) -> bool {
        self.scheme == "http"
    }
}

impl std::fmt::Display for RegistryTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.endpoint(), self.repository)
    }
}

/// Prepend `https://` unless the location already names a known scheme.
fn normalize_location(location: &str) -> String {
    if KNOWN_PREFIXES.iter().any(|p| location.starts_with(p)) {
        location.to_string()
    } else {
        format!("{}://{}", DEFAULT_SCHEME, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_location() {
        let t = RegistryTarget::parse("registry.example.com/app").unwrap();
        assert_eq!(t.scheme, "https");
        assert_eq!(t.host, "registry.example.com");
        assert_eq!(t.repository, "/app");
    }

    #[test]
    fn test_parse_oci_scheme_preserved() {
        let t = RegistryTarget::parse("oci://registry.example.com/app").unwrap();
        assert_eq!(t.scheme, "oci");
        assert_eq!(t.host, "registry.example.com");
        assert_eq!(t.repository, "/app");
    }

    #[test]
    fn test_parse_http_with_port() {
        let t = RegistryTarget::parse("http://localhost:5000/team/app").unwrap();
        assert_eq!(t.scheme, "http");
        assert_eq!(t.host, "localhost:5000");
        assert_eq!(t.repository, "/team/app");
        assert!(t.is_plain_http());
    }

    #[test]
    fn test_parse_bare_with_port() {
        let t = RegistryTarget::parse("myregistry.io:5000/myimage").unwrap();
        assert_eq!(t.scheme, "https");
        assert_eq!(t.host, "myregistry.io:5000");
        assert_eq!(t.repository, "/myimage");
        assert!(!t.is_plain_http());
    }

    #[test]
    fn test_parse_deep_repository_path() {
        let t = RegistryTarget::parse("https://ghcr.io/org/sub/image").unwrap();
        assert_eq!(t.host, "ghcr.io");
        assert_eq!(t.repository, "/org/sub/image");
    }

    #[test]
    fn test_parse_whitespace_not_stripped() {
        let err = RegistryTarget::parse(" registry.example.com/app").unwrap_err();
        assert!(matches!(err, SyncError::InvalidLocation { .. }));

        let err = RegistryTarget::parse("   ").unwrap_err();
        assert!(matches!(err, SyncError::InvalidLocation { .. }));
    }

    #[test]
    fn test_parse_invalid_port() {
        let err = RegistryTarget::parse("registry.example.com:notaport/app").unwrap_err();
        assert!(matches!(err, SyncError::InvalidLocation { .. }));
        assert!(err.to_string().contains("registry.example.com:notaport/app"));
    }

    #[test]
    fn test_parse_invalid_host() {
        let err = RegistryTarget::parse("https://exa mple.com/app").unwrap_err();
        assert!(matches!(err, SyncError::InvalidLocation { .. }));
    }

    #[test]
    fn test_parse_missing_host() {
        let err = RegistryTarget::parse("oci:///app").unwrap_err();
        assert!(err.to_string().contains("missing registry host"));
    }

    #[test]
    fn test_endpoint_and_display() {
        let t = RegistryTarget::parse("registry.example.com/team/app").unwrap();
        assert_eq!(t.endpoint(), "https://registry.example.com");
        assert_eq!(t.to_string(), "https://registry.example.com/team/app");
    }

    #[test]
    fn test_normalize_location() {
        assert_eq!(normalize_location("a.io/b"), "https://a.io/b");
        assert_eq!(normalize_location("http://a.io/b"), "http://a.io/b");
        assert_eq!(normalize_location("https://a.io/b"), "https://a.io/b");
        assert_eq!(normalize_location("oci://a.io/b"), "oci://a.io/b");
    }
}
