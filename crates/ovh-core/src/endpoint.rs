//! # Endpoint Registry — Region → Base URL
//!
//! The OVH API is served from several regional deployments. A client picks
//! one at construction time by symbolic name; the name is resolved exactly
//! once and the resulting [`Endpoint`] never changes afterwards.
//!
//! ## Built-in Regions
//!
//! | Region | Base URL |
//! |--------|----------|
//! | `ovh-eu` | `https://api.ovh.com/1.0` |
//! | `ovh-ca` | `https://ca.api.ovh.com/1.0` |
//! | `runabove-ca` | `https://api.runabove.com/1.0` |

use url::Url;

use crate::error::ConfigError;

/// Region used when the caller does not pick one.
pub const DEFAULT_REGION: &str = "ovh-eu";

/// Compiled-in region table.
pub const BUILTIN_REGIONS: &[(&str, &str)] = &[
    ("ovh-eu", "https://api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("runabove-ca", "https://api.runabove.com/1.0"),
];

/// A resolved API deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    region: String,
    base_url: Url,
}

impl Endpoint {
    /// The symbolic region name this endpoint was resolved from.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The base URL of the deployment, e.g. `https://api.ovh.com/1.0`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the absolute URL for an API path.
    ///
    /// Exactly one `/` separates the base URL from `path`, whatever slashes
    /// either side carries. `path` may include a query string; it is kept
    /// in the order given. A `#fragment` is dropped, since it never
    /// reaches the server.
    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))?;
        url.set_fragment(None);
        Ok(url)
    }
}

/// Lookup table from region name to base URL.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    entries: Vec<(String, String)>,
}

impl EndpointRegistry {
    /// The registry of production regions.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_REGIONS
                .iter()
                .map(|(region, url)| (region.to_string(), url.to_string())),
        )
    }

    /// Build a registry from arbitrary `(region, base_url)` pairs.
    ///
    /// URLs are validated lazily in [`resolve()`](Self::resolve).
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Add or replace a region.
    pub fn with_region(mut self, region: impl Into<String>, base_url: impl Into<String>) -> Self {
        let region = region.into();
        let base_url = base_url.into();
        match self.entries.iter_mut().find(|(r, _)| *r == region) {
            Some(entry) => entry.1 = base_url,
            None => self.entries.push((region, base_url)),
        }
        self
    }

    /// Region names known to this registry, in insertion order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(r, _)| r.as_str())
    }

    /// Resolve a region name to its endpoint.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRegion`] for an empty name.
    /// - [`ConfigError::UnknownRegion`] when the name is not registered.
    /// - [`ConfigError::InvalidUrl`] when the registered base URL does not parse.
    pub fn resolve(&self, region: &str) -> Result<Endpoint, ConfigError> {
        if region.is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        let (_, raw) = self
            .entries
            .iter()
            .find(|(r, _)| r == region)
            .ok_or_else(|| ConfigError::UnknownRegion(region.to_string()))?;
        let base_url =
            Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(region.to_string(), e.to_string()))?;
        Ok(Endpoint {
            region: region.to_string(),
            base_url,
        })
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Fixed API paths used by the authentication handshake.
///
/// Held as data so a test double can serve them from a different location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPaths {
    /// Server clock, answered as a plain decimal number of seconds.
    pub time: String,
    /// Consumer-key negotiation.
    pub credential: String,
}

impl Default for AuthPaths {
    fn default() -> Self {
        Self {
            time: "auth/time".to_string(),
            credential: "auth/credential".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_resolves_to_eu_endpoint() {
        let endpoint = EndpointRegistry::builtin().resolve(DEFAULT_REGION).unwrap();
        assert_eq!(endpoint.region(), "ovh-eu");
        assert_eq!(endpoint.base_url().as_str(), "https://api.ovh.com/1.0");
    }

    #[test]
    fn every_builtin_region_resolves() {
        let registry = EndpointRegistry::builtin();
        for (region, url) in BUILTIN_REGIONS {
            let endpoint = registry.resolve(region).unwrap();
            assert_eq!(endpoint.base_url().as_str(), *url);
        }
    }

    #[test]
    fn unknown_region_is_rejected() {
        let err = EndpointRegistry::builtin().resolve("bad-region").unwrap_err();
        assert_eq!(err, ConfigError::UnknownRegion("bad-region".into()));
    }

    #[test]
    fn empty_region_is_rejected() {
        let err = EndpointRegistry::builtin().resolve("").unwrap_err();
        assert_eq!(err, ConfigError::MissingRegion);
    }

    #[test]
    fn custom_region_can_be_added() {
        let registry = EndpointRegistry::builtin().with_region("fake", "http://127.0.0.1:9000/1.0");
        let endpoint = registry.resolve("fake").unwrap();
        assert_eq!(endpoint.base_url().as_str(), "http://127.0.0.1:9000/1.0");
        assert_eq!(registry.regions().count(), BUILTIN_REGIONS.len() + 1);
    }

    #[test]
    fn with_region_replaces_existing_entry() {
        let registry = EndpointRegistry::builtin().with_region("ovh-eu", "http://localhost:1");
        let endpoint = registry.resolve("ovh-eu").unwrap();
        assert_eq!(endpoint.base_url().as_str(), "http://localhost:1/");
        assert_eq!(registry.regions().count(), BUILTIN_REGIONS.len());
    }

    #[test]
    fn invalid_registry_url_is_reported() {
        let registry = EndpointRegistry::from_entries([("broken".to_string(), "not a url".to_string())]);
        assert!(matches!(
            registry.resolve("broken"),
            Err(ConfigError::InvalidUrl(region, _)) if region == "broken"
        ));
    }

    #[test]
    fn url_for_joins_with_single_slash() {
        let endpoint = EndpointRegistry::builtin().resolve("ovh-ca").unwrap();
        assert_eq!(
            endpoint.url_for("/me").unwrap().as_str(),
            "https://ca.api.ovh.com/1.0/me"
        );
        assert_eq!(
            endpoint.url_for("auth/time").unwrap().as_str(),
            "https://ca.api.ovh.com/1.0/auth/time"
        );
    }

    #[test]
    fn url_for_handles_host_only_base() {
        let registry = EndpointRegistry::from_entries([(
            "local".to_string(),
            "http://127.0.0.1:8080".to_string(),
        )]);
        let endpoint = registry.resolve("local").unwrap();
        assert_eq!(
            endpoint.url_for("me").unwrap().as_str(),
            "http://127.0.0.1:8080/me"
        );
    }

    #[test]
    fn url_for_keeps_query_order() {
        let endpoint = EndpointRegistry::builtin().resolve("ovh-eu").unwrap();
        let url = endpoint.url_for("domain?b=2&a=1").unwrap();
        assert_eq!(url.as_str(), "https://api.ovh.com/1.0/domain?b=2&a=1");
    }

    #[test]
    fn url_for_drops_fragment() {
        let endpoint = EndpointRegistry::builtin().resolve("ovh-eu").unwrap();
        let url = endpoint.url_for("me/bill?date.from=2024-01-01#latest").unwrap();
        assert_eq!(url.as_str(), "https://api.ovh.com/1.0/me/bill?date.from=2024-01-01");
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn auth_paths_default() {
        let paths = AuthPaths::default();
        assert_eq!(paths.time, "auth/time");
        assert_eq!(paths.credential, "auth/credential");
    }
}
