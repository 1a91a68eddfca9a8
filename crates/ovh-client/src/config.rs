//! OVH API client configuration.
//!
//! Holds the application credentials, the symbolic region, and transport
//! settings. Defaults target the `ovh-eu` deployment. Override via
//! environment variables or explicit construction for other regions and
//! for testing.

use ovh_core::{AuthPaths, ConfigError, DEFAULT_REGION};
use zeroize::Zeroizing;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the OVH API.
///
/// Custom `Debug` implementation redacts the `application_secret` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct OvhApiConfig {
    /// Application key, sent as `X-Ovh-Application`.
    pub application_key: String,
    /// Application secret, used only to compute signatures.
    pub application_secret: Zeroizing<String>,
    /// Previously validated consumer key, if any.
    pub consumer_key: Option<String>,
    /// Symbolic region name. Default: `ovh-eu`.
    pub region: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Paths of the time and credential endpoints.
    pub auth_paths: AuthPaths,
}

impl std::fmt::Debug for OvhApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhApiConfig")
            .field("application_key", &self.application_key)
            .field("application_secret", &"[REDACTED]")
            .field("consumer_key", &self.consumer_key)
            .field("region", &self.region)
            .field("timeout_secs", &self.timeout_secs)
            .field("auth_paths", &self.auth_paths)
            .finish()
    }
}

impl OvhApiConfig {
    /// Configuration for the default region with no consumer key yet.
    pub fn new(application_key: impl Into<String>, application_secret: impl Into<String>) -> Self {
        Self {
            application_key: application_key.into(),
            application_secret: Zeroizing::new(application_secret.into()),
            consumer_key: None,
            region: DEFAULT_REGION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_paths: AuthPaths::default(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_consumer_key(mut self, consumer_key: impl Into<String>) -> Self {
        self.consumer_key = Some(consumer_key.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `OVH_APPLICATION_KEY` (required)
    /// - `OVH_APPLICATION_SECRET` (required)
    /// - `OVH_CONSUMER_KEY` (optional)
    /// - `OVH_ENDPOINT` (default: `ovh-eu`)
    /// - `OVH_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let application_key = lookup("OVH_APPLICATION_KEY")
            .ok_or(ConfigError::MissingEnv("OVH_APPLICATION_KEY"))?;
        let application_secret = lookup("OVH_APPLICATION_SECRET")
            .ok_or(ConfigError::MissingEnv("OVH_APPLICATION_SECRET"))?;

        let mut config = Self::new(application_key, application_secret);
        config.consumer_key = lookup("OVH_CONSUMER_KEY").filter(|ck| !ck.is_empty());
        if let Some(region) = lookup("OVH_ENDPOINT") {
            config.region = region;
        }
        config.timeout_secs = lookup("OVH_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(config)
    }
}
