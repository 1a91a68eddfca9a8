//! Application credentials.
//!
//! The application key identifies the caller and travels in the
//! `X-Ovh-Application` header. The application secret never leaves the
//! process; it only feeds [`crate::signature::sign`].

use zeroize::Zeroizing;

use crate::error::ConfigError;

/// Long-lived application key and secret.
///
/// Custom `Debug` implementation redacts the secret to prevent credential
/// leakage in log output.
#[derive(Clone)]
pub struct ApplicationCredentials {
    application_key: String,
    application_secret: Zeroizing<String>,
}

impl std::fmt::Debug for ApplicationCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationCredentials")
            .field("application_key", &self.application_key)
            .field("application_secret", &"[REDACTED]")
            .finish()
    }
}

impl ApplicationCredentials {
    /// Validate and wrap an application key and secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApplicationKey`] or
    /// [`ConfigError::MissingApplicationSecret`] when either is empty.
    pub fn new(
        application_key: impl Into<String>,
        application_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let application_key = application_key.into();
        if application_key.is_empty() {
            return Err(ConfigError::MissingApplicationKey);
        }
        let application_secret = Zeroizing::new(application_secret.into());
        if application_secret.is_empty() {
            return Err(ConfigError::MissingApplicationSecret);
        }
        Ok(Self {
            application_key,
            application_secret,
        })
    }

    pub fn application_key(&self) -> &str {
        &self.application_key
    }

    pub fn application_secret(&self) -> &str {
        self.application_secret.as_str()
    }
}
