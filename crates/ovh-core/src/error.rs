//! # Error Types
//!
//! Configuration errors are the only failures this crate can produce.
//! They are fatal at client construction: no partially built client is
//! ever handed back to the caller.

use thiserror::Error;

/// Invalid or missing client configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The application key was empty.
    #[error("application key cannot be empty")]
    MissingApplicationKey,

    /// The application secret was empty.
    #[error("application secret cannot be empty")]
    MissingApplicationSecret,

    /// The region identifier was empty.
    #[error("region cannot be empty")]
    MissingRegion,

    /// The region identifier is not present in the registry.
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// A base URL in the registry could not be parsed.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),

    /// A required environment variable is not set.
    #[error("{0} environment variable is required")]
    MissingEnv(&'static str),
}
