//! # ovh-core — Foundational Types for the OVH API Client
//!
//! The I/O-free half of the client. Everything in this crate is a pure
//! function or a validated value; the network-facing half lives in
//! `ovh-client`.
//!
//! ## Key Design Principles
//!
//! 1. **Regions are data.** `EndpointRegistry` maps symbolic region names to
//!    base URLs. The built-in table is a constant; tests build their own
//!    registry pointing at a mock server instead of branching on region names.
//!
//! 2. **Credentials are validated once.** `ApplicationCredentials::new()` is
//!    the only constructor and rejects empty keys and secrets, so signing never
//!    has to handle a missing secret.
//!
//! 3. **Signing is total.** `sign()` cannot fail. Any string, including an
//!    empty body or an empty consumer key, yields a signature.
//!
//! ## Crate Policy
//!
//! - No network access, no async.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod method;
pub mod negotiation;
pub mod signature;

// Re-export primary types for ergonomic imports.
pub use credentials::ApplicationCredentials;
pub use endpoint::{AuthPaths, Endpoint, EndpointRegistry, BUILTIN_REGIONS, DEFAULT_REGION};
pub use error::ConfigError;
pub use method::HttpMethod;
pub use negotiation::{AccessGrant, AccessRule, CredentialState, PendingValidation};
pub use signature::{canonical_string, sign, Signature, SIGNATURE_VERSION};
