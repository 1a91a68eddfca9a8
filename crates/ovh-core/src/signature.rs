//! # Request Signature — `$1$` SHA-1 Scheme
//!
//! Every authenticated call carries an `X-Ovh-Signature` header computed
//! from the application secret, the consumer key, and the exact request
//! that goes on the wire.
//!
//! ## Canonical String
//!
//! ```text
//! secret + "+" + consumer_key + "+" + METHOD + "+" + absolute_url + "+" + body + "+" + timestamp
//! ```
//!
//! The string is UTF-8 encoded, hashed with SHA-1, rendered as lowercase hex
//! and prefixed with the version tag `$1$`. The server rebuilds the same
//! string from what it receives, so the URL (including query order and
//! percent-encoding) and the body must be byte-identical to the transmitted
//! ones. This is a plain delimited hash, not HMAC; switching to HMAC would
//! break compatibility with the server.

use sha1::{Digest, Sha1};
use std::fmt;

use crate::method::HttpMethod;

/// Version tag prefixed to every signature.
pub const SIGNATURE_VERSION: &str = "$1$";

/// A computed request signature, `$1$` followed by 40 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex digest without the version tag.
    pub fn digest_hex(&self) -> &str {
        &self.0[SIGNATURE_VERSION.len()..]
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the `+`-joined payload that [`sign()`] hashes.
pub fn canonical_string(
    application_secret: &str,
    consumer_key: &str,
    method: HttpMethod,
    absolute_url: &str,
    raw_body: &str,
    timestamp: i64,
) -> String {
    format!(
        "{application_secret}+{consumer_key}+{}+{absolute_url}+{raw_body}+{timestamp}",
        method.as_str()
    )
}

/// Sign one request.
///
/// `absolute_url` is the fully resolved URL as it will be sent, query string
/// included. `raw_body` is the serialized body, or `""` when there is none.
/// `timestamp` is the server-corrected Unix time in seconds.
pub fn sign(
    application_secret: &str,
    consumer_key: &str,
    method: HttpMethod,
    absolute_url: &str,
    raw_body: &str,
    timestamp: i64,
) -> Signature {
    let payload = canonical_string(
        application_secret,
        consumer_key,
        method,
        absolute_url,
        raw_body,
        timestamp,
    );
    let hash = Sha1::digest(payload.as_bytes());
    let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
    Signature(format!("{SIGNATURE_VERSION}{hex}"))
}
