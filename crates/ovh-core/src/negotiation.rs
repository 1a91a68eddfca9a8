//! Consumer-key negotiation payloads.
//!
//! The application asks for a consumer key scoped by a list of access rules.
//! The server answers with a key that is not yet usable and a URL where a
//! human must approve it.
//!
//! Request:  `{"accessRules":[{"method":"GET","path":"/*"}],"redirection":"http://localhost"}`
//! Response: `{"validationUrl":"...","consumerKey":"...","state":"pendingValidation"}`

use serde::{Deserialize, Deserializer, Serialize};

use crate::method::HttpMethod;

/// One permission requested for the consumer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub method: HttpMethod,
    /// Path pattern, `*` acting as a wildcard (e.g. `/domain/*`).
    pub path: String,
}

impl AccessRule {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

/// Body of a consumer-key request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Requested permissions, sent in the order given.
    pub access_rules: Vec<AccessRule>,
    /// Where the validation page sends the user once approved.
    pub redirection: String,
}

impl AccessGrant {
    pub fn new(access_rules: Vec<AccessRule>, redirection: impl Into<String>) -> Self {
        Self {
            access_rules,
            redirection: redirection.into(),
        }
    }

    /// Append a rule.
    pub fn allow(mut self, method: HttpMethod, path: impl Into<String>) -> Self {
        self.access_rules.push(AccessRule::new(method, path));
        self
    }
}

impl Default for AccessGrant {
    /// Read-only access to everything, redirecting to `http://localhost`.
    fn default() -> Self {
        Self::new(vec![AccessRule::new(HttpMethod::Get, "/*")], "http://localhost")
    }
}

/// Lifecycle state of an issued consumer key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialState {
    PendingValidation,
    Validated,
    Expired,
    Refused,
    /// Forward-compatible catch-all, also used when the server omits the state.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Answer to a successful consumer-key request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingValidation {
    /// Page where a human approves the key.
    pub validation_url: String,
    /// The issued key, unusable until approved.
    pub consumer_key: String,
    /// Absent or `null` reads as [`CredentialState::Unknown`].
    #[serde(default, deserialize_with = "state_or_unknown")]
    pub state: CredentialState,
}

fn state_or_unknown<'de, D>(deserializer: D) -> Result<CredentialState, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CredentialState>::deserialize(deserializer)?.unwrap_or_default())
}
