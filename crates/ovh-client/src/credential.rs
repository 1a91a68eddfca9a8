//! # Consumer-Key Negotiation
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/auth/credential` | Request a consumer key |
//!
//! The request is authenticated by the application key alone; it carries
//! no signature because there is no consumer key to sign with yet. A
//! successful answer replaces the client's consumer key and hands back the
//! URL where a human approves it. Approval itself is not polled.
//!
//! Failures are soft: the caller gets `None`, the consumer key is left
//! untouched, and the whole negotiation can simply be run again.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::StatusCode;
use url::Url;

use ovh_core::{AccessGrant, PendingValidation};

use crate::request::JSON_CONTENT_TYPE;

/// Client for the consumer-key handshake.
#[derive(Debug, Clone)]
pub struct ConsumerKeyNegotiator {
    http: reqwest::Client,
    credential_url: Url,
    consumer_key: Arc<RwLock<String>>,
}

impl ConsumerKeyNegotiator {
    pub(crate) fn new(
        http: reqwest::Client,
        credential_url: Url,
        consumer_key: Arc<RwLock<String>>,
    ) -> Self {
        Self {
            http,
            credential_url,
            consumer_key,
        }
    }

    /// Ask for a consumer key scoped by `grant`.
    ///
    /// Calls `POST {base_url}/auth/credential`. Returns `None` on any
    /// transport error, non-200 status, or malformed body.
    pub async fn request_consumer_key(&self, grant: &AccessGrant) -> Option<PendingValidation> {
        let endpoint = "POST /auth/credential";

        let body = match serde_json::to_string(grant) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "access grant could not be serialized");
                return None;
            }
        };

        let resp = match self
            .http
            .post(self.credential_url.clone())
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "consumer key request failed");
                return None;
            }
        };

        if resp.status() != StatusCode::OK {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(endpoint, status, body = %body, "consumer key request rejected");
            return None;
        }

        let pending: PendingValidation = match resp.json().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "consumer key response malformed");
                return None;
            }
        };

        if pending.consumer_key.is_empty() || pending.validation_url.is_empty() {
            tracing::warn!(endpoint, "consumer key response missing key or validation URL");
            return None;
        }

        *self.consumer_key.write() = pending.consumer_key.clone();
        tracing::info!(state = ?pending.state, "consumer key issued, awaiting validation");
        Some(pending)
    }
}
