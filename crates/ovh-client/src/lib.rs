//! # ovh-client -- Typed Rust client for the OVH REST API
//!
//! Attaches OVH request authentication to outgoing calls:
//! - **Clock synchronization** against `GET /auth/time`, cached per client
//! - **Signatures** over the exact method, URL, body and timestamp sent
//! - **Consumer-key negotiation** via `POST /auth/credential`
//!
//! ## Flow
//!
//! 1. Build an [`OvhClient`] from application key, secret and region. The
//!    region is resolved once; empty credentials or an unknown region fail
//!    here, before any network call.
//! 2. Obtain a consumer key with [`OvhClient::request_consumer_key()`] and
//!    send the user to the returned validation URL, or reuse a validated key
//!    with [`OvhClient::set_consumer_key()`].
//! 3. Call [`OvhClient::get()`], [`post()`](OvhClient::post),
//!    [`put()`](OvhClient::put) or [`delete()`](OvhClient::delete). Each
//!    call builds a sealed [`SignableRequest`], signs it with the corrected
//!    time, and transmits exactly what was signed.
//!
//! ## Shared State
//!
//! The client owns two pieces of mutable state, each behind its own lock:
//! the cached clock offset and the consumer key. Share one client across
//! tasks with `Arc<OvhClient>`; separate clients never share state.

pub mod clock;
pub mod config;
pub mod credential;
pub mod error;
pub mod request;

pub use clock::ClockSynchronizer;
pub use config::OvhApiConfig;
pub use credential::ConsumerKeyNegotiator;
pub use error::OvhApiError;
pub use request::{AuthHeaders, SignableRequest};

pub use ovh_core::{
    AccessGrant, AccessRule, ConfigError, CredentialState, Endpoint, EndpointRegistry, HttpMethod,
    PendingValidation,
};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use ovh_core::ApplicationCredentials;

/// Top-level OVH API client.
#[derive(Debug)]
pub struct OvhClient {
    http: reqwest::Client,
    credentials: ApplicationCredentials,
    endpoint: Endpoint,
    consumer_key: Arc<RwLock<String>>,
    clock: ClockSynchronizer,
    negotiator: ConsumerKeyNegotiator,
}

impl OvhClient {
    /// Create a client against the built-in region table.
    pub fn new(config: OvhApiConfig) -> Result<Self, OvhApiError> {
        Self::with_registry(config, &EndpointRegistry::builtin())
    }

    /// Create a client resolving the region against `registry`.
    pub fn with_registry(
        mut config: OvhApiConfig,
        registry: &EndpointRegistry,
    ) -> Result<Self, OvhApiError> {
        let secret = std::mem::take(&mut *config.application_secret);
        let credentials = ApplicationCredentials::new(config.application_key, secret)?;
        let endpoint = registry.resolve(&config.region)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            // Send `X-Ovh-*` names in the case the server documents.
            .http1_title_case_headers()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-ovh-application"),
                    reqwest::header::HeaderValue::from_str(credentials.application_key())
                        .map_err(|e| OvhApiError::InvalidHeader {
                            name: request::HEADER_APPLICATION,
                            reason: e.to_string(),
                        })?,
                );
                headers
            })
            .build()
            .map_err(|e| OvhApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let time_url = url_for(&endpoint, &config.auth_paths.time)?;
        let credential_url = url_for(&endpoint, &config.auth_paths.credential)?;
        let consumer_key = Arc::new(RwLock::new(config.consumer_key.unwrap_or_default()));

        tracing::debug!(region = endpoint.region(), base_url = %endpoint.base_url(), "OVH client ready");

        Ok(Self {
            clock: ClockSynchronizer::new(http.clone(), time_url),
            negotiator: ConsumerKeyNegotiator::new(
                http.clone(),
                credential_url,
                Arc::clone(&consumer_key),
            ),
            http,
            credentials,
            endpoint,
            consumer_key,
        })
    }

    pub fn application_key(&self) -> &str {
        self.credentials.application_key()
    }

    /// The resolved deployment.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Current consumer key, empty until one is negotiated or set.
    pub fn consumer_key(&self) -> String {
        self.consumer_key.read().clone()
    }

    /// Replace the consumer key, e.g. with one validated in an earlier session.
    pub fn set_consumer_key(&self, consumer_key: impl Into<String>) {
        *self.consumer_key.write() = consumer_key.into();
    }

    /// Access the clock synchronizer.
    pub fn clock(&self) -> &ClockSynchronizer {
        &self.clock
    }

    /// Access the consumer-key negotiator.
    pub fn negotiator(&self) -> &ConsumerKeyNegotiator {
        &self.negotiator
    }

    /// Request a consumer key; see [`ConsumerKeyNegotiator::request_consumer_key()`].
    pub async fn request_consumer_key(&self, grant: &AccessGrant) -> Option<PendingValidation> {
        self.negotiator.request_consumer_key(grant).await
    }

    /// Absolute URL for an API path, e.g. `me` or `/domain?whoisOwner=x`.
    pub fn url_for(&self, path: &str) -> Result<Url, OvhApiError> {
        url_for(&self.endpoint, path)
    }

    /// Compute the authentication headers for a sealed request.
    ///
    /// Uses the corrected server time and the consumer key as of this call.
    pub async fn attach_auth_headers(&self, request: &SignableRequest) -> AuthHeaders {
        let timestamp = self.clock.corrected_now().await;
        let consumer_key = self.consumer_key();
        AuthHeaders::compute(&self.credentials, &consumer_key, request, timestamp)
    }

    /// Sign and send `request`, decoding a 2xx JSON response into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: SignableRequest,
    ) -> Result<T, OvhApiError> {
        let endpoint = request.label();
        let headers = self.attach_auth_headers(&request).await;
        tracing::debug!(
            endpoint = %endpoint,
            timestamp = headers.timestamp,
            "dispatching signed request"
        );

        let resp = request
            .to_reqwest(&self.http)
            .headers(headers.to_header_map()?)
            .send()
            .await
            .map_err(|e| OvhApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(OvhApiError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| OvhApiError::Deserialization {
            endpoint,
            source: e,
        })
    }

    /// Calls `GET {base_url}/{path}`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, OvhApiError> {
        let request = SignableRequest::new(HttpMethod::Get, self.url_for(path)?);
        self.execute(request).await
    }

    /// Calls `POST {base_url}/{path}` with `body` as JSON.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, OvhApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.json_request(HttpMethod::Post, path, body)?;
        self.execute(request).await
    }

    /// Calls `PUT {base_url}/{path}` with `body` as JSON.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, OvhApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.json_request(HttpMethod::Put, path, body)?;
        self.execute(request).await
    }

    /// Calls `DELETE {base_url}/{path}`.
    ///
    /// The API answers deletions with `null`; decode into `()` or
    /// `serde_json::Value`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, OvhApiError> {
        let request = SignableRequest::new(HttpMethod::Delete, self.url_for(path)?);
        self.execute(request).await
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<SignableRequest, OvhApiError> {
        let url = self.url_for(path)?;
        SignableRequest::json(method, url, body).map_err(|e| OvhApiError::Serialization {
            endpoint: format!("{method} {path}"),
            source: e,
        })
    }
}

fn url_for(endpoint: &Endpoint, path: &str) -> Result<Url, OvhApiError> {
    endpoint.url_for(path).map_err(|e| OvhApiError::InvalidUrl {
        url: format!("{}/{}", endpoint.base_url(), path),
        reason: e.to_string(),
    })
}
