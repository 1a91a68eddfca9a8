//! # Signed Requests
//!
//! A signature covers the exact URL and body bytes that go on the wire.
//! [`SignableRequest`] fixes both at construction: its fields are private
//! and there are no setters, so once a request exists nothing can change
//! what was signed. The URL is parsed (and therefore normalized) before
//! signing, and the same parsed value is handed to the transport. Any
//! `#fragment` is stripped on construction because the transport never
//! sends it.
//!
//! Bodies are serialized from the caller's payload exactly once, in
//! [`SignableRequest::json()`]; those bytes are signed and those bytes are
//! sent.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use ovh_core::{sign, ApplicationCredentials, HttpMethod, Signature};

use crate::error::OvhApiError;

pub const HEADER_TIMESTAMP: &str = "X-Ovh-Timestamp";
pub const HEADER_CONSUMER: &str = "X-Ovh-Consumer";
pub const HEADER_SIGNATURE: &str = "X-Ovh-Signature";
pub const HEADER_APPLICATION: &str = "X-Ovh-Application";

/// Content type of every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A request whose method, URL and body are final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    method: HttpMethod,
    url: Url,
    body: Option<String>,
}

impl SignableRequest {
    /// A request without a body.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url: without_fragment(url),
            body: None,
        }
    }

    /// A request carrying an already serialized body.
    pub fn with_body(method: HttpMethod, url: Url, body: impl Into<String>) -> Self {
        Self {
            method,
            url: without_fragment(url),
            body: Some(body.into()),
        }
    }

    /// A request whose body is the JSON serialization of `payload`.
    pub fn json<T: Serialize + ?Sized>(
        method: HttpMethod,
        url: Url,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(payload)?;
        Ok(Self::with_body(method, url, body))
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The raw body, `""` when there is none.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Short label used in errors and logs, e.g. `GET /1.0/me`.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.url.path())
    }

    pub(crate) fn to_reqwest(&self, http: &reqwest::Client) -> reqwest::RequestBuilder {
        let builder = http.request(reqwest_method(self.method), self.url.clone());
        match &self.body {
            Some(body) => builder
                .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body.clone()),
            None => builder,
        }
    }
}

/// The four authentication headers of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub timestamp: i64,
    pub consumer_key: String,
    pub signature: Signature,
    pub application_key: String,
}

impl AuthHeaders {
    /// Sign `request` at `timestamp`.
    pub fn compute(
        credentials: &ApplicationCredentials,
        consumer_key: &str,
        request: &SignableRequest,
        timestamp: i64,
    ) -> Self {
        let signature = sign(
            credentials.application_secret(),
            consumer_key,
            request.method(),
            request.url().as_str(),
            request.body(),
            timestamp,
        );
        Self {
            timestamp,
            consumer_key: consumer_key.to_string(),
            signature,
            application_key: credentials.application_key().to_string(),
        }
    }

    /// `(name, value)` pairs in header order.
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            (HEADER_TIMESTAMP, self.timestamp.to_string()),
            (HEADER_CONSUMER, self.consumer_key.clone()),
            (HEADER_SIGNATURE, self.signature.to_string()),
            (HEADER_APPLICATION, self.application_key.clone()),
        ]
    }

    /// Convert to a header map.
    ///
    /// Fails only when the consumer or application key holds characters
    /// that cannot appear in an HTTP header.
    pub fn to_header_map(&self) -> Result<HeaderMap, OvhApiError> {
        let mut headers = HeaderMap::with_capacity(4);
        for (name, value) in self.pairs() {
            let value = HeaderValue::from_str(&value).map_err(|e| OvhApiError::InvalidHeader {
                name,
                reason: e.to_string(),
            })?;
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                OvhApiError::InvalidHeader {
                    name,
                    reason: e.to_string(),
                }
            })?;
            headers.insert(header, value);
        }
        Ok(headers)
    }
}

fn without_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

pub(crate) fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
