//! # Clock Synchronization
//!
//! Signatures embed a timestamp that the server checks against its own
//! clock within a tolerance window. A client whose clock drifts has every
//! call rejected, so the client measures the offset to the server once and
//! applies it to every timestamp it sends.
//!
//! ## Policy
//!
//! - The first call to [`ClockSynchronizer::corrected_now()`] fetches the
//!   server time from `GET {base_url}/auth/time` (plain decimal seconds).
//! - A successful fetch is cached for the lifetime of the client and never
//!   refreshed.
//! - A failed fetch (transport error, non-200, non-numeric or out-of-range
//!   body) yields a zero offset. Nothing is cached and the next call
//!   fetches again.
//! - The cache lock is held across the fetch, so concurrent first callers
//!   wait on a single request instead of issuing their own. Callers that
//!   were already waiting when that request failed share its zero offset
//!   rather than queueing for a fetch of their own.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::StatusCode;
use url::Url;

/// Local Unix time in whole seconds.
pub fn local_epoch_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Server clock offset cache for one client.
#[derive(Debug)]
pub struct ClockSynchronizer {
    http: reqwest::Client,
    time_url: Url,
    offset: tokio::sync::Mutex<Option<i64>>,
    /// Number of failed fetches so far.
    failures: AtomicU64,
}

impl ClockSynchronizer {
    pub(crate) fn new(http: reqwest::Client, time_url: Url) -> Self {
        Self {
            http,
            time_url,
            offset: tokio::sync::Mutex::new(None),
            failures: AtomicU64::new(0),
        }
    }

    /// Current Unix time in seconds, corrected by the server offset.
    ///
    /// Never fails; see the module docs for the degrade policy.
    pub async fn corrected_now(&self) -> i64 {
        let failures_seen = self.failures.load(Ordering::Acquire);
        let mut cached = self.offset.lock().await;
        let offset = match *cached {
            Some(offset) => offset,
            // A fetch failed while this caller waited for the lock.
            None if self.failures.load(Ordering::Acquire) != failures_seen => 0,
            None => match self.fetch_offset().await {
                Some(offset) => {
                    *cached = Some(offset);
                    offset
                }
                None => {
                    self.failures.fetch_add(1, Ordering::Release);
                    0
                }
            },
        };
        local_epoch_seconds().saturating_add(offset)
    }

    /// The cached offset, or `None` if no fetch has succeeded yet.
    pub async fn offset(&self) -> Option<i64> {
        *self.offset.lock().await
    }

    async fn fetch_offset(&self) -> Option<i64> {
        let resp = match self.http.get(self.time_url.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(url = %self.time_url, error = %e, "server time unreachable, assuming zero clock skew");
                return None;
            }
        };

        if resp.status() != StatusCode::OK {
            tracing::warn!(
                url = %self.time_url,
                status = resp.status().as_u16(),
                "server time request rejected, assuming zero clock skew"
            );
            return None;
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %self.time_url, error = %e, "server time body unreadable, assuming zero clock skew");
                return None;
            }
        };

        let server_time: i64 = match body.trim().parse() {
            Ok(t) => t,
            Err(_) => {
                tracing::warn!(url = %self.time_url, body = %body, "server time is not an integer, assuming zero clock skew");
                return None;
            }
        };

        // Reject values no calendar date can represent before subtracting.
        let offset = chrono::DateTime::<chrono::Utc>::from_timestamp(server_time, 0)
            .and_then(|_| server_time.checked_sub(local_epoch_seconds()));
        let Some(offset) = offset else {
            tracing::warn!(url = %self.time_url, server_time, "server time out of range, assuming zero clock skew");
            return None;
        };
        tracing::debug!(server_time, offset, "clock offset computed");
        Some(offset)
    }
}
