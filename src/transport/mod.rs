//! Injected collaborator traits: blocking HTTP transport and clock.
//!
//! The pipeline is single-threaded and event-driven; network calls are
//! blocking with a caller-supplied timeout. Expected failure paths
//! (timeout, connection refused) are absence values, not errors — the
//! dispatcher turns a double absence into
//! [`SkaldError::Transport`](crate::SkaldError::Transport).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

/// A header line as (name, value). Order is preserved on the wire.
pub type Header = (String, String);

/// Blocking HTTP transport.
///
/// Implementations return `None` when no response could be obtained
/// (timeout, connection refused, unsupported verb). Any response body,
/// including provider error bodies, is returned as `Some(text)` — shape
/// validation is the dispatcher's job.
pub trait Transport {
    fn post(&self, url: &str, body: &str, headers: &[Header], timeout_ms: u64) -> Option<String>;

    fn get(&self, url: &str, headers: &[Header], timeout_ms: u64) -> Option<String>;
}

/// Millisecond clock. Injected so tests control time.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// [`Transport`] backed by `reqwest`'s blocking client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder, verb: &str) -> Option<String> {
        match request.send() {
            Ok(response) => response.text().ok(),
            Err(err) => {
                warn!(verb, error = %err, "http request failed");
                None
            }
        }
    }

    fn apply_headers(
        mut request: reqwest::blocking::RequestBuilder,
        headers: &[Header],
    ) -> reqwest::blocking::RequestBuilder {
        for (name, value) in headers {
            request = request.header(name, value);
        }
        request
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: &str, headers: &[Header], timeout_ms: u64) -> Option<String> {
        let request = Self::apply_headers(self.client.post(url), headers)
            .timeout(Duration::from_millis(timeout_ms))
            .body(body.to_string());
        self.send(request, "POST")
    }

    fn get(&self, url: &str, headers: &[Header], timeout_ms: u64) -> Option<String> {
        let request = Self::apply_headers(self.client.get(url), headers)
            .timeout(Duration::from_millis(timeout_ms));
        self.send(request, "GET")
    }
}
