//! The transport collaborator: everything that actually talks HTTP.
//!
//! # Responsibilities
//! - Define the `Transport` seam the route tree dispatches through
//! - Provide a blocking reqwest implementation
//!
//! # Design Decisions
//! - The transport must not retry and must not mutate headers
//! - Non-2xx statuses are returned, never interpreted
//! - Cancellation/timeouts belong here, not in the core

use std::time::Duration;

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client failed (connect, timeout, body read).
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Per-request options handed to the transport, opaque to the core.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Optional JSON body, passed through unmodified.
    pub body: Option<Value>,

    /// Query parameters, in insertion order.
    pub params: IndexMap<String, String>,

    /// Transport-specific options (e.g. `timeout_ms`). Unknown keys are
    /// ignored by implementations.
    pub extra: IndexMap<String, Value>,
}

/// Response metadata returned by a transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: IndexMap<String, String>,
    pub body: String,
}

/// The collaborator the route tree delegates HTTP I/O to.
pub trait Transport: Send + Sync {
    /// Issue a single request. Implementations must not retry and must not
    /// mutate the supplied headers.
    fn send(
        &self,
        method: &str,
        url: &str,
        headers: &IndexMap<String, String>,
        options: &SendOptions,
    ) -> Result<TransportResponse, TransportError>;
}

/// Blocking reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: &str,
        url: &str,
        headers: &IndexMap<String, String>,
        options: &SendOptions,
    ) -> Result<TransportResponse, TransportError> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| TransportError::InvalidRequest(format!("unsupported method: {method}")))?;

        let mut request = self.client.request(method, url);

        for (name, value) in headers {
            request = request.header(name, value);
        }

        if !options.params.is_empty() {
            request = request.query(&options.params);
        }

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        for (key, value) in &options.extra {
            match key.as_str() {
                "timeout_ms" => {
                    if let Some(ms) = value.as_u64() {
                        request = request.timeout(Duration::from_millis(ms));
                    }
                }
                other => {
                    tracing::debug!(option = other, "ignoring unsupported transport option");
                }
            }
        }

        let response = request.send()?;
        let status = response.status().as_u16();

        let mut response_headers = IndexMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                response_headers.insert(name.to_string(), value.to_string());
            }
        }

        let body = response.text()?;

        Ok(TransportResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}
