//! Shared test helpers: a recording transport collaborator.

use std::sync::Mutex;

use indexmap::IndexMap;
use serde_json::Value;

use route_client::{SendOptions, Transport, TransportError, TransportResponse};

/// Everything the dispatcher handed to the transport for one request.
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: String,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Option<Value>,
    pub params: IndexMap<String, String>,
    pub extra: IndexMap<String, Value>,
}

/// Transport double that records every request and returns a canned
/// response.
pub struct MockTransport {
    sent: Mutex<Vec<SentRequest>>,
    status: u16,
    body: String,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_response(200, "ok")
    }

    pub fn with_response(status: u16, body: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            status,
            body: body.to_string(),
        }
    }

    /// The last recorded request, panicking if none was sent.
    pub fn last(&self) -> SentRequest {
        self.sent
            .lock()
            .unwrap()
            .last()
            .expect("no request was sent")
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        method: &str,
        url: &str,
        headers: &IndexMap<String, String>,
        options: &SendOptions,
    ) -> Result<TransportResponse, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: options.body.clone(),
            params: options.params.clone(),
            extra: options.extra.clone(),
        });

        Ok(TransportResponse {
            status: self.status,
            headers: IndexMap::new(),
            body: self.body.clone(),
        })
    }
}
