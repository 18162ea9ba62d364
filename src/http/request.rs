//! Request assembly and dispatch.
//!
//! # Responsibilities
//! - Assemble per-request metadata (method, url, headers, body, params)
//! - Layer headers: client-level, route-level, call-site overrides
//! - Run request/response hooks in registration order
//! - Delegate I/O to the transport collaborator
//!
//! # Design Decisions
//! - Hooks see the fully-resolved header set but cannot mutate it
//! - Client default options are applied under call-site options
//!   (call-site wins per key)
//! - Response metadata is ephemeral; retention is a hook's business

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Error;
use crate::http::transport::{SendOptions, TransportResponse};
use crate::route::Route;

/// Metadata describing an in-flight request, as seen by header callbacks
/// and request hooks.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: String,
    /// The rendered route URL.
    pub route: String,
    pub headers: IndexMap<String, String>,
    pub body: Option<Value>,
    pub params: IndexMap<String, String>,
}

/// Metadata describing a completed request, as seen by response hooks.
#[derive(Debug, Clone)]
pub struct ResponseContext {
    pub method: String,
    pub route: String,
    pub status: u16,
    pub body: String,
}

/// Options supplied at a call site (or registered as client defaults).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Header overrides; win over client- and route-level headers.
    pub headers: IndexMap<String, String>,

    /// Opaque JSON body.
    pub body: Option<Value>,

    /// Query parameters.
    pub params: IndexMap<String, String>,

    /// Transport options (e.g. `timeout_ms`).
    pub extra: IndexMap<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Layer these options over `defaults`: every key present here wins,
    /// everything else falls through.
    pub(crate) fn layered_over(&self, defaults: &RequestOptions) -> RequestOptions {
        let mut merged = defaults.clone();
        merged
            .headers
            .extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
            .params
            .extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
            .extra
            .extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        if self.body.is_some() {
            merged.body = self.body.clone();
        }
        merged
    }
}

/// Assemble and send one request on behalf of `route`.
pub(crate) fn dispatch(
    route: &Route,
    method: &str,
    options: &RequestOptions,
) -> Result<TransportResponse, Error> {
    let core = route.core();
    let merged = options.layered_over(&core.default_options());

    let mut ctx = RequestContext {
        method: method.to_string(),
        route: route.url().to_string(),
        headers: merged.headers.clone(),
        body: merged.body.clone(),
        params: merged.params.clone(),
    };

    // Client-level first, route-level overrides, call-site wins.
    let mut headers = core.resolve_headers(&ctx);
    for (name, value) in route.headers().resolve(&ctx) {
        headers.insert(name, value);
    }
    for (name, value) in &merged.headers {
        headers.insert(name.clone(), value.clone());
    }
    ctx.headers = headers;

    core.run_request_hooks(&ctx);

    let send_options = SendOptions {
        body: merged.body,
        params: merged.params,
        extra: merged.extra,
    };

    let response = core
        .transport()
        .send(method, &ctx.route, &ctx.headers, &send_options)?;

    let response_ctx = ResponseContext {
        method: ctx.method.clone(),
        route: ctx.route.clone(),
        status: response.status,
        body: response.body.clone(),
    };

    core.run_response_hooks(&response_ctx);

    Ok(response)
}
