//! Structured logging hooks.
//!
//! # Responsibilities
//! - Emit one event per request and one per response
//! - Initialize the logging subsystem for binaries
//!
//! # Design Decisions
//! - Uses the tracing crate for structured events
//! - Hooks are no-ops without a subscriber, so installing them by default
//!   is safe for library consumers
//! - Log level configurable via RUST_LOG

use tracing_subscriber::EnvFilter;

use crate::http::request::{RequestContext, ResponseContext};

/// Install a formatting subscriber honoring `RUST_LOG` (default `info`).
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Default pre-request hook: log the assembled request metadata.
pub fn log_request(ctx: &RequestContext) {
    tracing::info!(
        method = %ctx.method,
        route = %ctx.route,
        headers = ?ctx.headers,
        body = ?ctx.body,
        params = ?ctx.params,
        "request"
    );
}

/// Default post-response hook: log the response metadata.
pub fn log_response(ctx: &ResponseContext) {
    tracing::info!(
        method = %ctx.method,
        route = %ctx.route,
        status = ctx.status,
        body = %ctx.body,
        "response"
    );
}
