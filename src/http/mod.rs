//! HTTP request plumbing.
//!
//! # Data Flow
//! ```text
//! Route verb call
//!     → request.rs (context assembly, header layering, hooks)
//!     → transport.rs (Transport trait, reqwest implementation)
//! ```
//!
//! # Design Decisions
//! - Header resolution order: client-level, then route-level, then
//!   call-site overrides (later wins per key)
//! - Hooks observe, never mutate; failures propagate uncaught
//! - The transport never retries and never interprets statuses

pub mod headers;
pub mod request;
pub mod transport;
