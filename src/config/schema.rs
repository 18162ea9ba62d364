//! Configuration schema definitions.
//!
//! This module defines the configuration structure for a client built from
//! a file. All types derive Serde traits for deserialization from TOML.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for an API client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URI every route template is appended to. Callers are
    /// responsible for consistent joining (usually a trailing slash).
    pub base_uri: String,

    /// Path templates registered at construction time.
    pub routes: Vec<RouteSpec>,

    /// Client-level headers, sent with every request.
    pub headers: IndexMap<String, String>,

    /// Options applied to every outgoing call (call-site options win).
    pub defaults: DefaultsConfig,
}

/// One path template to register.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteSpec {
    /// Slash-delimited template; `${name}` segments become placeholders.
    pub path: String,

    /// Append a trailing slash to the terminal node's URL.
    #[serde(default)]
    pub trailing_slash: bool,
}

/// Default request options.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Query parameters added to every request.
    pub params: IndexMap<String, String>,

    /// Per-request timeout handed to the transport.
    pub timeout_ms: Option<u64>,
}
