//! Ordered header maps with deferred values.
//!
//! # Responsibilities
//! - Store headers in insertion order
//! - Hold either literal strings or value-producing callbacks
//! - Resolve everything to plain strings at request time
//!
//! # Design Decisions
//! - Callbacks receive the in-flight request context; state they need from
//!   their owner is captured by the closure
//! - Re-registering a name overwrites, so resolution never yields duplicates

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::http::request::RequestContext;

/// A deferred header value, evaluated against the request being assembled.
pub type HeaderFn = Arc<dyn Fn(&RequestContext) -> String + Send + Sync>;

/// A header entry: resolved up front or deferred to request time.
#[derive(Clone)]
pub enum HeaderValue {
    Literal(String),
    Deferred(HeaderFn),
}

/// Ordered mapping from header name to a literal or deferred value.
#[derive(Clone, Default)]
pub struct HeaderMap {
    entries: IndexMap<String, HeaderValue>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a literal header value. Overwrites any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .insert(name.into(), HeaderValue::Literal(value.into()));
    }

    /// Register a deferred header value, evaluated on every request.
    pub fn register<F>(&mut self, name: impl Into<String>, value_fn: F)
    where
        F: Fn(&RequestContext) -> String + Send + Sync + 'static,
    {
        self.entries
            .insert(name.into(), HeaderValue::Deferred(Arc::new(value_fn)));
    }

    /// Remove a header. Returns true if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.shift_remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every entry in insertion order against the current request
    /// context, producing plain string values.
    pub fn resolve(&self, ctx: &RequestContext) -> IndexMap<String, String> {
        let mut resolved = IndexMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let value = match value {
                HeaderValue::Literal(v) => v.clone(),
                HeaderValue::Deferred(f) => f(ctx),
            };
            resolved.insert(name.clone(), value);
        }
        resolved
    }
}

impl fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.entries {
            match value {
                HeaderValue::Literal(v) => map.entry(name, v),
                HeaderValue::Deferred(_) => map.entry(name, &"<deferred>"),
            };
        }
        map.finish()
    }
}
