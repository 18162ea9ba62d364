//! Error definitions for route construction and dispatch.

use thiserror::Error;

use crate::http::transport::TransportError;

/// Errors raised by the route tree and the request dispatcher.
///
/// Every variant except [`Error::Transport`] is a caller bug (malformed
/// route usage) and is fatal to the current call; nothing here is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A callable route was invoked with zero or more than one binding.
    #[error("expected exactly one binding, got {got}")]
    Arity { got: usize },

    /// The route has no placeholder child matching the supplied binding.
    #[error("route \"{url}\" does not take arguments")]
    NotCallable { url: String },

    /// The registered path contained no non-empty segments.
    #[error("route path has no segments")]
    EmptyPath,

    /// The transport collaborator failed; propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for route operations.
pub type Result<T> = std::result::Result<T, Error>;
