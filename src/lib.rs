//! Dynamic API client constructor.
//!
//! Given a base URI and slash-delimited path templates (optionally containing
//! `${name}` placeholders), [`Client`] builds a tree of [`Route`] objects.
//! Navigating a static segment returns a child route; binding a placeholder
//! returns a fresh, substituted copy of the subtree. Any route can issue
//! requests through a pluggable [`Transport`].
//!
//! ```no_run
//! use route_client::Client;
//!
//! let mut client = Client::new("https://foo.com/v1/");
//! client.add_route("bar/${barId}").unwrap();
//!
//! let route = client.route("bar").unwrap().bind("barId", 5).unwrap();
//! assert_eq!(route.url(), "https://foo.com/v1/bar/5");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod route;

pub use client::Client;
pub use error::Error;
pub use http::headers::HeaderMap;
pub use http::request::{RequestContext, RequestOptions, ResponseContext};
pub use http::transport::{
    HttpTransport, SendOptions, Transport, TransportError, TransportResponse,
};
pub use route::template::StringTemplate;
pub use route::Route;
