//! The API client: route registration and shared request state.
//!
//! # Responsibilities
//! - Own the root of the route tree and extend it from path templates
//! - Hold client-level headers, default request options and hooks
//! - Share the transport handle with every route
//!
//! # Design Decisions
//! - Routes share one `Arc<ClientCore>`; registration maps inside it use
//!   locks so headers and hooks can be added after routes exist
//! - `add_route` is idempotent: an already-registered prefix is reused,
//!   never rebuilt
//! - Lookup accepts both the raw segment and its sanitized identifier

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::config::schema::ClientConfig;
use crate::error::Error;
use crate::http::headers::HeaderMap;
use crate::http::request::{RequestContext, RequestOptions, ResponseContext};
use crate::http::transport::{HttpTransport, Transport};
use crate::observability::logging;
use crate::route::ident::to_identifier;
use crate::route::template::placeholder_name;
use crate::route::Route;

/// A hook observing a request just before it is sent.
pub type RequestHook = Arc<dyn Fn(&RequestContext) + Send + Sync>;

/// A hook observing a response just after it is received.
pub type ResponseHook = Arc<dyn Fn(&ResponseContext) + Send + Sync>;

/// State shared between a client and every route it created.
///
/// Routes clone freely; the core is never cloned, only its `Arc`.
pub struct ClientCore {
    base_uri: String,
    headers: RwLock<HeaderMap>,
    defaults: RwLock<RequestOptions>,
    request_hooks: RwLock<Vec<RequestHook>>,
    response_hooks: RwLock<Vec<ResponseHook>>,
    transport: Arc<dyn Transport>,
}

impl ClientCore {
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub(crate) fn resolve_headers(&self, ctx: &RequestContext) -> IndexMap<String, String> {
        self.headers.read().expect("header map lock").resolve(ctx)
    }

    pub(crate) fn default_options(&self) -> RequestOptions {
        self.defaults.read().expect("defaults lock").clone()
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        &*self.transport
    }

    pub(crate) fn run_request_hooks(&self, ctx: &RequestContext) {
        let hooks = self.request_hooks.read().expect("request hooks lock").clone();
        for hook in hooks {
            hook(ctx);
        }
    }

    pub(crate) fn run_response_hooks(&self, ctx: &ResponseContext) {
        let hooks = self
            .response_hooks
            .read()
            .expect("response hooks lock")
            .clone();
        for hook in hooks {
            hook(ctx);
        }
    }
}

/// Base of an API instance.
///
/// Routes are built by calling [`Client::add_route`] with a path template
/// and retrieved with [`Client::route`]:
///
/// ```no_run
/// use route_client::Client;
///
/// let mut client = Client::new("http://my.service/api/v777/");
/// client.add_route("fruits/${fruitId}").unwrap();
///
/// let fruit = client.route("fruits").unwrap().bind("fruitId", 5).unwrap();
/// let response = fruit.get(&Default::default()).unwrap();
/// ```
pub struct Client {
    core: Arc<ClientCore>,
    children: IndexMap<String, Route>,
}

impl Client {
    /// Create a client using the blocking reqwest transport.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self::with_transport(base_uri, Arc::new(HttpTransport::new()))
    }

    /// Create a client with an injected transport collaborator.
    pub fn with_transport(base_uri: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let request_hooks: Vec<RequestHook> = vec![Arc::new(logging::log_request)];
        let response_hooks: Vec<ResponseHook> = vec![Arc::new(logging::log_response)];

        let core = ClientCore {
            base_uri: base_uri.into(),
            headers: RwLock::new(HeaderMap::new()),
            defaults: RwLock::new(RequestOptions::default()),
            request_hooks: RwLock::new(request_hooks),
            response_hooks: RwLock::new(response_hooks),
            transport,
        };

        Self {
            core: Arc::new(core),
            children: IndexMap::new(),
        }
    }

    /// Build a client from a validated configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        Self::from_config_with(config, Arc::new(HttpTransport::new()))
    }

    /// Build a client from configuration with an injected transport.
    pub fn from_config_with(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, Error> {
        let client = Self::with_transport(config.base_uri.clone(), transport);

        for (name, value) in &config.headers {
            client.register_header(name.clone(), value.clone());
        }

        let mut defaults = RequestOptions::default();
        defaults.params = config.defaults.params.clone();
        if let Some(ms) = config.defaults.timeout_ms {
            defaults
                .extra
                .insert("timeout_ms".to_string(), serde_json::Value::from(ms));
        }
        client.set_default_options(defaults);

        let mut client = client;
        for spec in &config.routes {
            client.add_route_with(&spec.path, spec.trailing_slash)?;
        }

        Ok(client)
    }

    pub fn base_uri(&self) -> &str {
        self.core.base_uri()
    }

    /// Register a path template, creating any missing tree nodes.
    ///
    /// Segments of the form `${name}` become placeholder children; anything
    /// else becomes a static child keyed by the raw segment. Registering
    /// the same path twice returns the same node.
    pub fn add_route(&mut self, path: &str) -> Result<&Route, Error> {
        self.add_route_with(path, false)
    }

    /// Like [`Client::add_route`], optionally appending a trailing slash to
    /// the terminal node's template. The flag only affects nodes created by
    /// this call.
    pub fn add_route_with(&mut self, path: &str, trailing_slash: bool) -> Result<&Route, Error> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(Error::EmptyPath);
        }

        let last = segments.len() - 1;
        let core = Arc::clone(&self.core);

        // First segment hangs off the client root.
        let first = segments[0];
        let key = existing_key(&self.children, first).unwrap_or_else(|| first.to_string());
        let url = format!("{}{}", core.base_uri(), first);
        let slash = trailing_slash && last == 0;
        let mut current = self
            .children
            .entry(key)
            .or_insert_with(|| Route::new(Arc::clone(&core), url, slash));

        for (i, segment) in segments.iter().enumerate().skip(1) {
            let slash = trailing_slash && i == last;

            current = match placeholder_name(segment) {
                Some(name) => {
                    let url = format!("{}/{}", current.url(), segment);
                    current
                        .callables_mut()
                        .entry(name.to_string())
                        .or_insert_with(|| Route::new(Arc::clone(&core), url, slash))
                }
                None => {
                    let children = current.children_mut();
                    let key =
                        existing_key(children, segment).unwrap_or_else(|| segment.to_string());
                    let url = format!("{}/{}", current.url(), segment);
                    current
                        .children_mut()
                        .entry(key)
                        .or_insert_with(|| Route::new(Arc::clone(&core), url, slash))
                }
            };
        }

        Ok(current)
    }

    /// Look up a root route by raw segment or sanitized identifier.
    pub fn route(&self, name: &str) -> Option<&Route> {
        if let Some(route) = self.children.get(name) {
            return Some(route);
        }
        self.children
            .iter()
            .find(|(raw, _)| to_identifier(raw) == name)
            .map(|(_, route)| route)
    }

    pub fn route_mut(&mut self, name: &str) -> Option<&mut Route> {
        let key = self
            .children
            .keys()
            .find(|raw| *raw == name || to_identifier(raw) == name)
            .cloned()?;
        self.children.get_mut(&key)
    }

    /// Iterate root routes as (raw segment, route).
    pub fn routes(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a literal client-level header, sent with every request.
    pub fn register_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.core
            .headers
            .write()
            .expect("header map lock")
            .insert(name, value);
    }

    /// Register a deferred client-level header, evaluated per request.
    pub fn register_header_fn<F>(&self, name: impl Into<String>, value_fn: F)
    where
        F: Fn(&RequestContext) -> String + Send + Sync + 'static,
    {
        self.core
            .headers
            .write()
            .expect("header map lock")
            .register(name, value_fn);
    }

    /// Remove a client-level header. Returns true if it was present.
    pub fn remove_header(&self, name: &str) -> bool {
        self.core
            .headers
            .write()
            .expect("header map lock")
            .remove(name)
    }

    /// Options applied under every call's own options (call-site wins).
    pub fn set_default_options(&self, defaults: RequestOptions) {
        *self.core.defaults.write().expect("defaults lock") = defaults;
    }

    /// Register a pre-request hook, invoked in registration order.
    pub fn on_request<F>(&self, hook: F)
    where
        F: Fn(&RequestContext) + Send + Sync + 'static,
    {
        self.core
            .request_hooks
            .write()
            .expect("request hooks lock")
            .push(Arc::new(hook));
    }

    /// Register a post-response hook, invoked in registration order.
    pub fn on_response<F>(&self, hook: F)
    where
        F: Fn(&ResponseContext) + Send + Sync + 'static,
    {
        self.core
            .response_hooks
            .write()
            .expect("response hooks lock")
            .push(Arc::new(hook));
    }
}

/// Find the stored key whose sanitized identifier matches `segment`'s.
/// Duplicate detection works from raw segments, so `foo-bar` and `foo_bar`
/// resolve to the same node.
fn existing_key(children: &IndexMap<String, Route>, segment: &str) -> Option<String> {
    let ident = to_identifier(segment);
    children
        .keys()
        .find(|raw| to_identifier(raw) == ident)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new("https://foo.com/v1/")
    }

    #[test]
    fn test_route_url() {
        let mut client = client();
        let route = client.add_route("bar").unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar");
    }

    #[test]
    fn test_add_route_idempotent_by_identity() {
        let mut client = client();
        let first = client.add_route("bar").unwrap() as *const Route;
        let second = client.add_route("bar").unwrap() as *const Route;
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_callable_reused() {
        let mut client = client();
        let first = client.add_route("bar/${barId}").unwrap() as *const Route;
        let second = client.add_route("bar/${barId}").unwrap() as *const Route;
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_child_reused() {
        let mut client = client();
        let first = client.add_route("bar/foo").unwrap() as *const Route;
        let second = client.add_route("bar/foo").unwrap() as *const Route;
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_registration_keeps_siblings() {
        let mut client = client();
        client.add_route("bar/foo").unwrap();
        client.add_route("bar/baz").unwrap();
        client.add_route("bar/foo").unwrap();

        let bar = client.route("bar").unwrap();
        let names: Vec<&str> = bar.children().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["foo", "baz"]);
    }

    #[test]
    fn test_nested_children() {
        let mut client = client();
        let route = client.add_route("bar/findByStatus").unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar/findByStatus");

        let nested = client.route("bar").unwrap().child("findByStatus").unwrap();
        assert_eq!(nested.url(), "https://foo.com/v1/bar/findByStatus");
    }

    #[test]
    fn test_placeholder_url_unformatted() {
        let mut client = client();
        let route = client.add_route("bar/${barId}").unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar/${barId}");
    }

    #[test]
    fn test_placeholder_then_child_url() {
        let mut client = client();
        let route = client.add_route("bar/${barId}/uploadImage").unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar/${barId}/uploadImage");

        let bound = client
            .route("bar")
            .unwrap()
            .bind("barId", 1)
            .unwrap()
            .child("uploadImage")
            .unwrap()
            .clone();
        assert_eq!(bound.url(), "https://foo.com/v1/bar/1/uploadImage");
    }

    #[test]
    fn test_path_normalization() {
        let mut client = client();
        let first = client.add_route("a//b/").unwrap() as *const Route;
        let second = client.add_route("a/b").unwrap() as *const Route;

        assert!(std::ptr::eq(first, second));
        let b = client.route("a").unwrap().child("b").unwrap();
        assert_eq!(b.url(), "https://foo.com/v1/a/b");
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut client = client();
        assert!(matches!(client.add_route(""), Err(Error::EmptyPath)));
        assert!(matches!(client.add_route("//"), Err(Error::EmptyPath)));
    }

    #[test]
    fn test_trailing_slash_opt_in() {
        let mut client = client();
        let route = client.add_route_with("bar/", true).unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar/");
    }

    #[test]
    fn test_trailing_slash_stripped_by_default() {
        let mut client = client();
        let route = client.add_route("bar/").unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar");
    }

    #[test]
    fn test_trailing_slash_added_when_missing() {
        let mut client = client();
        let route = client.add_route_with("bar", true).unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar/");
    }

    #[test]
    fn test_trailing_slash_only_on_terminal_node() {
        let mut client = client();
        let route = client.add_route_with("bar/${barId}/files", true).unwrap();
        assert_eq!(route.url(), "https://foo.com/v1/bar/${barId}/files/");

        // Intermediate nodes are unaffected.
        let bar = client.route("bar").unwrap();
        assert_eq!(bar.url(), "https://foo.com/v1/bar");
        assert_eq!(
            bar.callable("barId").unwrap().url(),
            "https://foo.com/v1/bar/${barId}"
        );
    }

    #[test]
    fn test_keyword_segment_lookup() {
        let mut client = client();
        let route = client.add_route("match/${matchId}").unwrap();

        // URL keeps the raw segment; lookup works under the sanitized name.
        assert_eq!(route.url(), "https://foo.com/v1/match/${matchId}");
        assert!(client.route("_match").is_some());
        assert!(client.route("match").is_some());
    }

    #[test]
    fn test_dashed_segment_lookup() {
        let mut client = client();
        client.add_route("foo-bar/baz").unwrap();

        let foo_bar = client.route("foo_bar").unwrap();
        assert_eq!(foo_bar.url(), "https://foo.com/v1/foo-bar");
        assert!(foo_bar.child("baz").is_some());
    }

    #[test]
    fn test_equivalent_identifiers_share_node() {
        let mut client = client();
        let first = client.add_route("foo-bar").unwrap() as *const Route;
        let second = client.add_route("foo_bar").unwrap() as *const Route;
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_clients_do_not_share_state() {
        let client = Client::new("http://foo.bar/api/v1");
        client.register_header("Accept", "application/json");
        client.register_header("Content-Type", "application/json");

        let other = Client::new("http://foo.bar/api/v1");
        let ctx = RequestContext {
            method: "GET".to_string(),
            route: String::new(),
            headers: IndexMap::new(),
            body: None,
            params: IndexMap::new(),
        };
        assert!(other.core.resolve_headers(&ctx).is_empty());
        assert_eq!(client.core.resolve_headers(&ctx).len(), 2);
    }
}
