//! The route tree.
//!
//! # Responsibilities
//! - Hold one URL template per node, plus static and placeholder children
//! - Produce bound copies when a placeholder value is supplied
//! - Expose HTTP verb methods that dispatch through the client's transport
//!
//! # Design Decisions
//! - Binding never mutates the original tree; it deep-copies the matched
//!   subtree and bakes every known value into the copy
//! - Children are keyed by raw path segment; lookup also accepts the
//!   sanitized identifier
//! - Nodes own their data and share the client core by `Arc`

pub mod ident;
pub mod template;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::client::ClientCore;
use crate::error::Error;
use crate::http::headers::HeaderMap;
use crate::http::request::{self, RequestOptions};
use crate::http::transport::TransportResponse;
use self::ident::to_identifier;
use self::template::StringTemplate;

/// One node in the route tree: a URL prefix with static children and
/// placeholder-bound ("callable") children.
///
/// Routes are created via [`Client::add_route`](crate::Client::add_route).
/// Cloning a route deep-copies its children, callables and bound values
/// while sharing the client core, so a clone is a fully independent tree.
#[derive(Clone)]
pub struct Route {
    core: Arc<ClientCore>,
    url: StringTemplate,
    trailing_slash: bool,

    /// Route-level headers, merged over client-level ones at request time.
    headers: HeaderMap,

    /// Static children, keyed by the raw path segment.
    children: IndexMap<String, Route>,

    /// Placeholder children, keyed by placeholder name.
    callables: IndexMap<String, Route>,

    /// Substitutions inherited from the bind chain. In
    /// `/foo/${barId}/${bazId}`, the `bazId` node carries `barId`'s value.
    bound: IndexMap<String, String>,
}

impl Route {
    pub(crate) fn new(
        core: Arc<ClientCore>,
        url: impl Into<String>,
        trailing_slash: bool,
    ) -> Self {
        let mut text = url.into();
        if trailing_slash {
            text.push('/');
        }

        Self {
            core,
            url: StringTemplate::new(text),
            trailing_slash,
            headers: HeaderMap::new(),
            children: IndexMap::new(),
            callables: IndexMap::new(),
            bound: IndexMap::new(),
        }
    }

    /// The rendered URL, with unbound placeholders left as literal
    /// `${name}`.
    pub fn url(&self) -> &str {
        self.url.render()
    }

    /// Route-level headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Substitutions already applied to this node by the bind chain.
    pub fn bindings(&self) -> &IndexMap<String, String> {
        &self.bound
    }

    /// Whether this node's template was created with a trailing slash.
    pub fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Look up a static child by raw segment or sanitized identifier.
    pub fn child(&self, name: &str) -> Option<&Route> {
        if let Some(route) = self.children.get(name) {
            return Some(route);
        }
        self.children
            .iter()
            .find(|(raw, _)| to_identifier(raw) == name)
            .map(|(_, route)| route)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Route> {
        let key = self
            .children
            .keys()
            .find(|raw| *raw == name || to_identifier(raw) == name)
            .cloned()?;
        self.children.get_mut(&key)
    }

    /// Look up a placeholder child by name, without binding it.
    pub fn callable(&self, name: &str) -> Option<&Route> {
        self.callables.get(name)
    }

    /// Iterate static children as (raw segment, route).
    pub fn children(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate placeholder children as (placeholder name, route).
    pub fn callables(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.callables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Invoke this route with exactly one named binding.
    ///
    /// Returns an independent, substituted copy of the matching placeholder
    /// subtree; the original tree is never mutated. Fails with
    /// [`Error::Arity`] unless exactly one pair is supplied and with
    /// [`Error::NotCallable`] if the name matches no placeholder child.
    pub fn call<I, K, V>(&self, bindings: I) -> Result<Route, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let mut pairs: Vec<(String, String)> = bindings
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();

        if pairs.len() != 1 {
            return Err(Error::Arity { got: pairs.len() });
        }

        let (name, value) = pairs.remove(0);
        self.bind(&name, value)
    }

    /// Single-pair convenience form of [`Route::call`]. The value is
    /// coerced to a string at the boundary.
    pub fn bind(&self, name: &str, value: impl ToString) -> Result<Route, Error> {
        let Some(target) = self.callables.get(name) else {
            return Err(Error::NotCallable {
                url: self.url.render().to_string(),
            });
        };

        // Preserve every value known so far; the new one wins on repeat.
        let mut next = self.bound.clone();
        next.insert(name.to_string(), value.to_string());

        let mut copy = target.clone();
        copy.url = copy.url.substitute(&next);
        for callable in copy.callables.values_mut() {
            callable.url = callable.url.substitute(&next);
        }
        for child in copy.children.values_mut() {
            child.apply_bindings(&next);
        }
        copy.bound = next;

        Ok(copy)
    }

    /// Propagate a binding set into this subtree: bake it into the URL
    /// template here, into every callable's template, and recursively into
    /// every static descendant.
    fn apply_bindings(&mut self, bindings: &IndexMap<String, String>) {
        self.url = self.url.substitute(bindings);
        self.bound = bindings.clone();

        for callable in self.callables.values_mut() {
            callable.url = callable.url.substitute(bindings);
        }
        for child in self.children.values_mut() {
            child.apply_bindings(bindings);
        }
    }

    /// Send a GET request.
    pub fn get(&self, options: &RequestOptions) -> Result<TransportResponse, Error> {
        self.request("GET", options)
    }

    /// Send a POST request.
    pub fn post(&self, options: &RequestOptions) -> Result<TransportResponse, Error> {
        self.request("POST", options)
    }

    /// Send a PUT request.
    pub fn put(&self, options: &RequestOptions) -> Result<TransportResponse, Error> {
        self.request("PUT", options)
    }

    /// Send a DELETE request.
    pub fn delete(&self, options: &RequestOptions) -> Result<TransportResponse, Error> {
        self.request("DELETE", options)
    }

    /// Send a request with an arbitrary method.
    pub fn request(
        &self,
        method: &str,
        options: &RequestOptions,
    ) -> Result<TransportResponse, Error> {
        request::dispatch(self, method, options)
    }

    pub(crate) fn core(&self) -> &Arc<ClientCore> {
        &self.core
    }

    pub(crate) fn children_mut(&mut self) -> &mut IndexMap<String, Route> {
        &mut self.children
    }

    pub(crate) fn callables_mut(&mut self) -> &mut IndexMap<String, Route> {
        &mut self.callables
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route<{}>", self.url.render())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::Client;
    use crate::error::Error;

    fn client() -> Client {
        Client::new("https://foo.com/v1/")
    }

    #[test]
    fn test_call_with_multiple_bindings() {
        let mut client = client();
        client.add_route("bar/${barId}").unwrap();

        let err = client
            .route("bar")
            .unwrap()
            .call([("barId", 10), ("wrong", 100)])
            .unwrap_err();

        assert!(matches!(err, Error::Arity { got: 2 }));
    }

    #[test]
    fn test_call_with_no_bindings() {
        let mut client = client();
        client.add_route("bar/${barId}").unwrap();

        let err = client
            .route("bar")
            .unwrap()
            .call(Vec::<(String, String)>::new())
            .unwrap_err();

        assert!(matches!(err, Error::Arity { got: 0 }));
    }

    #[test]
    fn test_not_callable_reports_url() {
        let mut client = client();
        client.add_route("bar").unwrap();

        let err = client.route("bar").unwrap().bind("barId", 10).unwrap_err();

        assert_eq!(
            err.to_string(),
            "route \"https://foo.com/v1/bar\" does not take arguments"
        );
    }

    #[test]
    fn test_bind_leaves_original_untouched() {
        let mut client = client();
        client.add_route("bar/${barId}").unwrap();

        let bar = client.route("bar").unwrap();
        let bound = bar.bind("barId", 5).unwrap();

        assert_eq!(bound.url(), "https://foo.com/v1/bar/5");
        assert_eq!(
            bar.callable("barId").unwrap().url(),
            "https://foo.com/v1/bar/${barId}"
        );
    }

    #[test]
    fn test_binding_independence() {
        let mut client = client();
        client.add_route("bar/${barId}").unwrap();

        let bar = client.route("bar").unwrap();
        let a = bar.bind("barId", 1).unwrap();
        let b = bar.bind("barId", 2).unwrap();

        assert_ne!(a.url(), b.url());
        assert_eq!(a.url(), "https://foo.com/v1/bar/1");
        assert_eq!(b.url(), "https://foo.com/v1/bar/2");
    }

    #[test]
    fn test_chained_placeholders() {
        let mut client = client();
        client.add_route("bar/${barId}/${bazId}").unwrap();

        let bar = client.route("bar").unwrap();
        let a = bar.bind("barId", 1).unwrap().bind("bazId", 10).unwrap();
        let b = bar.bind("barId", 2).unwrap().bind("bazId", 20).unwrap();

        assert_eq!(a.url(), "https://foo.com/v1/bar/1/10");
        assert_eq!(b.url(), "https://foo.com/v1/bar/2/20");
    }

    #[test]
    fn test_placeholders_split_by_static_segment() {
        let mut client = client();
        client.add_route("bar/${potatoId}/biz/${tomatoId}").unwrap();

        let result = client
            .route("bar")
            .unwrap()
            .bind("potatoId", 10)
            .unwrap()
            .child("biz")
            .unwrap()
            .bind("tomatoId", 55)
            .unwrap();

        assert_eq!(result.url(), "https://foo.com/v1/bar/10/biz/55");
    }

    #[test]
    fn test_partial_chains_stay_independent() {
        let mut client = client();
        client.add_route("bar/${barId}/${bazId}/${binId}").unwrap();

        let a = client.route("bar").unwrap().bind("barId", 1).unwrap();
        let b = a.bind("bazId", 10).unwrap().bind("binId", 500).unwrap();
        let c = a.bind("bazId", 20).unwrap().bind("binId", 100).unwrap();

        assert_eq!(a.url(), "https://foo.com/v1/bar/1");
        assert_eq!(b.url(), "https://foo.com/v1/bar/1/10/500");
        assert_eq!(c.url(), "https://foo.com/v1/bar/1/20/100");
    }

    #[test]
    fn test_deep_propagation_through_static_children() {
        let mut client = client();
        client
            .add_route("bar/${barId}/${bazId}/bin/${binId}/bao")
            .unwrap();

        let route = client
            .route("bar")
            .unwrap()
            .bind("barId", 10)
            .unwrap()
            .bind("bazId", 20)
            .unwrap()
            .child("bin")
            .unwrap()
            .bind("binId", 30)
            .unwrap()
            .child("bao")
            .unwrap()
            .clone();

        assert_eq!(route.url(), "https://foo.com/v1/bar/10/20/bin/30/bao");
    }

    #[test]
    fn test_intermediate_static_child_sees_earlier_binding() {
        let mut client = client();
        client.add_route("a/${x}/b/${y}/c").unwrap();

        let bound = client.route("a").unwrap().bind("x", 1).unwrap();
        let b = bound.child("b").unwrap();

        // b's own prefix already shows x=1 before y is bound.
        assert_eq!(b.url(), "https://foo.com/v1/a/1/b");
        assert_eq!(b.bindings().get("x").unwrap(), "1");

        let c = b.bind("y", 2).unwrap().child("c").unwrap().clone();
        assert_eq!(c.url(), "https://foo.com/v1/a/1/b/2/c");
    }

    #[test]
    fn test_repeated_placeholder_name_bakes_once() {
        let mut client = client();
        client.add_route("bar/${barId}/baz/${barId}").unwrap();

        // Deep propagation substitutes every occurrence of the name, so the
        // first bind bakes both; a later value cannot change baked text.
        let first = client.route("bar").unwrap().bind("barId", 1).unwrap();
        let second = first.child("baz").unwrap().bind("barId", 2).unwrap();

        assert_eq!(first.url(), "https://foo.com/v1/bar/1");
        assert_eq!(second.url(), "https://foo.com/v1/bar/1/baz/1");
    }

    #[test]
    fn test_debug_shows_url() {
        let mut client = client();
        client.add_route("bar").unwrap();
        let repr = format!("{:?}", client.route("bar").unwrap());
        assert!(repr.contains("https://foo.com/v1/bar"));
    }
}
