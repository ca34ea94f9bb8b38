//! Request multiplexer.
//!
//! Two kinds of patterns, one rule: the most specific registration wins.
//!
//! - A pattern ending in `/` registers a **subtree**: it matches every path
//!   starting with it. Among subtrees, the longest matching one is chosen.
//! - Any other pattern is an **exact** route, stored in a radix tree
//!   ([`matchit`]) and allowed to carry `{name}` parameters.
//!
//! An exact match always beats a subtree, since an exact pattern that matches
//! is at least as long as any subtree that does.
//!
//! ```rust
//! use tollgate::{Mux, Request, Response};
//!
//! # async fn assets(_: Request) -> Response { Response::text("") }
//! # async fn user(_: Request) -> Response { Response::text("") }
//! # async fn index(_: Request) -> Response { Response::text("") }
//! let mux = Mux::new()
//!     .handle("/assets/",     assets)  // /assets/js/app.js
//!     .handle("/users/{id}",  user)    // /users/42 only
//!     .handle("/",            index);  // everything else
//! ```

use std::collections::HashMap;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, Handler, boxed};
use crate::request::Request;
use crate::response::{Response, ResponseWriter};

/// Routing table dispatching on the request path.
///
/// Build it once at startup. Every [`Mux::handle`] call returns `self`, so
/// registrations chain naturally. A `Mux` is itself a [`Handler`]: it can be
/// wrapped in middleware or mounted inside another `Mux`.
pub struct Mux {
    exact: MatchitRouter<BoxedHandler>,
    /// Longest prefix first.
    subtrees: Vec<(String, BoxedHandler)>,
}

impl Mux {
    pub fn new() -> Self {
        Self { exact: MatchitRouter::new(), subtrees: Vec::new() }
    }

    /// Registers `handler` under `pattern`. Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` does not start with `/`, is already registered,
    /// or is rejected by the route tree. Routes are fixed at startup, so a
    /// bad one is a programming error.
    pub fn handle(mut self, pattern: &str, handler: impl Handler) -> Self {
        if !pattern.starts_with('/') {
            panic!("invalid route `{pattern}`: must start with `/`");
        }

        if pattern.ends_with('/') {
            if self.subtrees.iter().any(|(prefix, _)| prefix == pattern) {
                panic!("invalid route `{pattern}`: already registered");
            }
            self.subtrees.push((pattern.to_owned(), boxed(handler)));
            self.subtrees.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        } else {
            self.exact
                .insert(pattern, boxed(handler))
                .unwrap_or_else(|e| panic!("invalid route `{pattern}`: {e}"));
        }
        self
    }

    pub(crate) fn lookup(&self, path: &str) -> Option<(&BoxedHandler, HashMap<String, String>)> {
        if let Ok(matched) = self.exact.at(path) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Some((matched.value, params));
        }

        self.subtrees
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, handler)| (handler, HashMap::new()))
    }
}

impl Default for Mux {
    fn default() -> Self { Self::new() }
}

impl Handler for Mux {
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a> {
        match self.lookup(req.path()) {
            Some((handler, params)) => handler.serve(writer, req.with_params(params)),
            None => Box::pin(async move { Response::not_found().write_to(writer) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    use crate::handler::respond;

    async fn assets(_req: Request) -> &'static str { "assets" }
    async fn images(_req: Request) -> &'static str { "images" }
    async fn index(_req: Request) -> &'static str { "index" }
    async fn about(_req: Request) -> &'static str { "about" }

    async fn user(req: Request) -> String {
        format!("user {}", req.param("id").unwrap_or("?"))
    }

    fn mux() -> Mux {
        Mux::new()
            .handle("/", index)
            .handle("/assets/", assets)
            .handle("/assets/img/", images)
            .handle("/about", about)
            .handle("/users/{id}", user)
    }

    async fn body(mux: &Mux, path: &str) -> String {
        let response = respond(mux, Request::get(path)).await;
        String::from_utf8(response.body().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn longest_subtree_wins() {
        let mux = mux();
        assert_eq!(body(&mux, "/assets/app.js").await, "assets");
        assert_eq!(body(&mux, "/assets/img/logo.png").await, "images");
        assert_eq!(body(&mux, "/assets").await, "index");
        assert_eq!(body(&mux, "/deep/client/route").await, "index");
    }

    #[tokio::test]
    async fn exact_routes_beat_subtrees() {
        let mux = mux();
        assert_eq!(body(&mux, "/about").await, "about");
        assert_eq!(body(&mux, "/about/team").await, "index");
        assert_eq!(body(&mux, "/users/42").await, "user 42");
    }

    #[tokio::test]
    async fn unmatched_path_is_not_found() {
        let mux = Mux::new().handle("/api/", assets);
        let response = respond(&mux, Request::get("/elsewhere")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_subtree_panics() {
        let _ = Mux::new().handle("/a/", assets).handle("/a/", images);
    }

    #[test]
    #[should_panic(expected = "must start with `/`")]
    fn relative_pattern_panics() {
        let _ = Mux::new().handle("assets/", assets);
    }
}
