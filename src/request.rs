//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::Utf8Error;

use http::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use http::Method;
use percent_encoding::percent_decode_str;

use crate::context::Context;
use crate::middleware::request_id::RequestId;

/// An incoming HTTP request.
///
/// Middleware never mutates a request it did not create. It derives a new one
/// with [`Request::with_context`] or [`Request::with_path`] and passes that
/// downstream.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) params: HashMap<String, String>,
    pub(crate) remote_addr: Option<SocketAddr>,
    pub(crate) context: Context,
}

impl Request {
    /// Builds a request for an already-decoded `path`. The server goes
    /// through [`Request::from_parts`]; this is for tests and for handlers
    /// that re-dispatch internally.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            params: HashMap::new(),
            remote_addr: None,
            context: Context::new(),
        }
    }

    /// Shorthand for `Request::new(Method::GET, path)`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Builds a request from its wire form.
    ///
    /// The path is percent-decoded here, once. Routing, prefix stripping,
    /// file lookup and the access log all see `/assets/my file.js`, never
    /// `/assets/my%20file.js`. Fails when the decoded bytes are not UTF-8.
    /// The body is not part of a `Request`.
    pub fn from_parts(
        parts: http::request::Parts,
        remote_addr: Option<SocketAddr>,
    ) -> Result<Self, Utf8Error> {
        let path = percent_decode_str(parts.uri.path()).decode_utf8()?.into_owned();
        Ok(Self {
            method: parts.method,
            path,
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            params: HashMap::new(),
            remote_addr,
            context: Context::new(),
        })
    }

    /// Adds a header. Invalid names or values are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn peer_addr(&self) -> Option<SocketAddr> { self.remote_addr }
    pub fn context(&self) -> &Context { &self.context }

    /// Header lookup. Values that are not visible ASCII read as absent.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `User-Agent` header, or `""` when absent.
    pub fn user_agent(&self) -> &str {
        self.headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The correlation id attached by [`RequestLog`](crate::middleware::RequestLog),
    /// or `None` when the request did not pass through it.
    pub fn request_id(&self) -> Option<&RequestId> {
        RequestId::from_context(&self.context)
    }

    // ── Derivation ────────────────────────────────────────────────────────────

    /// Same request, carrying `context` instead of the current one.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Same request, addressed to `path`. Used by prefix stripping.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }
}
