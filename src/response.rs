//! Outgoing HTTP responses and the writer they are written through.
//!
//! Two views of the same thing live here:
//!
//! - [`Response`] is a value. Function handlers build one and return it.
//! - [`ResponseWriter`] is a sink. Middleware sits between a handler and the
//!   connection by wrapping the writer (see
//!   [`StatusRecorder`](crate::middleware::StatusRecorder)).
//!
//! [`Response::write_to`] bridges the two, and [`ResponseBuffer`] turns a
//! sequence of writes back into a [`Response`] for the server to send.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, X_CONTENT_TYPE_OPTIONS};
use http::StatusCode;
use http_body_util::Full;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseBuilder::bytes`].
pub enum ContentType {
    Html,  // text/html; charset=utf-8
    Text,  // text/plain; charset=utf-8
    Other(String),
}

impl ContentType {
    fn as_str(&self) -> &str {
        match self {
            Self::Html        => "text/html; charset=utf-8",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Other(mime) => mime.as_str(),
        }
    }
}

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// The response-writing target a [`Handler`](crate::Handler) writes into.
///
/// The status is committed by the first `write_header` call, or implicitly
/// as `200 OK` by the first `write`. Once committed, further `write_header`
/// calls are ignored and header edits no longer reach the client.
pub trait ResponseWriter: Send {
    fn headers_mut(&mut self) -> &mut HeaderMap;
    fn write_header(&mut self, status: StatusCode);
    fn write(&mut self, body: &[u8]);
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers_mut(&mut self) -> &mut HeaderMap { (**self).headers_mut() }
    fn write_header(&mut self, status: StatusCode) { (**self).write_header(status) }
    fn write(&mut self, body: &[u8]) { (**self).write(body) }
}

/// In-memory [`ResponseWriter`]. The server hands one to the root handler per
/// request and sends whatever it holds afterwards.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status, or `None` if nothing has been written yet.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Consumes the buffer. A handler that wrote nothing produces an empty
    /// `200 OK`.
    pub fn into_response(self) -> Response {
        Response {
            status: self.status.unwrap_or(StatusCode::OK),
            headers: self.headers,
            body: Bytes::from(self.body),
        }
    }
}

impl ResponseWriter for ResponseBuffer {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, body: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(body);
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts
///
/// ```rust
/// use tollgate::{Response, StatusCode};
///
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// Response::not_found();
/// Response::error(StatusCode::INTERNAL_SERVER_ERROR, "open index.html: file does not exist");
/// ```
///
/// # Builder
///
/// ```rust
/// use tollgate::{ContentType, Response, StatusCode};
///
/// Response::builder()
///     .status(StatusCode::OK)
///     .header("cache-control", "no-cache")
///     .bytes(ContentType::Html, b"<!doctype html>".to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Response {
    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { status: code, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// Plain-text error reply: the message plus a trailing newline, marked
    /// `nosniff` so browsers never reinterpret it.
    pub fn error(code: StatusCode, message: impl AsRef<str>) -> Self {
        let mut response = Self::builder()
            .status(code)
            .text(format!("{}\n", message.as_ref()));
        response
            .headers
            .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        response
    }

    /// `404 page not found`.
    pub fn not_found() -> Self {
        Self::error(StatusCode::NOT_FOUND, "404 page not found")
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup as a string slice.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Replays this response onto `writer`: headers, then status, then body.
    pub fn write_to(self, writer: &mut dyn ResponseWriter) {
        writer.headers_mut().extend(self.headers);
        writer.write_header(self.status);
        if !self.body.is_empty() {
            writer.write(&self.body);
        }
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Appends a header. Invalid names or values are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text.as_str(), Bytes::from(body.into()))
    }

    /// Terminate with a typed body.
    pub fn bytes(self, content_type: ContentType, body: impl Into<Bytes>) -> Response {
        self.finish(content_type.as_str(), body.into())
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Bytes::new() }
    }

    fn finish(mut self, content_type: &str, body: Bytes) -> Response {
        if let Ok(value) = HeaderValue::from_str(content_type) {
            self.headers.insert(CONTENT_TYPE, value);
        }
        Response { status: self.status, headers: self.headers, body }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`StatusCode`] directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_header_wins() {
        let mut buf = ResponseBuffer::new();
        buf.write_header(StatusCode::NOT_FOUND);
        buf.write_header(StatusCode::INTERNAL_SERVER_ERROR);
        buf.write(b"gone");

        let response = buf.into_response();
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.body(), b"gone");
    }

    #[test]
    fn body_write_commits_ok() {
        let mut buf = ResponseBuffer::new();
        buf.write(b"hi");
        buf.write_header(StatusCode::NOT_FOUND);

        assert_eq!(buf.status(), Some(StatusCode::OK));
    }

    #[test]
    fn error_reply_is_plain_text_with_newline() {
        let response = Response::error(StatusCode::INTERNAL_SERVER_ERROR, "boom");

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), b"boom\n");
        assert_eq!(response.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
    }

    #[test]
    fn write_to_replays_status_headers_and_body() {
        let mut buf = ResponseBuffer::new();
        Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/things/1")
            .text("made")
            .write_to(&mut buf);

        let response = buf.into_response();
        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(response.header("location"), Some("/things/1"));
        assert_eq!(response.body(), b"made");
    }
}
