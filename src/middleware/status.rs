//! Status-capturing response writer.

use http::header::HeaderMap;
use http::StatusCode;

use crate::response::ResponseWriter;

/// Wraps a [`ResponseWriter`], forwards every call, and remembers the status
/// the response was committed with.
///
/// The recorded status is the argument of the first `write_header`, or
/// `200 OK` when the body is written first or nothing is written at all.
/// Build one per request; it is never shared.
#[derive(Debug)]
pub struct StatusRecorder<W> {
    inner: W,
    status: StatusCode,
    committed: bool,
}

impl<W: ResponseWriter> StatusRecorder<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, status: StatusCode::OK, committed: false }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: ResponseWriter> ResponseWriter for StatusRecorder<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if !self.committed {
            self.status = status;
            self.committed = true;
        }
        self.inner.write_header(status);
    }

    fn write(&mut self, body: &[u8]) {
        self.committed = true;
        self.inner.write(body);
    }
}
