//! Per-request access logging.
//!
//! Every request passing through [`Logged`] gets a fresh [`RequestId`] in its
//! context, runs downstream inside a `request` span, and produces exactly one
//! access line once the downstream handler returns:
//!
//! ```text
//! [17] HTTP GET /assets/app.js - 200     3ms (10.0.0.7:51234) Mozilla/5.0
//! ```
//!
//! Fields, in order: id, method, path, status, elapsed milliseconds (right
//! aligned to 5), peer address (`-` when unknown), user agent.
//!
//! If the downstream handler panics, the panic unwinds through here and no
//! line is written for that request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::handler::{BoxFuture, Handler};
use crate::middleware::Middleware;
use crate::middleware::request_id::RequestId;
use crate::middleware::status::StatusRecorder;
use crate::request::Request;
use crate::response::ResponseWriter;

/// Destination for access lines.
///
/// Any `Fn(&str) + Send + Sync` closure is a sink, which is handy for tests
/// and for forwarding into an existing logger.
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, line: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn log(&self, line: &str) {
        self(line)
    }
}

/// Emits each access line as an `INFO` event with target `tollgate::access`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, line: &str) {
        info!(target: "tollgate::access", "{line}");
    }
}

/// Access-log middleware. Cheap to clone; every clone writes to the same sink.
#[derive(Clone)]
pub struct RequestLog {
    sink: Arc<dyn LogSink>,
}

impl RequestLog {
    pub fn new(sink: impl LogSink) -> Self {
        Self { sink: Arc::new(sink) }
    }

    /// Logs through [`TracingSink`].
    pub fn tracing() -> Self {
        Self::new(TracingSink)
    }
}

impl<H: Handler> Middleware<H> for RequestLog {
    type Output = Logged<H>;

    fn wrap(&self, next: H) -> Logged<H> {
        Logged { next, sink: Arc::clone(&self.sink) }
    }
}

/// A handler wrapped by [`RequestLog`].
pub struct Logged<H> {
    next: H,
    sink: Arc<dyn LogSink>,
}

impl<H: Handler> Handler for Logged<H> {
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a> {
        Box::pin(async move {
            let start = Instant::now();
            let mut recorder = StatusRecorder::new(writer);

            let id = RequestId::next();
            let req = {
                let ctx = req.context().with(id.clone());
                req.with_context(ctx)
            };

            let method = req.method().clone();
            let path = req.path().to_owned();
            let peer = req
                .peer_addr()
                .map_or_else(|| "-".to_owned(), |addr| addr.to_string());
            let user_agent = req.user_agent().to_owned();

            let span = info_span!("request", request_id = %id);
            self.next.serve(&mut recorder, req).instrument(span).await;

            let line = format!(
                "[{id}] HTTP {method} {path} - {status} {ms:>5}ms ({peer}) {user_agent}",
                status = recorder.status().as_u16(),
                ms = start.elapsed().as_millis(),
            );
            self.sink.log(&line);
        })
    }
}
