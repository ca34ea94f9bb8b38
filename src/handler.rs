//! Handler trait and type erasure.
//!
//! # One contract for everything
//!
//! A [`Handler`] takes a [`Request`] and writes its answer into a
//! [`ResponseWriter`]. Route handlers, middleware, the [`Mux`](crate::Mux)
//! and the file server all implement the same trait, so any of them can wrap
//! any other:
//!
//! ```text
//! Logged ──> Mux ──┬─> Neuter ──> FileServer        (/assets/…)
//!                  └─> SpaIndex                     (everything else)
//! ```
//!
//! Plain `async fn`s are handlers too. The blanket impl below awaits the
//! function and replays the returned [`Response`] onto the writer:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ mux.handle("/", hello)
//! Arc::new(hello) as BoxedHandler                  ← stored once
//!        ↓
//! handler.serve(&mut writer, req)  at request time ← one vtable dispatch
//!        ↓
//! Box::pin(async { hello(req).await.into_response().write_to(writer) })
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response, ResponseBuffer, ResponseWriter};

/// A heap-allocated, type-erased future borrowing the handler and the writer
/// for `'a`.
///
/// `Send` lets tokio move the future across worker threads between polls.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

/// Implemented for every request handler and every middleware.
///
/// Implement it directly when you need the writer (to observe or rewrite what
/// a wrapped handler sends). Otherwise write an `async fn(Request) -> impl
/// IntoResponse` and let the blanket impl do the rest.
pub trait Handler: Send + Sync + 'static {
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a> {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response().write_to(writer) })
    }
}

/// Erases a handler's concrete type.
pub fn boxed(handler: impl Handler) -> BoxedHandler {
    Arc::new(handler)
}

/// Runs `handler` against a fresh [`ResponseBuffer`] and returns what it wrote.
///
/// This is how the server drives the root handler, and the simplest way to
/// exercise a handler chain in tests.
pub async fn respond<H: Handler + ?Sized>(handler: &H, req: Request) -> Response {
    let mut buffer = ResponseBuffer::new();
    handler.serve(&mut buffer, req).await;
    buffer.into_response()
}
