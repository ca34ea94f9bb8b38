//! Middleware layer.
//!
//! Middleware is a [`Handler`] that owns another handler and decides what to
//! do around it. The [`Middleware`] trait is the constructor side of that:
//! given the next handler, produce the wrapped one.
//!
//! ```rust
//! use tollgate::middleware::{DirGuard, HandlerExt, RequestLog};
//! use tollgate::Request;
//!
//! async fn page(_req: Request) -> &'static str { "page" }
//!
//! // Outermost last: the logger sees what the guard answered.
//! let app = page
//!     .with(DirGuard::new("/"))
//!     .with(RequestLog::tracing());
//! ```
//!
//! Built-in middleware:
//! - [`RequestLog`]: correlation id per request, one access line per request
//! - [`DirGuard`] / [`Neuter`]: 404 for directory-shaped paths
//! - [`StatusRecorder`]: writer decorator for middleware that needs the
//!   final status

pub mod logging;
pub mod neuter;
pub mod request_id;
pub mod status;

pub use logging::{LogSink, Logged, RequestLog, TracingSink};
pub use neuter::{DirGuard, Neuter};
pub use request_id::RequestId;
pub use status::StatusRecorder;

use crate::handler::Handler;

/// Builds a wrapping handler around `next`.
pub trait Middleware<H: Handler> {
    type Output: Handler;

    fn wrap(&self, next: H) -> Self::Output;
}

/// Fluent middleware composition for every [`Handler`].
pub trait HandlerExt: Handler + Sized {
    fn with<M: Middleware<Self>>(self, middleware: M) -> M::Output {
        middleware.wrap(self)
    }
}

impl<H: Handler> HandlerExt for H {}
