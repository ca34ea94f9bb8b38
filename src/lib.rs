//! # tollgate
//!
//! Small, composable HTTP middlewares for services that ship their own
//! frontend.
//!
//! Everything is a [`Handler`]: route functions, middleware, the [`Mux`], the
//! file server. Middleware wraps a handler and is a handler, so a whole
//! application is one value you hand to the [`Server`].
//!
//! What's in the box:
//!
//! - **Request log**: a process-unique correlation id per request, carried in
//!   the request [`Context`], plus one access line per request with status and
//!   latency ([`middleware::RequestLog`])
//! - **Directory guard**: `404` instead of a directory listing
//!   ([`middleware::Neuter`])
//! - **Static files**: a prefix-mounted file server over any
//!   [`fs::FileSystem`] ([`static_files`])
//! - **SPA router**: assets from the bundle's assets folder, `index.html` for
//!   every other path ([`spa()`])
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tollgate::fs::DirFs;
//! use tollgate::middleware::{HandlerExt, RequestLog};
//! use tollgate::{Server, spa};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tollgate::Error> {
//!     let app = spa(Arc::new(DirFs::new(".")), "frontend/dist", "assets")?
//!         .with(RequestLog::tracing());
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//! ```

mod context;
mod error;
mod handler;
mod mux;
mod request;
mod response;
mod server;

pub mod fs;
pub mod middleware;
pub mod spa;
pub mod static_files;

pub use context::Context;
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, Handler, boxed, respond};
pub use http::{Method, StatusCode};
pub use mux::Mux;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuffer, ResponseBuilder, ResponseWriter};
pub use server::Server;
pub use spa::spa;
