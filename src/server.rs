//! The process shell around a handler chain.
//!
//! [`Server`] accepts TCP connections, speaks HTTP/1 or HTTP/2 through
//! hyper-util's auto builder, and turns every request into one call of the
//! root [`Handler`]. Request bodies are never read: nothing in this crate
//! consumes one.
//!
//! When to stop is the caller's decision. [`Server::serve_until`] takes any
//! future as the stop signal, stops accepting once it resolves, and returns
//! after open connections have finished their in-flight requests.

use std::convert::Infallible;
use std::future::{self, Future};
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::handler::{Handler, respond};
use crate::request::Request;
use crate::response::Response;

/// HTTP server for one root handler.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// # Panics
    ///
    /// Panics if `addr` is not a `host:port` socket address.
    ///
    /// ```rust,no_run
    /// use tollgate::Server;
    /// let server = Server::bind("127.0.0.1:3000");
    /// ```
    pub fn bind(addr: &str) -> Self {
        let addr = addr
            .parse()
            .unwrap_or_else(|e| panic!("tollgate: bad listen address `{addr}`: {e}"));
        Self { addr }
    }

    /// Serves `handler` until the process ends.
    pub async fn serve<H: Handler>(self, handler: H) -> Result<(), Error> {
        self.serve_until(handler, future::pending()).await
    }

    /// Serves `handler` until `stop` resolves, then waits for open
    /// connections to finish.
    pub async fn serve_until<H, F>(self, handler: H, stop: F) -> Result<(), Error>
    where
        H: Handler,
        F: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "listening");

        let handler = Arc::new(handler);
        let builder = ConnBuilder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();
        tokio::pin!(stop);

        loop {
            let (stream, peer) = tokio::select! {
                () = &mut stop => break,
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("accept: {e}");
                        continue;
                    }
                },
            };

            let handler = Arc::clone(&handler);
            let svc = service_fn(move |req| {
                let handler = Arc::clone(&handler);
                async move { Ok::<_, Infallible>(dispatch(&*handler, req, peer).await) }
            });

            let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), svc);
            let conn = graceful.watch(conn.into_owned());
            tokio::spawn(async move {
                if let Err(e) = conn.await {
                    debug!(%peer, "connection closed: {e}");
                }
            });
        }

        info!("stop requested, waiting for open connections");
        graceful.shutdown().await;
        Ok(())
    }
}

/// One hyper request in, one response out. The body is dropped unread.
async fn dispatch<H: Handler>(
    handler: &H,
    req: hyper::Request<Incoming>,
    peer: SocketAddr,
) -> http::Response<Full<Bytes>> {
    let (parts, _body) = req.into_parts();
    let response = match Request::from_parts(parts, Some(peer)) {
        Ok(req) => respond(handler, req).await,
        Err(e) => Response::error(http::StatusCode::BAD_REQUEST, format!("400 bad request path: {e}")),
    };
    response.into_inner()
}
