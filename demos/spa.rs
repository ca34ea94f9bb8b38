//! Serve a compiled single-page application with access logging.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example spa
//!
//! Environment:
//!   TOLLGATE_ADDR  listen address            (default 127.0.0.1:3000)
//!   TOLLGATE_DIST  directory holding app/dist (default ./tests/fixtures)
//!
//! Try:
//!   curl -i http://localhost:3000/                   # index.html
//!   curl -i http://localhost:3000/settings/profile   # index.html (client route)
//!   curl -i http://localhost:3000/assets/js/app.js   # the asset
//!   curl -i http://localhost:3000/assets/js/         # 404, no listing
//!   curl -i http://localhost:3000/favicon.ico

use std::sync::Arc;

use tollgate::fs::DirFs;
use tollgate::middleware::{HandlerExt, RequestLog};
use tollgate::{Server, spa};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), tollgate::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("TOLLGATE_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_owned());
    let dist = std::env::var("TOLLGATE_DIST").unwrap_or_else(|_| "./tests/fixtures".to_owned());

    let app = spa(Arc::new(DirFs::new(dist)), "app/dist", "assets")?.with(RequestLog::tracing());

    Server::bind(&addr).serve_until(app, shutdown()).await
}

/// Ctrl-C, or SIGTERM on Unix.
async fn shutdown() {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        () = terminate => {}
    }
}
