//! Single-page application serving.
//!
//! A compiled frontend bundle usually looks like this:
//!
//! ```text
//! app/dist
//! ├── favicon.ico
//! ├── index.html
//! └── assets
//!     ├── css/app.0a0b1c2d.css
//!     └── js/app.0a0b1c2d.js
//! ```
//!
//! [`spa`] turns it into a [`Mux`] with two registrations:
//!
//! | Pattern | Handler | Serves |
//! |---|---|---|
//! | `/assets/` | [`Neuter`]`("/")` over a [`FileServer`] | the asset file, never a listing |
//! | `/` | [`SpaIndex`] | `favicon.ico` for `/favicon.ico`, `index.html` for anything else |
//!
//! Longest-prefix dispatch sends every asset URL to the file server and every
//! other URL, including deep client-side routes like `/settings/profile`, to
//! `index.html`, where the frontend router takes over.
//!
//! ```rust
//! use std::sync::Arc;
//! use tollgate::fs::MemFs;
//! use tollgate::spa;
//!
//! let bundle = Arc::new(
//!     MemFs::new()
//!         .with_file("app/dist/index.html", "<!doctype html>")
//!         .with_file("app/dist/assets/js/app.js", "boot()"),
//! );
//! let app = spa(bundle, "app/dist", "assets").unwrap();
//! ```

use http::StatusCode;

use crate::fs::{self, FsError, SharedFs};
use crate::handler::{BoxFuture, Handler};
use crate::middleware::Neuter;
use crate::mux::Mux;
use crate::request::Request;
use crate::response::{ContentType, Response, ResponseWriter};
use crate::static_files::FileServer;

const FAVICON_PATH: &str = "/favicon.ico";
const FAVICON: &str = "favicon.ico";
const INDEX: &str = "index.html";

/// Builds the router for the bundle at `root` inside `fsys`, with static
/// assets under the `assets_dir` subdirectory of it.
///
/// Fails when `root` cannot be resolved in `fsys`. Nothing else is checked up
/// front: a missing `index.html` surfaces as a `500` on request.
pub fn spa(fsys: SharedFs, root: &str, assets_dir: &str) -> Result<Mux, FsError> {
    let view = fs::sub(fsys, root)?;

    let mut assets = assets_dir.trim_start_matches('/').to_owned();
    if !assets.ends_with('/') {
        assets.push('/');
    }

    Ok(Mux::new()
        .handle(&format!("/{assets}"), Neuter::new("/", FileServer::new(view.clone())))
        .handle("/", SpaIndex::new(view)))
}

/// Fallback handler of [`spa`]: the favicon for `/favicon.ico`, the index
/// document for every other path.
pub struct SpaIndex {
    fsys: SharedFs,
}

impl SpaIndex {
    pub fn new(fsys: SharedFs) -> Self {
        Self { fsys }
    }

    fn document(&self, path: &str) -> Response {
        let name = if path == FAVICON_PATH { FAVICON } else { INDEX };
        match self.fsys.read(name) {
            Ok(contents) if name == INDEX => Response::builder().bytes(ContentType::Html, contents),
            Ok(contents) => {
                let mime = mime_guess::from_path(name).first_or_octet_stream();
                Response::builder()
                    .bytes(ContentType::Other(mime.essence_str().to_owned()), contents)
            }
            Err(e) => Response::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl Handler for SpaIndex {
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a> {
        Box::pin(async move { self.document(req.path()).write_to(writer) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::fs::MemFs;
    use crate::handler::respond;

    fn bundle() -> MemFs {
        MemFs::new()
            .with_file("app/dist/index.html", "<!doctype html><div id=app>")
            .with_file("app/dist/favicon.ico", [0u8, 0, 1, 0])
            .with_file("app/dist/assets/js/app.js", "boot()")
    }

    #[tokio::test]
    async fn fallback_serves_index_for_any_route() {
        let handler = SpaIndex::new(fs::sub(Arc::new(bundle()), "app/dist").unwrap());

        for path in ["/", "/some/client/route", "/favicon.ico/", "/index.html"] {
            let response = respond(&handler, Request::get(path)).await;
            assert_eq!(response.status_code(), StatusCode::OK, "{path}");
            assert_eq!(response.body(), b"<!doctype html><div id=app>", "{path}");
            assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"), "{path}");
        }
    }

    #[tokio::test]
    async fn fallback_serves_favicon_for_exact_path() {
        let handler = SpaIndex::new(fs::sub(Arc::new(bundle()), "app/dist").unwrap());
        let response = respond(&handler, Request::get("/favicon.ico")).await;

        assert_eq!(response.body(), [0u8, 0, 1, 0]);
        assert_eq!(response.header("content-type"), Some("image/x-icon"));
    }

    #[tokio::test]
    async fn missing_favicon_is_server_error() {
        let fsys = Arc::new(MemFs::new().with_file("dist/index.html", "<html>"));
        let handler = SpaIndex::new(fs::sub(fsys, "dist").unwrap());
        let response = respond(&handler, Request::get("/favicon.ico")).await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), b"open favicon.ico: file does not exist\n");
    }

    #[test]
    fn missing_root_fails_construction() {
        let err = spa(Arc::new(bundle()), "app/build", "assets").err().unwrap();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn encoded_asset_names_reach_the_file() {
        let fsys = Arc::new(bundle().with_file("app/dist/assets/my file.js", "spaced()"));
        let app = spa(fsys, "app/dist", "assets").unwrap();

        let (parts, ()) = http::Request::get("/assets/my%20file.js").body(()).unwrap().into_parts();
        let response = respond(&app, Request::from_parts(parts, None).unwrap()).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.body(), b"spaced()");
    }

    #[tokio::test]
    async fn assets_name_is_normalised() {
        for assets in ["assets", "assets/", "/assets"] {
            let app = spa(Arc::new(bundle()), "app/dist", assets).unwrap();
            let response = respond(&app, Request::get("/assets/js/app.js")).await;
            assert_eq!(response.body(), b"boot()", "{assets}");
        }
    }
}
