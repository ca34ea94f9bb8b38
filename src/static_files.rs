//! Static file serving.
//!
//! [`FileServer`] maps a URL path onto a [`FileSystem`](crate::fs::FileSystem) view. The helpers
//! [`file_server`] and [`file_server_subdir`] put it behind a URL prefix and a
//! [`Neuter`] so directory listings never leak:
//!
//! ```text
//! Neuter(prefix) ──> StripPrefix(prefix) ──> FileServer(view)
//! ```
//!
//! ```rust
//! use std::sync::Arc;
//! use tollgate::fs::MemFs;
//! use tollgate::static_files::file_server_subdir;
//!
//! let bundle = Arc::new(MemFs::new().with_file("public/site.css", "body{}"));
//! let static_files = file_server_subdir(bundle, "public", "/static/");
//! ```

use http::StatusCode;

use crate::fs::{self, FsError, SharedFs};
use crate::handler::{BoxFuture, Handler};
use crate::middleware::Neuter;
use crate::request::Request;
use crate::response::{ContentType, Response, ResponseWriter};

/// The composed handler returned by [`file_server`] and [`file_server_subdir`].
pub type StaticFiles = Neuter<StripPrefix<FileServer>>;

/// Serves `fsys` under `url_prefix` (`"/"` when empty), with directory
/// listings suppressed everywhere but the prefix root.
pub fn file_server(fsys: SharedFs, url_prefix: &str) -> StaticFiles {
    let prefix = if url_prefix.is_empty() { "/" } else { url_prefix };
    Neuter::new(prefix, StripPrefix::new(prefix, FileServer::new(fsys)))
}

/// Like [`file_server`], serving the `subdir` view of `fsys`. An empty
/// `subdir` serves `fsys` itself.
///
/// # Panics
///
/// Panics if `subdir` cannot be resolved. A missing bundle directory is a
/// deployment mistake and should stop the process at startup. Use
/// [`try_file_server_subdir`] to handle it instead.
pub fn file_server_subdir(fsys: SharedFs, subdir: &str, url_prefix: &str) -> StaticFiles {
    try_file_server_subdir(fsys, subdir, url_prefix)
        .unwrap_or_else(|e| panic!("static files: cannot resolve `{subdir}`: {e}"))
}

/// Fallible form of [`file_server_subdir`].
pub fn try_file_server_subdir(
    fsys: SharedFs,
    subdir: &str,
    url_prefix: &str,
) -> Result<StaticFiles, FsError> {
    if subdir.is_empty() {
        return Ok(file_server(fsys, url_prefix));
    }
    Ok(file_server(fs::sub(fsys, subdir)?, url_prefix))
}

// ── StripPrefix ───────────────────────────────────────────────────────────────

/// Removes a fixed prefix from the request path before calling `next`.
/// Requests outside the prefix get `404`.
pub struct StripPrefix<H> {
    prefix: String,
    next: H,
}

impl<H: Handler> StripPrefix<H> {
    pub fn new(prefix: impl Into<String>, next: H) -> Self {
        Self { prefix: prefix.into(), next }
    }
}

impl<H: Handler> Handler for StripPrefix<H> {
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a> {
        match req.path().strip_prefix(self.prefix.as_str()) {
            Some(rest) => {
                let rest = rest.to_owned();
                self.next.serve(writer, req.with_path(rest))
            }
            None => Box::pin(async move { Response::not_found().write_to(writer) }),
        }
    }
}

// ── FileServer ────────────────────────────────────────────────────────────────

/// Serves files from a [`FileSystem`](crate::fs::FileSystem) view by URL path.
///
/// - a file is returned with a content type guessed from its extension
/// - a directory is answered with its `index.html`, or with an HTML listing
///   when there is none
/// - a missing path is `404`, any other read failure `500`
pub struct FileServer {
    fsys: SharedFs,
}

impl FileServer {
    pub fn new(fsys: SharedFs) -> Self {
        Self { fsys }
    }

    fn lookup(&self, url_path: &str) -> Response {
        let name = fs_name(url_path);
        match self.fsys.is_dir(&name) {
            Ok(true) => self.directory(&name),
            Ok(false) => self.file(&name),
            Err(e) => failure(&e),
        }
    }

    fn file(&self, name: &str) -> Response {
        match self.fsys.read(name) {
            Ok(contents) => Response::builder().bytes(content_type(name), contents),
            Err(e) => failure(&e),
        }
    }

    fn directory(&self, name: &str) -> Response {
        let index = if name == "." { "index.html".to_owned() } else { format!("{name}/index.html") };
        match self.fsys.read(&index) {
            Ok(contents) => Response::builder().bytes(ContentType::Html, contents),
            Err(e) if e.is_not_found() => self.listing(name),
            Err(e) => failure(&e),
        }
    }

    fn listing(&self, name: &str) -> Response {
        let entries = match self.fsys.read_dir(name) {
            Ok(entries) => entries,
            Err(e) => return failure(&e),
        };

        let mut html = String::from("<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n");
        for entry in entries {
            let shown = if entry.is_dir { format!("{}/", entry.name) } else { entry.name };
            let shown = escape_html(&shown);
            html.push_str(&format!("<a href=\"{shown}\">{shown}</a>\n"));
        }
        html.push_str("</pre>\n");
        Response::builder().bytes(ContentType::Html, html)
    }
}

impl Handler for FileServer {
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a> {
        Box::pin(async move { self.lookup(req.path()).write_to(writer) })
    }
}

/// Turns a URL path into a filesystem name: `/a/./b/../c` → `a/c`,
/// `/` → `.`. `..` never climbs above the root.
pub(crate) fn fs_name(url_path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in url_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    if parts.is_empty() { ".".to_owned() } else { parts.join("/") }
}

fn content_type(name: &str) -> ContentType {
    let mime = mime_guess::from_path(name).first_or_octet_stream();
    ContentType::Other(mime.essence_str().to_owned())
}

fn failure(err: &FsError) -> Response {
    match err {
        FsError::NotFound { .. } | FsError::InvalidPath { .. } | FsError::NotDir { .. } => {
            Response::not_found()
        }
        _ => Response::error(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error"),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c    => out.push(c),
        }
    }
    out
}
