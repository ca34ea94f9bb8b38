//! Directory-listing suppression.
//!
//! A file server asked for a directory will happily list its contents. In
//! front of one, [`Neuter`] answers `404` for every path that ends with the
//! mount path (the usual shape of a directory URL, e.g. `/static/img/` under
//! mount `/static/`) except the mount path itself.
//!
//! The check is a literal suffix match, not a filesystem lookup. A file path
//! that happens to end with the mount path text is rejected as well.

use tracing::debug;

use crate::handler::{BoxFuture, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::{Response, ResponseWriter};

/// Handler that 404s directory-shaped paths and forwards everything else.
pub struct Neuter<H> {
    mount: String,
    next: H,
}

impl<H: Handler> Neuter<H> {
    pub fn new(mount: impl Into<String>, next: H) -> Self {
        Self { mount: mount.into(), next }
    }
}

/// Whether [`Neuter`] mounted at `mount` rejects `path`.
pub fn is_blocked(mount: &str, path: &str) -> bool {
    path.ends_with(mount) && path.len() > mount.len()
}

impl<H: Handler> Handler for Neuter<H> {
    fn serve<'a>(&'a self, writer: &'a mut dyn ResponseWriter, req: Request) -> BoxFuture<'a> {
        if is_blocked(&self.mount, req.path()) {
            debug!(path = req.path(), mount = %self.mount, "neutralised");
            return Box::pin(async move { Response::not_found().write_to(writer) });
        }
        self.next.serve(writer, req)
    }
}

/// [`Middleware`] form of [`Neuter`].
#[derive(Clone, Debug)]
pub struct DirGuard {
    mount: String,
}

impl DirGuard {
    pub fn new(mount: impl Into<String>) -> Self {
        Self { mount: mount.into() }
    }
}

impl<H: Handler> Middleware<H> for DirGuard {
    type Output = Neuter<H>;

    fn wrap(&self, next: H) -> Neuter<H> {
        Neuter::new(self.mount.clone(), next)
    }
}
