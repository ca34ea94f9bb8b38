//! Unified error type.

use thiserror::Error;

use crate::fs::FsError;

/// The error type returned by tollgate's fallible operations.
///
/// Request-level failures (404, 500, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// the failures that happen outside a request: binding to a port, accepting a
/// connection, or resolving the filesystem view a handler is built on.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("fs: {0}")]
    Fs(#[from] FsError),
}
