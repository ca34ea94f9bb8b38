//! Read-only filesystem views.
//!
//! Handlers never touch `std::fs` directly. They read through a
//! [`FileSystem`], which can be a directory on disk ([`DirFs`]), a bundle held
//! in memory ([`MemFs`]), or a restricted view of either rooted at one of its
//! subdirectories ([`sub`]).
//!
//! Paths are slash-separated and unrooted: `"index.html"`,
//! `"assets/js/app.js"`. `"."` names the root. Leading slashes, empty
//! segments, `.` segments inside a path and `..` are rejected.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failure to resolve or read a path in a [`FileSystem`].
///
/// The display form is `"<op> <path>: <reason>"`, e.g.
/// `open index.html: file does not exist`.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("{op} {path}: invalid argument")]
    InvalidPath { op: &'static str, path: String },

    #[error("{op} {path}: file does not exist")]
    NotFound { op: &'static str, path: String },

    #[error("{op} {path}: not a directory")]
    NotDir { op: &'static str, path: String },

    #[error("{op} {path}: is a directory")]
    IsDir { op: &'static str, path: String },

    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn path(&self) -> &str {
        match self {
            Self::InvalidPath { path, .. }
            | Self::NotFound { path, .. }
            | Self::NotDir { path, .. }
            | Self::IsDir { path, .. }
            | Self::Io { path, .. } => path,
        }
    }

    fn with_path(self, new: &str) -> Self {
        let new = new.to_owned();
        match self {
            Self::InvalidPath { op, .. } => Self::InvalidPath { op, path: new },
            Self::NotFound { op, .. }    => Self::NotFound { op, path: new },
            Self::NotDir { op, .. }      => Self::NotDir { op, path: new },
            Self::IsDir { op, .. }       => Self::IsDir { op, path: new },
            Self::Io { op, source, .. }  => Self::Io { op, path: new, source },
        }
    }

    fn from_io(op: &'static str, path: &str, err: io::Error) -> Self {
        let path = path.to_owned();
        match err.kind() {
            io::ErrorKind::NotFound         => Self::NotFound { op, path },
            io::ErrorKind::NotADirectory    => Self::NotDir { op, path },
            io::ErrorKind::IsADirectory     => Self::IsDir { op, path },
            _                               => Self::Io { op, path, source: err },
        }
    }
}

/// One entry of a directory listing.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// A read-only, hierarchical file namespace.
pub trait FileSystem: Send + Sync + 'static {
    /// Reads the whole file at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError>;

    /// Lists the directory at `path`, sorted by name.
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;

    /// Whether `path` exists and is a directory. Errors with `NotFound` when it
    /// does not exist at all.
    fn is_dir(&self, path: &str) -> Result<bool, FsError>;
}

/// Shared handle to a filesystem view.
pub type SharedFs = Arc<dyn FileSystem>;

/// Whether `path` is acceptable to [`FileSystem`] methods.
pub fn valid_path(path: &str) -> bool {
    if path == "." {
        return true;
    }
    !path.is_empty() && path.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

fn check(op: &'static str, path: &str) -> Result<(), FsError> {
    if valid_path(path) {
        Ok(())
    } else {
        Err(FsError::InvalidPath { op, path: path.to_owned() })
    }
}

// ── sub ───────────────────────────────────────────────────────────────────────

/// Returns a view of `fsys` rooted at `dir`.
///
/// Fails when `dir` is not a valid path, does not exist, or is not a
/// directory. Resolution happens here, once, so a misconfigured deployment
/// fails at startup rather than on the first request.
pub fn sub(fsys: SharedFs, dir: &str) -> Result<SharedFs, FsError> {
    check("sub", dir)?;
    if dir == "." {
        return Ok(fsys);
    }
    match fsys.is_dir(dir) {
        Ok(true) => Ok(Arc::new(SubFs { parent: fsys, dir: dir.to_owned() })),
        Ok(false) => Err(FsError::NotDir { op: "sub", path: dir.to_owned() }),
        Err(e) => Err(e.with_path(dir)),
    }
}

struct SubFs {
    parent: SharedFs,
    dir: String,
}

impl SubFs {
    fn full(&self, op: &'static str, path: &str) -> Result<String, FsError> {
        check(op, path)?;
        Ok(if path == "." { self.dir.clone() } else { format!("{}/{path}", self.dir) })
    }
}

impl FileSystem for SubFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let full = self.full("open", path)?;
        self.parent.read(&full).map_err(|e| e.with_path(path))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let full = self.full("readdir", path)?;
        self.parent.read_dir(&full).map_err(|e| e.with_path(path))
    }

    fn is_dir(&self, path: &str) -> Result<bool, FsError> {
        let full = self.full("stat", path)?;
        self.parent.is_dir(&full).map_err(|e| e.with_path(path))
    }
}

// ── DirFs ─────────────────────────────────────────────────────────────────────

/// A directory on the local disk.
///
/// Reads are synchronous. Static bundles are small and served from the page
/// cache, so the blocking time is negligible next to the network round trip.
#[derive(Clone, Debug)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, op: &'static str, path: &str) -> Result<PathBuf, FsError> {
        check(op, path)?;
        if path == "." {
            return Ok(self.root.clone());
        }
        Ok(path.split('/').fold(self.root.clone(), |acc, seg| acc.join(seg)))
    }
}

impl FileSystem for DirFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let full = self.resolve("open", path)?;
        if full.is_dir() {
            return Err(FsError::IsDir { op: "read", path: path.to_owned() });
        }
        std::fs::read(&full).map_err(|e| FsError::from_io("open", path, e))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let full = self.resolve("readdir", path)?;
        let entries = std::fs::read_dir(&full).map_err(|e| FsError::from_io("readdir", path, e))?;

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io("readdir", path, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| FsError::from_io("readdir", path, e))?
                .is_dir();
            out.push(DirEntry { name: entry.file_name().to_string_lossy().into_owned(), is_dir });
        }
        out.sort();
        Ok(out)
    }

    fn is_dir(&self, path: &str) -> Result<bool, FsError> {
        let full = self.resolve("stat", path)?;
        std::fs::metadata(&full)
            .map(|meta| meta.is_dir())
            .map_err(|e| FsError::from_io("stat", path, e))
    }
}

// ── MemFs ─────────────────────────────────────────────────────────────────────

/// An in-memory file tree, e.g. a frontend bundle compiled into the binary
/// with `include_bytes!`.
///
/// Only files are stored. Directories exist implicitly as the prefixes of
/// file paths.
///
/// ```rust
/// use tollgate::fs::{FileSystem, MemFs};
///
/// let fsys = MemFs::new()
///     .with_file("dist/index.html", "<!doctype html>")
///     .with_file("dist/assets/app.js", "console.log(1)");
///
/// assert!(fsys.is_dir("dist/assets").unwrap());
/// assert_eq!(fsys.read("dist/index.html").unwrap(), b"<!doctype html>");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemFs {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file. Invalid paths are ignored.
    pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        if path != "." && valid_path(path) {
            self.files.insert(path.to_owned(), contents.into());
        }
        self
    }

    fn dir_prefix(path: &str) -> String {
        if path == "." { String::new() } else { format!("{path}/") }
    }
}

impl FileSystem for MemFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        check("open", path)?;
        if let Some(contents) = self.files.get(path) {
            return Ok(contents.clone());
        }
        if self.is_dir(path).unwrap_or(false) {
            return Err(FsError::IsDir { op: "read", path: path.to_owned() });
        }
        Err(FsError::NotFound { op: "open", path: path.to_owned() })
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        check("readdir", path)?;
        if !self.is_dir(path)? {
            return Err(FsError::NotDir { op: "readdir", path: path.to_owned() });
        }

        let prefix = Self::dir_prefix(path);
        let mut entries = BTreeSet::new();
        for name in self.files.keys() {
            let Some(rest) = name.strip_prefix(&prefix) else { continue };
            match rest.split_once('/') {
                Some((dir, _)) => entries.insert(DirEntry { name: dir.to_owned(), is_dir: true }),
                None => entries.insert(DirEntry { name: rest.to_owned(), is_dir: false }),
            };
        }
        Ok(entries.into_iter().collect())
    }

    fn is_dir(&self, path: &str) -> Result<bool, FsError> {
        check("stat", path)?;
        if path == "." {
            return Ok(true);
        }
        if self.files.contains_key(path) {
            return Ok(false);
        }
        let prefix = Self::dir_prefix(path);
        if self.files.keys().any(|name| name.starts_with(&prefix)) {
            Ok(true)
        } else {
            Err(FsError::NotFound { op: "stat", path: path.to_owned() })
        }
    }
}
