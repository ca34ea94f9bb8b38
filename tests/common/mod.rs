//! Shared helpers for the integration tests.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tollgate::fs::{DirEntry, DirFs, FileSystem, FsError, SharedFs};
use tollgate::middleware::RequestLog;

/// The on-disk bundle under `tests/fixtures`.
pub fn fixtures() -> SharedFs {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    Arc::new(DirFs::new(root))
}

/// A request logger that keeps every line in memory.
#[allow(dead_code)]
pub fn captured_log() -> (RequestLog, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let log = RequestLog::new(move |line: &str| sink.lock().unwrap().push(line.to_owned()));
    (log, lines)
}

/// Wraps a filesystem and remembers every path passed to `read`.
#[allow(dead_code)]
pub struct RecordingFs {
    inner: SharedFs,
    pub reads: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingFs {
    pub fn new(inner: SharedFs) -> Arc<Self> {
        Arc::new(Self { inner, reads: Mutex::new(Vec::new()) })
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl FileSystem for RecordingFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.reads.lock().unwrap().push(path.to_owned());
        self.inner.read(path)
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        self.inner.read_dir(path)
    }

    fn is_dir(&self, path: &str) -> Result<bool, FsError> {
        self.inner.is_dir(path)
    }
}
