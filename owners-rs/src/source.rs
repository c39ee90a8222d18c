//! The host capability for locating and reading policy files.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Access to policy file contents. The index only ever asks whether a file
/// exists and for its lines; implementations decide where those come from.
pub trait FileSource {
    fn exists(&self, path: &Path) -> bool;
    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// A [`FileSource`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSource;

impl FileSource for OsFileSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
        BufReader::new(File::open(path)?).lines().collect()
    }
}

/// A [`FileSource`] backed by an in-memory map, letting tests and embedded
/// hosts supply policy files without touching disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSource {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the file at `path` with the given contents, replacing any
    /// previous registration.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSource for MemoryFileSource {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_lines(&self, path: &Path) -> io::Result<Vec<String>> {
        match self.files.get(path) {
            Some(contents) => Ok(contents.lines().map(str::to_string).collect()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                path.display().to_string(),
            )),
        }
    }
}
