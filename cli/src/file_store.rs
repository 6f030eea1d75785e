//! Session persistence in a small JSON file.
//!
//! The file holds one flat object of string keys to string values, the same
//! shape the browser keeps in `localStorage`. Every call re-reads the file so
//! separate `clinic` invocations see each other's logins and logouts.

#[cfg(test)]
#[path = "file_store_test.rs"]
mod file_store_test;

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use session::{KeyValueStore, StoreError};

pub const DEFAULT_FILE_NAME: &str = ".clinic-session.json";

/// `$HOME/.clinic-session.json`, or the working directory without `HOME`.
pub fn default_session_file() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from(DEFAULT_FILE_NAME), |home| {
        PathBuf::from(home).join(DEFAULT_FILE_NAME)
    })
}

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files read as empty. A file that is not a JSON
    /// string map is also treated as empty and gets overwritten on next write.
    fn read_all(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session file is not a string map");
            BTreeMap::new()
        })
    }

    fn write_all(&self, key: &str, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let write_err = |message: String| StoreError::Write { key: key.to_owned(), message };
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(write_err(e.to_string())),
            };
        }
        let rendered = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Encode(e.to_string()))?;
        let staging = self.path.with_extension("json.tmp");
        write_private(&staging, rendered.as_bytes()).map_err(|e| write_err(e.to_string()))?;
        fs::rename(&staging, &self.path).map_err(|e| write_err(e.to_string()))
    }
}

/// Write `path` as a fresh file, readable by the owner only on unix.
///
/// A leftover file is removed first, since `mode` only applies on creation.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all();
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(key, &entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(key, &entries)
    }
}
