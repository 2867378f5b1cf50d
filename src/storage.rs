//! Storage layer for tasktrack
//!
//! The whole record set lives in a single JSON file (by default `tasks.json`
//! in the current directory). Every call goes back to the file: nothing is
//! cached and no handle is held between calls.
//!
//! Writes never touch the target in place. The new content is written to a
//! temporary file in the target's directory, flushed, and then renamed over
//! the target, so the file on disk is always either the old record set or
//! the new one.
//!
//! There is no locking: two processes saving at once race and the last
//! rename wins.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default name of the backing file
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Indentation used for the on-disk JSON
const JSON_INDENT: &[u8] = b"    ";

/// Handle on the backing file
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage backed by `tasks.json` in the given directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_TASKS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the raw record list, failing on unparsable content.
    ///
    /// A missing file is the normal first-run state and yields an empty list.
    pub fn read(&self) -> Result<Vec<Value>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "task file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(Error::Io(err)),
        };

        let value: Value = serde_json::from_slice(&bytes).map_err(|err| self.corrupt(err))?;
        match value {
            Value::Array(records) => {
                debug!(path = %self.path.display(), count = records.len(), "loaded records");
                Ok(records)
            }
            other => Err(self.corrupt(format!(
                "expected a JSON array, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Read the raw record list, treating unparsable content as empty.
    ///
    /// Only [`Error::CorruptStorage`] is swallowed; other read failures
    /// (permissions, the path being a directory) are returned so that no
    /// later save overwrites a file that was never read.
    pub fn load(&self) -> Result<Vec<Value>> {
        match self.read() {
            Err(Error::CorruptStorage { path, reason }) => {
                warn!(
                    path = %path.display(),
                    %reason,
                    "task file is unreadable, treating it as empty"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Replace the stored record set with `records`.
    pub fn save<T: Serialize>(&self, records: &[T]) -> Result<()> {
        let data = to_json_pretty(records)?;
        write_atomic(&self.path, &data)?;
        debug!(path = %self.path.display(), count = records.len(), "saved records");
        Ok(())
    }

    /// Create an empty record set if the backing file does not exist yet.
    ///
    /// Returns `true` when a file was created. Existing files are left alone,
    /// even if they are unreadable.
    pub fn ensure_initialized(&self) -> Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.save::<Value>(&[])?;
        Ok(true)
    }

    fn corrupt(&self, reason: impl ToString) -> Error {
        Error::CorruptStorage {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Serialize a record list as pretty JSON with a four-space indent.
pub fn to_json_pretty<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Atomically write data to a file
///
/// This writes to a temporary file in the same directory, then renames
/// it to the target path. The file is either fully written or not
/// modified at all.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    write_atomic_with(path, data, |_| Ok(()))
}

/// Atomic write with a hook that runs between the temp write and the rename.
///
/// The hook receives the temp file path. If it fails, the temp file is
/// removed and the target is untouched, exactly as if the process had died
/// before the rename.
pub fn write_atomic_with<F>(path: impl AsRef<Path>, data: &[u8], before_commit: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let path = path.as_ref();
    let persist_err = |source: io::Error| Error::Persist {
        path: path.to_path_buf(),
        source,
    };

    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(persist_err)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_TASKS_FILE);

    // Same directory as the target so the rename never crosses filesystems.
    // The temp file is deleted on drop unless it is persisted.
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(persist_err)?;

    temp.write_all(data).map_err(persist_err)?;
    temp.as_file().sync_all().map_err(persist_err)?;

    before_commit(temp.path()).map_err(persist_err)?;

    temp.persist(path).map_err(|err| persist_err(err.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
