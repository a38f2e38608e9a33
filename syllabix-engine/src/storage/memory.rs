//! In-memory storage for tests and embedded rule sets

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use crate::error::{EngineError, Result};
use crate::storage::{normalize_lexically, Storage};

#[derive(Debug, Clone)]
struct MemoryFile {
    data: Box<[u8]>,
    modified: SystemTime,
}

/// Storage kept entirely in memory.
///
/// Clones share the same files. Directories are implicit, and writes can be
/// made to fail to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<PathBuf, MemoryFile>>>,
    read_only: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, stamped with the current time.
    pub fn insert<P: AsRef<Path>>(&self, path: P, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.write(path.as_ref(), &bytes.into())
    }

    /// Override a file's modification time.
    pub fn set_modified<P: AsRef<Path>>(&self, path: P, modified: SystemTime) -> Result<()> {
        let key = normalize_lexically(path.as_ref());
        let mut files = self.files()?;
        let file = files
            .get_mut(&key)
            .ok_or_else(|| EngineError::storage(format!("no such file: {}", key.display())))?;
        file.modified = modified;
        Ok(())
    }

    /// Make every following write fail (or succeed again).
    pub fn set_read_only(&self, read_only: bool) -> Result<()> {
        *self
            .read_only
            .lock()
            .map_err(|_| EngineError::storage("memory storage lock poisoned"))? = read_only;
        Ok(())
    }

    /// Whether a file exists
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        let key = normalize_lexically(path.as_ref());
        self.files().map(|files| files.contains_key(&key)).unwrap_or(false)
    }

    /// Number of stored files
    pub fn file_count(&self) -> usize {
        self.files().map(|files| files.len()).unwrap_or(0)
    }

    fn files(&self) -> Result<MutexGuard<'_, HashMap<PathBuf, MemoryFile>>> {
        self.files
            .lock()
            .map_err(|_| EngineError::storage("memory storage lock poisoned"))
    }

    fn is_read_only(&self) -> Result<bool> {
        self.read_only
            .lock()
            .map(|flag| *flag)
            .map_err(|_| EngineError::storage("memory storage lock poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn stat(&self, path: &Path) -> Result<Option<SystemTime>> {
        let key = normalize_lexically(path);
        Ok(self.files()?.get(&key).map(|file| file.modified))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let key = normalize_lexically(path);
        self.files()?
            .get(&key)
            .map(|file| file.data.to_vec())
            .ok_or_else(|| EngineError::storage(format!("no such file: {}", key.display())))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if self.is_read_only()? {
            return Err(EngineError::storage(format!(
                "read-only storage, cannot write {}",
                path.display()
            )));
        }
        let file = MemoryFile {
            data: bytes.into(),
            modified: SystemTime::now(),
        };
        self.files()?.insert(normalize_lexically(path), file);
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
