//! Storage backends for profiles, rule files and compiled dictionaries

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::error::Result;

pub mod file;
pub mod memory;

pub use file::FsStorage;
pub use memory::MemoryStorage;

/// Byte-level file access used by the engine.
///
/// Backends decide where a path lives; the engine only ever hands them paths
/// built from the configuration directory.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Last modification time, or `None` when the file does not exist.
    fn stat(&self, path: &Path) -> Result<Option<SystemTime>>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace a file's contents.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Canonical spelling of a path for this backend.
    fn normalize_path(&self, path: &Path) -> PathBuf {
        normalize_lexically(path)
    }
}

/// Drop `.` components and fold `..` into the preceding component without
/// touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
