//! Engine error types

use std::path::PathBuf;

use syllabix_core::CoreError;
use thiserror::Error;

/// Errors raised while building or running a [`Hyphenator`](crate::Hyphenator)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Profile, compiler or codec error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The language profile could not be read
    #[error("language profile not found: {}", path.display())]
    ProfileNotFound {
        /// Path that was tried
        path: PathBuf,
    },

    /// A rule file named by the profile could not be read
    #[error("rule file not found: {}", path.display())]
    RuleFileNotFound {
        /// Path that was tried
        path: PathBuf,
    },

    /// Recompilation is disabled and no compiled dictionary could be read
    #[error("compiled dictionary unavailable at {} and recompilation is disabled", path.display())]
    CacheUnavailable {
        /// Expected cache location
        path: PathBuf,
    },

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
