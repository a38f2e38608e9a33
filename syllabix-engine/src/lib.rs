//! Language loading, dictionary caching and the public hyphenation API
//!
//! [`Hyphenator`] reads a language profile through a [`Storage`] backend,
//! compiles its rule files (or loads the cached result) and hyphenates text
//! with the patterns from `syllabix-core`.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod hyphenator;
pub mod loader;
pub mod storage;

pub use cache::{CacheOutcome, CacheRecord, RecompilePolicy, FORMAT_VERSION};
pub use error::{EngineError, Result};
pub use hyphenator::{Hyphenator, HyphenatorBuilder, DEFAULT_CONFIG_DIR};
pub use loader::{LoadedProfile, Loader, ProfilePaths};
pub use storage::{FsStorage, MemoryStorage, Storage};

// Re-export from core for convenience
pub use syllabix_core::{
    CompiledDictionary, EncodingRsCodec, HyphenationLimits, LanguageProfile, TextCodec,
    DEFAULT_MARKER,
};
