//! Profile loading and cache management
//!
//! A language `xx` is described by `<config_dir>/xx.conf`. The profile names
//! its rule files and the location of its compiled cache, both relative to
//! the profile's own directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use syllabix_core::{
    CompiledDictionary, ConfigLoader, LanguageProfile, ProfileConfig, ProfileKey, RuleCompiler,
    TextCodec,
};

use crate::cache::{is_stale, CacheOutcome, CacheRecord, RecompilePolicy, FORMAT_VERSION};
use crate::error::{EngineError, Result};
use crate::storage::Storage;

/// A profile with its dictionary, ready for hyphenation
#[derive(Debug, Clone)]
pub struct LoadedProfile {
    /// Language profile
    pub profile: LanguageProfile,
    /// Compiled patterns
    pub dictionary: CompiledDictionary,
    /// Where the dictionary came from
    pub outcome: CacheOutcome,
}

/// Resolved locations of one language's files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePaths {
    /// The profile itself
    pub profile: PathBuf,
    /// Compiled cache
    pub compiled: PathBuf,
    /// Rule files in load order
    pub rules: Vec<PathBuf>,
}

/// Loads language profiles through a [`Storage`] and a [`TextCodec`]
#[derive(Debug, Clone, Copy)]
pub struct Loader<'a> {
    storage: &'a dyn Storage,
    codec: &'a dyn TextCodec,
}

impl<'a> Loader<'a> {
    /// Create a loader
    pub fn new(storage: &'a dyn Storage, codec: &'a dyn TextCodec) -> Self {
        Self { storage, codec }
    }

    /// Path of the profile for `language`
    pub fn profile_path(&self, config_dir: &Path, language: &str) -> PathBuf {
        self.storage
            .normalize_path(&config_dir.join(format!("{language}.conf")))
    }

    /// Read and parse the profile for `language`, resolving the files it
    /// names.
    pub fn read_profile(
        &self,
        config_dir: &Path,
        language: &str,
    ) -> Result<(ProfileConfig, ProfilePaths)> {
        let profile = self.profile_path(config_dir, language);
        let bytes = self.storage.read(&profile).map_err(|e| {
            log::debug!("cannot read profile {}: {e}", profile.display());
            EngineError::ProfileNotFound {
                path: profile.clone(),
            }
        })?;

        let config = ConfigLoader::parse_bytes(&bytes, self.codec)?;
        config.validate()?;

        let base = profile.parent().unwrap_or_else(|| Path::new(""));
        let resolve = |relative: &str| self.storage.normalize_path(&base.join(relative));
        let compiled = resolve(config.first_text(ProfileKey::Compiled)?);
        let rules = config
            .texts(ProfileKey::Rules)?
            .into_iter()
            .map(resolve)
            .collect();

        Ok((
            config,
            ProfilePaths {
                profile,
                compiled,
                rules,
            },
        ))
    }

    /// Load `language`, using or rebuilding its cache according to
    /// `policy`.
    pub fn load(
        &self,
        config_dir: &Path,
        language: &str,
        policy: RecompilePolicy,
    ) -> Result<LoadedProfile> {
        let (config, paths) = self.read_profile(config_dir, language)?;

        let cached = match policy {
            RecompilePolicy::Always => None,
            RecompilePolicy::Never => {
                let bytes = self.storage.read(&paths.compiled).map_err(|e| {
                    log::debug!("cannot read cache {}: {e}", paths.compiled.display());
                    EngineError::CacheUnavailable {
                        path: paths.compiled.clone(),
                    }
                })?;
                self.decode_cache(&paths.compiled, &bytes)
            }
            RecompilePolicy::Auto => self.read_fresh_cache(&paths)?,
        };

        if let Some((profile, dictionary)) = cached {
            log::info!(
                "loaded {} patterns from {}",
                dictionary.pattern_count(),
                paths.compiled.display()
            );
            return Ok(LoadedProfile {
                profile,
                dictionary,
                outcome: CacheOutcome::Loaded,
            });
        }

        let (profile, dictionary) = self.compile(&config, &paths)?;
        let outcome = match self.persist(&paths.compiled, &profile, &dictionary) {
            Ok(()) => {
                log::info!("wrote compiled dictionary to {}", paths.compiled.display());
                CacheOutcome::Recompiled
            }
            Err(e) => {
                log::warn!(
                    "could not write compiled dictionary to {}: {e}",
                    paths.compiled.display()
                );
                CacheOutcome::RecompiledUnsaved
            }
        };
        Ok(LoadedProfile {
            profile,
            dictionary,
            outcome,
        })
    }

    /// Compile the rule files named by a profile.
    pub fn compile(
        &self,
        config: &ProfileConfig,
        paths: &ProfilePaths,
    ) -> Result<(LanguageProfile, CompiledDictionary)> {
        let mut files = Vec::with_capacity(paths.rules.len());
        for path in &paths.rules {
            let bytes = self.storage.read(path).map_err(|e| {
                log::debug!("cannot read rule file {}: {e}", path.display());
                EngineError::RuleFileNotFound { path: path.clone() }
            })?;
            files.push(bytes);
        }

        Ok(RuleCompiler::compile(
            config,
            files.iter().map(Vec::as_slice),
            self.codec,
            FORMAT_VERSION,
        )?)
    }

    /// The cache, if it exists, is newer than every source and decodes.
    fn read_fresh_cache(
        &self,
        paths: &ProfilePaths,
    ) -> Result<Option<(LanguageProfile, CompiledDictionary)>> {
        let Some(cache_time) = self.storage.stat(&paths.compiled)? else {
            log::debug!("no cache at {}", paths.compiled.display());
            return Ok(None);
        };

        let mut sources: Vec<Option<SystemTime>> = vec![self.storage.stat(&paths.profile)?];
        for rule in &paths.rules {
            sources.push(self.storage.stat(rule)?);
        }
        if is_stale(cache_time, sources) {
            log::debug!("cache {} is older than its sources", paths.compiled.display());
            return Ok(None);
        }

        match self.storage.read(&paths.compiled) {
            Ok(bytes) => Ok(self.decode_cache(&paths.compiled, &bytes)),
            Err(e) => {
                log::debug!("cannot read cache {}: {e}", paths.compiled.display());
                Ok(None)
            }
        }
    }

    /// Decode a cache written by this version; anything else means
    /// recompiling.
    fn decode_cache(
        &self,
        path: &Path,
        bytes: &[u8],
    ) -> Option<(LanguageProfile, CompiledDictionary)> {
        let record = match CacheRecord::from_bytes(bytes) {
            Ok(record) => record,
            Err(e) => {
                log::debug!("cannot decode cache {}: {e}", path.display());
                return None;
            }
        };
        if !record.is_current() {
            log::debug!(
                "cache {} has version {}, expected {FORMAT_VERSION}",
                path.display(),
                record.format_version
            );
            return None;
        }
        match record.into_parts() {
            Ok(parts) => Some(parts),
            Err(e) => {
                log::debug!("invalid cache {}: {e}", path.display());
                None
            }
        }
    }

    fn persist(
        &self,
        path: &Path,
        profile: &LanguageProfile,
        dictionary: &CompiledDictionary,
    ) -> Result<()> {
        let bytes = CacheRecord::new(profile, dictionary).to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.storage.create_dir_all(parent)?;
        }
        self.storage.write(path, &bytes)
    }
}
