//! Compiled dictionary cache
//!
//! A compiled profile is stored as a JSON object:
//!
//! ```json
//! {
//!   "alphabet": "abc…",
//!   "alphabetUC": "ABC…",
//!   "translation": {"ý": "y"},
//!   "minLeftLimit": 2,
//!   "minRightLimit": 3,
//!   "internalEncoding": "utf-8",
//!   "dictionary": {"h": null, "hyph": "00300"},
//!   "formatVersion": "0.1.0"
//! }
//! ```
//!
//! A record written by another crate version is never loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use syllabix_core::{CompiledDictionary, CoreError, LanguageProfile, PatternEntry};

use crate::error::{EngineError, Result};

/// Version tag written into every cache record
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// When to rebuild the compiled dictionary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecompilePolicy {
    /// Rebuild when the cache is missing, older than its sources, or
    /// unreadable
    #[default]
    Auto,
    /// Use the cache as long as it can be read
    Never,
    /// Rebuild every time
    Always,
}

impl RecompilePolicy {
    /// Policy name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            RecompilePolicy::Auto => "auto",
            RecompilePolicy::Never => "never",
            RecompilePolicy::Always => "always",
        }
    }
}

impl fmt::Display for RecompilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecompilePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(RecompilePolicy::Auto),
            "never" => Ok(RecompilePolicy::Never),
            "always" => Ok(RecompilePolicy::Always),
            other => Err(CoreError::config(format!("unknown recompile policy '{other}'")).into()),
        }
    }
}

/// How a hyphenator obtained its dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
    /// Read from the cache
    Loaded,
    /// Compiled from the rule files and cached
    Recompiled,
    /// Compiled, but the cache could not be written
    RecompiledUnsaved,
}

/// Whether a cache written at `cache` is older than any of its sources.
/// A source without a timestamp counts as newer.
pub fn is_stale<I>(cache: SystemTime, sources: I) -> bool
where
    I: IntoIterator<Item = Option<SystemTime>>,
{
    sources
        .into_iter()
        .any(|modified| modified.map_or(true, |modified| modified > cache))
}

/// Serialized snapshot of a profile and its compiled dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// Lowercase alphabet with translation pairs resolved
    pub alphabet: String,
    /// Uppercase alphabet
    #[serde(rename = "alphabetUC")]
    pub alphabet_uc: String,
    /// Lookup translation, one character to one character
    pub translation: BTreeMap<String, String>,
    /// Smallest left margin the profile allows
    pub min_left_limit: usize,
    /// Smallest right margin the profile allows
    pub min_right_limit: usize,
    /// Encoding declared by the profile
    pub internal_encoding: String,
    /// Pattern key to digit mask, `null` for prefix-only keys
    pub dictionary: BTreeMap<String, Option<String>>,
    /// Crate version that wrote the record
    pub format_version: String,
}

impl CacheRecord {
    /// Snapshot a profile and dictionary
    pub fn new(profile: &LanguageProfile, dictionary: &CompiledDictionary) -> Self {
        Self {
            alphabet: profile.alphabet().to_owned(),
            alphabet_uc: profile.alphabet_uc().to_owned(),
            translation: profile
                .translation()
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            min_left_limit: profile.min_left_limit(),
            min_right_limit: profile.min_right_limit(),
            internal_encoding: profile.internal_encoding().to_owned(),
            dictionary: dictionary
                .iter()
                .map(|(key, entry)| (key.to_owned(), entry.to_digits()))
                .collect(),
            format_version: profile.format_version().to_owned(),
        }
    }

    /// Parse a stored record
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize for storage
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Whether this record was written by the running version
    pub fn is_current(&self) -> bool {
        self.format_version == FORMAT_VERSION
    }

    /// Rebuild the profile and dictionary
    pub fn into_parts(self) -> Result<(LanguageProfile, CompiledDictionary)> {
        let mut translation = BTreeMap::new();
        for (from, to) in &self.translation {
            translation.insert(single_char(from)?, single_char(to)?);
        }

        let mut entries = Vec::with_capacity(self.dictionary.len());
        for (key, digits) in self.dictionary {
            let entry = match digits {
                None => PatternEntry::NoBreakInfo,
                Some(digits) => PatternEntry::from_digits(&digits).ok_or_else(|| {
                    CoreError::invalid_profile(format!("bad mask {digits:?} for key {key:?}"))
                })?,
            };
            entries.push((key, entry));
        }

        let profile = LanguageProfile::new(
            self.alphabet,
            self.alphabet_uc,
            translation,
            self.min_left_limit,
            self.min_right_limit,
            self.internal_encoding,
            self.format_version,
        )?;
        Ok((profile, CompiledDictionary::from_entries(entries)))
    }
}

fn single_char(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(CoreError::invalid_profile(format!("bad translation entry {s:?}")).into()),
    }
}
