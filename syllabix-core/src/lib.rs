//! Liang-style pattern hyphenation
//!
//! This crate holds the pure part of syllabix: parsing language profiles,
//! compiling rule files into a prefix-closed pattern dictionary, and applying
//! that dictionary to single words and to running text. Reading files and
//! caching compiled dictionaries live in `syllabix-engine`.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use syllabix_core::{LanguageProfile, RuleCompiler, TextScanner, WordHyphenator};
//!
//! let profile = LanguageProfile::new(
//!     "abcdefghijklmnopqrstuvwxyz",
//!     "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
//!     BTreeMap::new(),
//!     2,
//!     3,
//!     "utf-8",
//!     "doc",
//! )
//! .unwrap();
//!
//! let mut compiler = RuleCompiler::new();
//! compiler.add_rules(["hy3ph", "he2n", "hena4", "hen5at", "1na", "n2at", "1tio", "2io", "o2n"]);
//! let hyphenator = WordHyphenator::new(profile, compiler.finish());
//!
//! assert_eq!(hyphenator.hyphenate_word("hyphenation", false, "-"), "hy-phen-ation");
//!
//! let scanner = TextScanner::new(&hyphenator);
//! assert_eq!(
//!     scanner.hyphenate_text("<p>hyphenation</p>", "-", true),
//!     "<p>hy-phen-ation</p>"
//! );
//! ```

pub mod codec;
pub mod compiler;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod limits;
pub mod profile;
pub mod scanner;
pub mod word;

pub use codec::{EncodingRsCodec, TextCodec};
pub use compiler::{CompileStats, RuleCompiler};
pub use config::{ConfigLoader, ConfigValue, ProfileConfig, ProfileKey};
pub use dictionary::{CompiledDictionary, Mask, PatternEntry, PatternLookup};
pub use error::{CoreError, Result};
pub use limits::HyphenationLimits;
pub use profile::{parse_alphabet, LanguageProfile};
pub use scanner::{TextScanner, WordMatch};
pub use word::{BreakPoints, WordHyphenator, ESCAPE};

/// Soft hyphen, the marker used when none is given
pub const DEFAULT_MARKER: &str = "\u{AD}";
