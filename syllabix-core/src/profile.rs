//! Language profile: alphabet, case pairing, lookup translation and margins

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{ProfileConfig, ProfileKey};
use crate::error::{CoreError, Result};

/// `(X>y)`: `X` is an alphabet letter looked up as `y`
fn pair_pattern() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| Regex::new(r"\((.+?)>(.+?)\)").expect("valid alphabet pair pattern"))
}

/// Immutable description of one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    alphabet: String,
    alphabet_uc: String,
    translation: BTreeMap<char, char>,
    min_left_limit: usize,
    min_right_limit: usize,
    internal_encoding: String,
    format_version: String,
    // derived lookups
    letters: HashSet<char>,
    upper_to_lower: HashMap<char, char>,
}

impl LanguageProfile {
    /// Assemble a profile from already-resolved parts.
    pub fn new(
        alphabet: impl Into<String>,
        alphabet_uc: impl Into<String>,
        translation: BTreeMap<char, char>,
        min_left_limit: usize,
        min_right_limit: usize,
        internal_encoding: impl Into<String>,
        format_version: impl Into<String>,
    ) -> Result<Self> {
        let alphabet = alphabet.into();
        let alphabet_uc = alphabet_uc.into();
        if alphabet.is_empty() {
            return Err(CoreError::invalid_profile("alphabet is empty"));
        }

        let lower_count = alphabet.chars().count();
        let upper_count = alphabet_uc.chars().count();
        if lower_count != upper_count {
            log::warn!(
                "alphabet has {lower_count} letters but alphabetUC has {upper_count}; \
                 case folding pairs letters by position"
            );
        }

        let letters = alphabet.chars().chain(alphabet_uc.chars()).collect();
        let upper_to_lower = alphabet_uc.chars().zip(alphabet.chars()).collect();

        Ok(Self {
            alphabet,
            alphabet_uc,
            translation,
            min_left_limit,
            min_right_limit,
            internal_encoding: internal_encoding.into(),
            format_version: format_version.into(),
            letters,
            upper_to_lower,
        })
    }

    /// Build a profile from a validated profile file.
    pub fn from_config(config: &ProfileConfig, format_version: &str) -> Result<Self> {
        let (alphabet, translation) = parse_alphabet(config.first_text(ProfileKey::Alphabet)?);
        Self::new(
            alphabet,
            config.first_text(ProfileKey::AlphabetUc)?,
            translation,
            config.first_usize(ProfileKey::LeftLimit)?,
            config.first_usize(ProfileKey::RightLimit)?,
            config.first_text(ProfileKey::InternalEncoding)?,
            format_version,
        )
    }

    /// Lowercase alphabet
    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    /// Uppercase alphabet
    pub fn alphabet_uc(&self) -> &str {
        &self.alphabet_uc
    }

    /// Lookup translation table
    pub fn translation(&self) -> &BTreeMap<char, char> {
        &self.translation
    }

    /// Smallest left margin the language allows
    pub fn min_left_limit(&self) -> usize {
        self.min_left_limit
    }

    /// Smallest right margin the language allows
    pub fn min_right_limit(&self) -> usize {
        self.min_right_limit
    }

    /// Encoding label of the profile and its rules
    pub fn internal_encoding(&self) -> &str {
        &self.internal_encoding
    }

    /// Version of the engine that produced this profile
    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    /// Whether `ch` belongs to either alphabet
    #[inline]
    pub fn is_letter(&self, ch: char) -> bool {
        self.letters.contains(&ch)
    }

    /// Whether `ch` is an uppercase letter of the language
    #[inline]
    pub fn is_upper(&self, ch: char) -> bool {
        self.upper_to_lower.contains_key(&ch)
    }

    /// Lowercase partner of an uppercase letter, `ch` itself otherwise
    #[inline]
    pub fn to_lower(&self, ch: char) -> char {
        self.upper_to_lower.get(&ch).copied().unwrap_or(ch)
    }

    /// Lookup form of a letter
    #[inline]
    pub fn translate(&self, ch: char) -> char {
        self.translation.get(&ch).copied().unwrap_or(ch)
    }
}

/// Split an alphabet definition into the plain alphabet and its translation
/// table.
pub fn parse_alphabet(definition: &str) -> (String, BTreeMap<char, char>) {
    let pattern = pair_pattern();
    let mut translation = BTreeMap::new();

    for caps in pattern.captures_iter(definition) {
        let mut from = caps[1].chars();
        let mut to = caps[2].chars();
        match (from.next(), from.next(), to.next(), to.next()) {
            (Some(from), None, Some(to), None) => {
                translation.insert(from, to);
            }
            _ => log::warn!(
                "ignoring translation pair '{}': both sides must be single letters",
                &caps[0]
            ),
        }
    }

    let alphabet = pattern.replace_all(definition, "$1").into_owned();
    (alphabet, translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    fn russian() -> LanguageProfile {
        let (alphabet, translation) = parse_alphabet("абвгде(ё>е)жз");
        LanguageProfile::new(alphabet, "АБВГДЕЁЖЗ", translation, 2, 2, "utf-8", "test").unwrap()
    }

    #[test]
    fn test_parse_alphabet_pairs() {
        let (alphabet, translation) = parse_alphabet("abc(ä>a)d(ö>o)");
        assert_eq!(alphabet, "abcädö");
        assert_eq!(translation.get(&'ä'), Some(&'a'));
        assert_eq!(translation.get(&'ö'), Some(&'o'));
        assert_eq!(translation.len(), 2);
    }

    #[test]
    fn test_parse_alphabet_without_pairs() {
        let (alphabet, translation) = parse_alphabet("abc");
        assert_eq!(alphabet, "abc");
        assert!(translation.is_empty());
    }

    #[test]
    fn test_multi_letter_pair_ignored() {
        let (alphabet, translation) = parse_alphabet("a(ß>ss)b");
        assert_eq!(alphabet, "aßb");
        assert!(translation.is_empty());
    }

    #[test]
    fn test_case_pairing() {
        let profile = russian();
        assert!(profile.is_upper('Ё'));
        assert_eq!(profile.to_lower('Ё'), 'ё');
        assert_eq!(profile.to_lower('ж'), 'ж');
        assert_eq!(profile.translate('ё'), 'е');
        assert!(profile.is_letter('Ж'));
        assert!(!profile.is_letter('x'));
    }

    #[test]
    fn test_from_config() {
        let config = ConfigLoader::parse(
            "alphabet=ab(c>k)\nalphabetUC=ABC\nleft_limit=2\nright_limit=3\n\
             internal_encoding=utf-8\ncompiled=c.json\nrules=r.pat",
        );
        let profile = LanguageProfile::from_config(&config, "1.0").unwrap();
        assert_eq!(profile.alphabet(), "abc");
        assert_eq!(profile.min_left_limit(), 2);
        assert_eq!(profile.min_right_limit(), 3);
        assert_eq!(profile.format_version(), "1.0");
        assert_eq!(profile.translate('c'), 'k');
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        assert!(LanguageProfile::new("", "", BTreeMap::new(), 1, 1, "utf-8", "x").is_err());
    }
}
