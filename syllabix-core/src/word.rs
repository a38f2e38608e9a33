//! Single-word hyphenation
//!
//! The word is bracketed by boundary dots and every substring is looked up
//! in the dictionary. Each pattern found lifts the weights of the gaps it
//! covers; odd weights mark candidate breaks, which are then filtered by the
//! margins in [`HyphenationLimits`].

use smallvec::{smallvec, SmallVec};

use crate::dictionary::{CompiledDictionary, PatternLookup};
use crate::limits::HyphenationLimits;
use crate::profile::LanguageProfile;

/// A word containing this character is never hyphenated
pub const ESCAPE: char = '\\';

/// Word boundary used in pattern keys
const BOUNDARY: char = '.';

/// Break positions, counted in letters from the start of the word
pub type BreakPoints = SmallVec<[usize; 8]>;

/// Applies a compiled dictionary to individual words
#[derive(Debug, Clone)]
pub struct WordHyphenator {
    profile: LanguageProfile,
    dictionary: CompiledDictionary,
    limits: HyphenationLimits,
    proceed_uppercase: bool,
}

impl WordHyphenator {
    /// Create a hyphenator with the profile's minimum margins.
    pub fn new(profile: LanguageProfile, dictionary: CompiledDictionary) -> Self {
        let limits = HyphenationLimits::for_profile(&profile);
        Self {
            profile,
            dictionary,
            limits,
            proceed_uppercase: false,
        }
    }

    /// Replace the margins; they are clamped against the profile.
    pub fn configure(&mut self, limits: HyphenationLimits) {
        self.limits = limits.clamp(&self.profile);
    }

    /// Current, clamped margins
    pub fn limits(&self) -> HyphenationLimits {
        self.limits
    }

    /// Whether words with uppercase letters after the first are hyphenated
    /// (folded for lookup) rather than left alone.
    pub fn set_proceed_uppercase(&mut self, enabled: bool) {
        self.proceed_uppercase = enabled;
    }

    /// See [`set_proceed_uppercase`](Self::set_proceed_uppercase)
    pub fn proceeds_uppercase(&self) -> bool {
        self.proceed_uppercase
    }

    /// Language profile
    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Pattern dictionary
    pub fn dictionary(&self) -> &CompiledDictionary {
        &self.dictionary
    }

    /// Insert `marker` at every legal break of `word`.
    ///
    /// Words that must not be touched come back unchanged.
    pub fn hyphenate_word(&self, word: &str, last_in_paragraph: bool, marker: &str) -> String {
        let points = self.hyphenation_points(word, last_in_paragraph);
        if points.is_empty() {
            return word.to_owned();
        }

        let mut out = String::with_capacity(word.len() + points.len() * marker.len());
        let mut points = points.into_iter().peekable();
        for (index, ch) in word.chars().enumerate() {
            out.push(ch);
            if points.peek() == Some(&(index + 1)) {
                out.push_str(marker);
                points.next();
            }
        }
        out
    }

    /// Legal break positions of `word`, as the number of letters before
    /// each break.
    pub fn hyphenation_points(&self, word: &str, last_in_paragraph: bool) -> BreakPoints {
        let letters: SmallVec<[char; 32]> = word.chars().collect();
        let n = letters.len();
        if n == 0 || n < self.limits.length || letters.contains(&ESCAPE) {
            return BreakPoints::new();
        }
        let capitalized = self.profile.is_upper(letters[0]);

        let Some((lookup, offsets)) = self.lookup_form(&letters) else {
            return BreakPoints::new();
        };
        let scores = self.score(&lookup, &offsets);

        let left = self.limits.left_for(capitalized);
        let right = self.limits.right_for(last_in_paragraph);
        let mut points = BreakPoints::new();
        // no break right after the first letter, nor two breaks in a row
        let mut syllable = false;
        for p in 1..=n {
            if syllable && p >= left && p + right <= n && scores[p + 1] % 2 == 1 {
                points.push(p);
                syllable = false;
            } else {
                syllable = true;
            }
        }
        points
    }

    /// Bracketed, case-folded, translated form of the word, with the byte
    /// offset of every character plus the end offset. `None` when the word
    /// holds uppercase letters past the first and those are not processed.
    fn lookup_form(&self, letters: &[char]) -> Option<(String, SmallVec<[usize; 36]>)> {
        let mut lookup = String::with_capacity((letters.len() + 2) * 2);
        let mut offsets = SmallVec::with_capacity(letters.len() + 3);

        offsets.push(lookup.len());
        lookup.push(self.profile.translate(BOUNDARY));
        for (i, &ch) in letters.iter().enumerate() {
            if i > 0 && !self.proceed_uppercase && self.profile.is_upper(ch) {
                return None;
            }
            offsets.push(lookup.len());
            lookup.push(self.profile.translate(self.profile.to_lower(ch)));
        }
        offsets.push(lookup.len());
        lookup.push(self.profile.translate(BOUNDARY));
        offsets.push(lookup.len());

        Some((lookup, offsets))
    }

    /// Gap weights: slot `m` is the gap before character `m` of the
    /// bracketed word.
    fn score(&self, lookup: &str, offsets: &[usize]) -> SmallVec<[u8; 36]> {
        let len = offsets.len() - 1;
        let mut scores: SmallVec<[u8; 36]> = smallvec![0; len + 1];

        for i in 0..len.saturating_sub(1) {
            // the leading dot alone is never a pattern
            let first = if i == 0 { 2 } else { 1 };
            for k in first..=len - i {
                match self.dictionary.lookup(&lookup[offsets[i]..offsets[i + k]]) {
                    PatternLookup::Absent => break,
                    PatternLookup::NoBreakInfo => {}
                    PatternLookup::Mask(mask) => {
                        for (slot, &digit) in scores[i..].iter_mut().zip(mask.iter().take(k + 1)) {
                            *slot = (*slot).max(digit);
                        }
                    }
                }
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RuleCompiler;
    use crate::profile::parse_alphabet;

    const LIANG: [&str; 9] = [
        "hy3ph", "he2n", "hena4", "hen5at", "1na", "n2at", "1tio", "2io", "o2n",
    ];

    fn english(extra: &[&str]) -> WordHyphenator {
        let (alphabet, translation) = parse_alphabet("abcdefghijklmnopqrstuvwxyz");
        let profile = LanguageProfile::new(
            alphabet,
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            translation,
            2,
            3,
            "utf-8",
            "test",
        )
        .unwrap();
        let mut compiler = RuleCompiler::new();
        compiler.add_rules(LIANG);
        compiler.add_rules(extra.iter().copied());
        WordHyphenator::new(profile, compiler.finish())
    }

    #[test]
    fn test_liang_example() {
        let hyphenator = english(&[]);
        assert_eq!(
            hyphenator.hyphenate_word("hyphenation", false, "-"),
            "hy-phen-ation"
        );
        assert_eq!(
            hyphenator.hyphenation_points("hyphenation", false).as_slice(),
            &[2, 6]
        );
    }

    #[test]
    fn test_right_limit_for_last_word() {
        let mut hyphenator = english(&[]);
        hyphenator.configure(HyphenationLimits::new(2, 3, 0, 6, 0));
        assert_eq!(
            hyphenator.hyphenate_word("hyphenation", true, "-"),
            "hy-phenation"
        );
        assert_eq!(
            hyphenator.hyphenate_word("hyphenation", false, "-"),
            "hy-phen-ation"
        );
    }

    #[test]
    fn test_capitalized_word_uses_uc_margin() {
        let mut hyphenator = english(&[]);
        assert_eq!(
            hyphenator.hyphenate_word("Hyphenation", false, "-"),
            "Hy-phen-ation"
        );
        hyphenator.configure(HyphenationLimits::new(2, 3, 0, 0, 3));
        assert_eq!(
            hyphenator.hyphenate_word("Hyphenation", false, "-"),
            "Hyphen-ation"
        );
        assert_eq!(
            hyphenator.hyphenate_word("hyphenation", false, "-"),
            "hy-phen-ation"
        );
    }

    #[test]
    fn test_interior_uppercase() {
        let mut hyphenator = english(&[]);
        assert_eq!(
            hyphenator.hyphenate_word("HYPHENATION", false, "-"),
            "HYPHENATION"
        );
        hyphenator.set_proceed_uppercase(true);
        assert_eq!(
            hyphenator.hyphenate_word("HYPHENATION", false, "-"),
            "HY-PHEN-ATION"
        );
    }

    #[test]
    fn test_escape_and_short_words() {
        let hyphenator = english(&[]);
        assert_eq!(
            hyphenator.hyphenate_word("hyphen\\ation", false, "-"),
            "hyphen\\ation"
        );
        assert_eq!(hyphenator.hyphenate_word("hyph", false, "-"), "hyph");
        assert_eq!(hyphenator.hyphenate_word("", false, "-"), "");
    }

    #[test]
    fn test_dictionary_word_overrides_patterns() {
        let hyphenator = english(&["hyphena-tion"]);
        assert_eq!(
            hyphenator.hyphenate_word("hyphenation", false, "-"),
            "hyphena-tion"
        );
    }

    #[test]
    fn test_word_longer_than_inline_buffers() {
        let hyphenator = english(&[]);
        let word = "hyphenation".repeat(5);
        let hyphenated = hyphenator.hyphenate_word(&word, false, "-");
        assert!(hyphenated.starts_with("hy-phen-"));
        assert_eq!(hyphenated.replace('-', ""), word);
    }

    #[test]
    fn test_length_limit() {
        let mut hyphenator = english(&[]);
        hyphenator.configure(HyphenationLimits::new(0, 0, 12, 0, 0));
        assert_eq!(
            hyphenator.hyphenate_word("hyphenation", false, "-"),
            "hyphenation"
        );
    }

    #[test]
    fn test_translation_used_for_lookup_only() {
        let (alphabet, translation) = parse_alphabet("abcdefghijklmnopqrstuvwxyz(ý>y)");
        let profile = LanguageProfile::new(
            alphabet,
            "ABCDEFGHIJKLMNOPQRSTUVWXYZÝ",
            translation,
            2,
            3,
            "utf-8",
            "test",
        )
        .unwrap();
        let mut compiler = RuleCompiler::new();
        compiler.add_rules(LIANG);
        let hyphenator = WordHyphenator::new(profile, compiler.finish());
        assert_eq!(
            hyphenator.hyphenate_word("hýphenation", false, "-"),
            "hý-phen-ation"
        );
    }
}
