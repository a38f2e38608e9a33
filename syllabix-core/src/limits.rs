//! Hyphenation margins

use serde::{Deserialize, Serialize};

use crate::profile::LanguageProfile;

/// Margins controlling where breaks may appear in a word.
///
/// Missing fields deserialize as zero, which [`clamp`](Self::clamp) raises
/// to the profile minimums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyphenationLimits {
    /// Letters that must precede a break
    pub left: usize,
    /// Letters that must follow a break
    pub right: usize,
    /// Shortest word considered for hyphenation
    pub length: usize,
    /// Letters that must follow a break in the last word of a paragraph
    pub right_last: usize,
    /// Letters that must precede a break when the word is capitalized
    pub left_uc: usize,
}

impl HyphenationLimits {
    /// Create limits from raw values; call [`clamp`](Self::clamp) before use.
    pub fn new(left: usize, right: usize, length: usize, right_last: usize, left_uc: usize) -> Self {
        Self {
            left,
            right,
            length,
            right_last,
            left_uc,
        }
    }

    /// Smallest limits a profile allows
    pub fn for_profile(profile: &LanguageProfile) -> Self {
        Self::default().clamp(profile)
    }

    /// Raise every margin to what the profile and the other margins require.
    pub fn clamp(self, profile: &LanguageProfile) -> Self {
        let left = self.left.max(profile.min_left_limit());
        let right = self.right.max(profile.min_right_limit());
        Self {
            left,
            right,
            length: self.length.max(left + right),
            right_last: self.right_last.max(right),
            left_uc: self.left_uc.max(left),
        }
    }

    /// Left margin for a word, depending on its first letter's case
    #[inline]
    pub fn left_for(&self, capitalized: bool) -> usize {
        if capitalized {
            self.left_uc
        } else {
            self.left
        }
    }

    /// Right margin for a word, depending on its paragraph position
    #[inline]
    pub fn right_for(&self, last_in_paragraph: bool) -> usize {
        if last_in_paragraph {
            self.right_last
        } else {
            self.right
        }
    }
}
