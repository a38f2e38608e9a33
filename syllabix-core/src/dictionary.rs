//! Compiled pattern dictionary
//!
//! Keys are pattern letters without digits; values carry the digit mask.
//! Every proper prefix of a stored key is stored as well, so a left-to-right
//! scan can stop at the first absent substring without missing a shorter
//! pattern.

use std::collections::BTreeMap;

use smallvec::SmallVec;

/// Digit weights of one pattern, one more than the key has letters
pub type Mask = SmallVec<[u8; 8]>;

/// Stored dictionary value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternEntry {
    /// Present only to keep the prefix chain unbroken
    NoBreakInfo,
    /// Real pattern weights
    Mask(Mask),
}

impl PatternEntry {
    /// Parse a digit string such as `"00030"`.
    pub fn from_digits(digits: &str) -> Option<Self> {
        digits
            .chars()
            .map(|ch| ch.to_digit(10).map(|d| d as u8))
            .collect::<Option<Mask>>()
            .filter(|mask| !mask.is_empty())
            .map(PatternEntry::Mask)
    }

    /// Digit string of a mask entry
    pub fn to_digits(&self) -> Option<String> {
        match self {
            PatternEntry::NoBreakInfo => None,
            PatternEntry::Mask(mask) => Some(
                mask.iter()
                    .map(|&d| char::from(b'0' + d.min(9)))
                    .collect(),
            ),
        }
    }
}

/// Result of a dictionary lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternLookup<'a> {
    /// Neither a pattern nor the prefix of one
    Absent,
    /// Prefix of a longer pattern, no weights of its own
    NoBreakInfo,
    /// Pattern weights
    Mask(&'a [u8]),
}

/// Read-only pattern table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledDictionary {
    entries: BTreeMap<String, PatternEntry>,
}

impl CompiledDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a dictionary from stored entries, restoring any missing
    /// prefixes.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, PatternEntry)>,
    {
        let mut dictionary = Self {
            entries: entries.into_iter().collect(),
        };
        let keys: Vec<String> = dictionary.entries.keys().cloned().collect();
        for key in keys {
            dictionary.close_prefixes(&key);
        }
        dictionary
    }

    /// Store a pattern, replacing any previous weights for the same key.
    pub fn insert(&mut self, key: &str, mask: Mask) {
        self.entries
            .insert(key.to_owned(), PatternEntry::Mask(mask));
        self.close_prefixes(key);
    }

    /// Look up a key
    #[inline]
    pub fn lookup(&self, key: &str) -> PatternLookup<'_> {
        match self.entries.get(key) {
            None => PatternLookup::Absent,
            Some(PatternEntry::NoBreakInfo) => PatternLookup::NoBreakInfo,
            Some(PatternEntry::Mask(mask)) => PatternLookup::Mask(mask.as_slice()),
        }
    }

    /// Number of stored keys, prefixes included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys carrying real weights
    pub fn pattern_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, PatternEntry::Mask(_)))
            .count()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Whether every proper non-empty prefix of every key is stored
    pub fn is_prefix_closed(&self) -> bool {
        self.entries.keys().all(|key| {
            key.char_indices()
                .skip(1)
                .all(|(end, _)| self.entries.contains_key(&key[..end]))
        })
    }

    fn close_prefixes(&mut self, key: &str) {
        let ends: Vec<usize> = key.char_indices().skip(1).map(|(end, _)| end).collect();
        for end in ends.into_iter().rev() {
            let prefix = &key[..end];
            if self.entries.contains_key(prefix) {
                break;
            }
            self.entries
                .insert(prefix.to_owned(), PatternEntry::NoBreakInfo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_insert_closes_prefixes() {
        let mut dictionary = CompiledDictionary::new();
        dictionary.insert("hyph", smallvec![0, 0, 3, 0, 0]);

        assert_eq!(dictionary.lookup("h"), PatternLookup::NoBreakInfo);
        assert_eq!(dictionary.lookup("hy"), PatternLookup::NoBreakInfo);
        assert_eq!(dictionary.lookup("hyp"), PatternLookup::NoBreakInfo);
        assert_eq!(dictionary.lookup("hyph"), PatternLookup::Mask(&[0, 0, 3, 0, 0]));
        assert_eq!(dictionary.lookup("y"), PatternLookup::Absent);
        assert!(dictionary.is_prefix_closed());
        assert_eq!(dictionary.pattern_count(), 1);
        assert_eq!(dictionary.len(), 4);
    }

    #[test]
    fn test_real_prefix_is_not_downgraded() {
        let mut dictionary = CompiledDictionary::new();
        dictionary.insert("he", smallvec![0, 0, 2]);
        dictionary.insert("hena", smallvec![0, 0, 0, 0, 4]);

        assert_eq!(dictionary.lookup("he"), PatternLookup::Mask(&[0, 0, 2]));
        assert_eq!(dictionary.lookup("hen"), PatternLookup::NoBreakInfo);
    }

    #[test]
    fn test_later_mask_overrides_placeholder() {
        let mut dictionary = CompiledDictionary::new();
        dictionary.insert("abc", smallvec![0, 1, 0, 0]);
        dictionary.insert("ab", smallvec![0, 0, 1]);
        assert_eq!(dictionary.lookup("ab"), PatternLookup::Mask(&[0, 0, 1]));
    }

    #[test]
    fn test_multibyte_keys() {
        let mut dictionary = CompiledDictionary::new();
        dictionary.insert("жив", smallvec![0, 1, 0, 0]);
        assert_eq!(dictionary.lookup("жи"), PatternLookup::NoBreakInfo);
        assert_eq!(dictionary.lookup("ж"), PatternLookup::NoBreakInfo);
        assert!(dictionary.is_prefix_closed());
    }

    #[test]
    fn test_from_entries_restores_closure() {
        let dictionary = CompiledDictionary::from_entries(vec![(
            "abc".to_string(),
            PatternEntry::from_digits("0100").unwrap(),
        )]);
        assert!(dictionary.is_prefix_closed());
        assert_eq!(dictionary.lookup("a"), PatternLookup::NoBreakInfo);
    }

    #[test]
    fn test_digit_conversion() {
        let entry = PatternEntry::from_digits("0309").unwrap();
        assert_eq!(entry.to_digits().as_deref(), Some("0309"));
        assert_eq!(PatternEntry::NoBreakInfo.to_digits(), None);
        assert!(PatternEntry::from_digits("0a1").is_none());
        assert!(PatternEntry::from_digits("").is_none());
    }
}
