//! Finding and hyphenating words in running text

use crate::word::{WordHyphenator, ESCAPE};

/// A hyphenatable run of letters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMatch {
    /// Byte offset of the first letter
    pub start: usize,
    /// Byte offset just past the last letter
    pub end: usize,
    /// Whether the word ends its paragraph
    pub paragraph_end: bool,
}

/// Locates words in a document and hands them to a [`WordHyphenator`]
#[derive(Debug, Clone, Copy)]
pub struct TextScanner<'a> {
    hyphenator: &'a WordHyphenator,
}

impl<'a> TextScanner<'a> {
    /// Create a scanner over a hyphenator
    pub fn new(hyphenator: &'a WordHyphenator) -> Self {
        Self { hyphenator }
    }

    /// Find every word eligible for hyphenation.
    ///
    /// A word is a maximal run of alphabet letters at least as long as the
    /// length limit and not preceded by the escape character. With
    /// `preserve_markup`, runs followed by `>` before any `<` sit inside a
    /// tag and are skipped. The last word of the text always ends a
    /// paragraph.
    pub fn find_words(&self, text: &str, preserve_markup: bool) -> Vec<WordMatch> {
        let profile = self.hyphenator.profile();
        let min_len = self.hyphenator.limits().length;
        let mut tags = TagCursor::default();
        let mut matches = Vec::new();

        let mut chars = text.char_indices().peekable();
        let mut prev: Option<char> = None;
        while let Some((start, ch)) = chars.next() {
            if !profile.is_letter(ch) {
                prev = Some(ch);
                continue;
            }

            let mut end = start + ch.len_utf8();
            let mut count = 1;
            let mut last = ch;
            while let Some(&(pos, next)) = chars.peek() {
                if !profile.is_letter(next) {
                    break;
                }
                end = pos + next.len_utf8();
                count += 1;
                last = next;
                chars.next();
            }

            let escaped = prev == Some(ESCAPE);
            prev = Some(last);
            if escaped || count < min_len {
                continue;
            }
            if preserve_markup && tags.inside_tag(text, end) {
                continue;
            }
            matches.push(WordMatch {
                start,
                end,
                paragraph_end: self.ends_paragraph(&text[end..]),
            });
        }

        if let Some(last) = matches.last_mut() {
            last.paragraph_end = true;
        }
        matches
    }

    /// Hyphenate every eligible word of `text`.
    pub fn hyphenate_text(&self, text: &str, marker: &str, preserve_markup: bool) -> String {
        self.hyphenate_text_with(text, marker, preserve_markup, |_| true)
    }

    /// Like [`hyphenate_text`](Self::hyphenate_text), but a hyphenated word
    /// is only used when `accept` approves it; otherwise the word is kept
    /// as written.
    pub fn hyphenate_text_with<F>(
        &self,
        text: &str,
        marker: &str,
        preserve_markup: bool,
        mut accept: F,
    ) -> String
    where
        F: FnMut(&str) -> bool,
    {
        let mut out = text.to_owned();
        // growth of `out` so far, in bytes
        let mut shift = 0;

        for word in self.find_words(text, preserve_markup) {
            let original = &text[word.start..word.end];
            let hyphenated = self
                .hyphenator
                .hyphenate_word(original, word.paragraph_end, marker);
            if hyphenated == original || !accept(&hyphenated) {
                continue;
            }
            let start = word.start + shift;
            out.replace_range(start..start + original.len(), &hyphenated);
            shift += hyphenated.len() - original.len();
        }
        out
    }

    /// Whether the non-letter run at the start of `rest` holds a line break.
    fn ends_paragraph(&self, rest: &str) -> bool {
        let profile = self.hyphenator.profile();
        rest.chars()
            .take_while(|&ch| !profile.is_letter(ch) && !ch.is_alphabetic())
            .any(|ch| ch == '\n' || ch == '\r')
    }
}

/// Remembers the next angle bracket so markup checks stay linear over a
/// document.
#[derive(Debug, Default)]
struct TagCursor {
    /// Byte offset searched from, and the bracket found there (if any)
    next: Option<(usize, Option<(usize, char)>)>,
}

impl TagCursor {
    /// Whether position `from` lies inside a tag: a `>` comes before any `<`.
    fn inside_tag(&mut self, text: &str, from: usize) -> bool {
        let cached = self.next.filter(|&(searched, found)| {
            searched <= from && found.map_or(true, |(pos, _)| pos >= from)
        });
        let bracket = match cached {
            Some((_, found)) => found,
            None => {
                let found = text[from..]
                    .char_indices()
                    .find(|&(_, ch)| ch == '<' || ch == '>')
                    .map(|(pos, ch)| (from + pos, ch));
                self.next = Some((from, found));
                found
            }
        };
        matches!(bracket, Some((_, '>')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RuleCompiler;
    use crate::limits::HyphenationLimits;
    use crate::profile::LanguageProfile;
    use std::collections::BTreeMap;

    fn hyphenator() -> WordHyphenator {
        let profile = LanguageProfile::new(
            "abcdefghijklmnopqrstuvwxyz",
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            BTreeMap::new(),
            2,
            3,
            "utf-8",
            "test",
        )
        .unwrap();
        let mut compiler = RuleCompiler::new();
        compiler.add_rules([
            "hy3ph", "he2n", "hena4", "hen5at", "1na", "n2at", "1tio", "2io", "o2n", "ta-ble",
            "in-te-ger",
        ]);
        WordHyphenator::new(profile, compiler.finish())
    }

    #[test]
    fn test_hyphenate_sentence() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        assert_eq!(
            scanner.hyphenate_text("Hyphenation of an integer table.", "-", false),
            "Hy-phen-ation of an in-te-ger ta-ble."
        );
    }

    #[test]
    fn test_find_words_skips_short_runs() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        let words = scanner.find_words("an integer", false);
        assert_eq!(words.len(), 1);
        assert_eq!(&"an integer"[words[0].start..words[0].end], "integer");
    }

    #[test]
    fn test_escaped_run_skipped() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        assert_eq!(
            scanner.hyphenate_text("\\hyphenation hyphenation", "-", false),
            "\\hyphenation hy-phen-ation"
        );
    }

    #[test]
    fn test_markup_preserved() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        assert_eq!(
            scanner.hyphenate_text("<hyphenation class=integer>hyphenation</hyphenation>", "-", true),
            "<hyphenation class=integer>hy-phen-ation</hyphenation>"
        );
        assert_eq!(
            scanner.hyphenate_text("<averylongword>", "-", true),
            "<averylongword>"
        );
        // without markup protection the tag name is just another word
        assert_eq!(
            scanner.hyphenate_text("<hyphenation>", "-", false),
            "<hy-phen-ation>"
        );
    }

    #[test]
    fn test_word_between_tags_is_not_inside_markup() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        let text = "<b>averylongword</b>";
        let words = scanner.find_words(text, true);
        assert_eq!(words.len(), 1);
        assert_eq!(&text[words[0].start..words[0].end], "averylongword");

        assert_eq!(
            scanner.hyphenate_text("<b>hyphenation</b>", "-", true),
            "<b>hy-phen-ation</b>"
        );
    }

    #[test]
    fn test_paragraph_detection() {
        let mut h = hyphenator();
        h.configure(HyphenationLimits::new(2, 3, 0, 6, 0));
        let scanner = TextScanner::new(&h);

        let text = "hyphenation,\nhyphenation hyphenation";
        let words = scanner.find_words(text, false);
        assert_eq!(
            words.iter().map(|w| w.paragraph_end).collect::<Vec<_>>(),
            vec![true, false, true]
        );
        assert_eq!(
            scanner.hyphenate_text(text, "-", false),
            "hy-phenation,\nhy-phen-ation hy-phenation"
        );
    }

    #[test]
    fn test_multibyte_marker_and_letters() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        let out = scanner.hyphenate_text("«hyphenation» — integer", "\u{00AD}", false);
        assert_eq!(out, "«hy\u{00AD}phen\u{00AD}ation» — in\u{00AD}te\u{00AD}ger");
        assert_eq!(out.replace('\u{00AD}', ""), "«hyphenation» — integer");
    }

    #[test]
    fn test_rejected_words_kept() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        let out = scanner.hyphenate_text_with("integer hyphenation", "-", false, |w| {
            !w.starts_with("in")
        });
        assert_eq!(out, "integer hy-phen-ation");
    }

    #[test]
    fn test_no_words() {
        let h = hyphenator();
        let scanner = TextScanner::new(&h);
        assert!(scanner.find_words("12 34, ...", false).is_empty());
        assert_eq!(scanner.hyphenate_text("", "-", true), "");
    }
}
