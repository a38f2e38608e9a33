//! Rule compilation
//!
//! Rule files hold one rule per line after an encoding line:
//!
//! ```text
//! utf-8
//! // Liang patterns: digits weigh the gap they sit in
//! hy3ph
//! hen5at
//! // dictionary words: '-' marks every allowed break
//! ta-ble
//! ```
//!
//! Patterns keep their weights; a dictionary word becomes a pattern
//! bracketed by word boundaries with weight 9 on each marked gap and 8 on
//! every other gap, so it overrides whatever the patterns say.

use crate::codec::{strip_bom, TextCodec};
use crate::config::{normalize_line_feeds, strip_comments, ProfileConfig};
use crate::dictionary::{CompiledDictionary, Mask};
use crate::error::Result;
use crate::profile::LanguageProfile;

/// Weight of a break marked in a dictionary word
const WORD_BREAK: char = '9';
/// Weight of any other gap in a dictionary word
const WORD_NO_BREAK: char = '8';
/// Weight implied between letters of a pattern
const IMPLIED: char = '0';
/// Word boundary marker
const BOUNDARY: char = '.';

/// Counters gathered while compiling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    /// Liang patterns accepted
    pub patterns: usize,
    /// Dictionary words accepted
    pub words: usize,
    /// Lines that yielded no usable key and mask
    pub skipped: usize,
}

/// Incremental builder of a [`CompiledDictionary`]
#[derive(Debug, Default)]
pub struct RuleCompiler {
    dictionary: CompiledDictionary,
    stats: CompileStats,
}

impl RuleCompiler {
    /// Create an empty compiler
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a profile and the raw contents of its rule files.
    pub fn compile<'a, I>(
        config: &ProfileConfig,
        rule_files: I,
        codec: &dyn TextCodec,
        format_version: &str,
    ) -> Result<(LanguageProfile, CompiledDictionary)>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        config.validate()?;
        let profile = LanguageProfile::from_config(config, format_version)?;

        let mut compiler = Self::new();
        for bytes in rule_files {
            compiler.add_rule_file(bytes, codec)?;
        }

        let stats = compiler.stats();
        log::info!(
            "compiled {} patterns and {} dictionary words ({} lines skipped)",
            stats.patterns,
            stats.words,
            stats.skipped
        );
        Ok((profile, compiler.finish()))
    }

    /// Add a raw rule file whose first line names its encoding.
    pub fn add_rule_file(&mut self, bytes: &[u8], codec: &dyn TextCodec) -> Result<()> {
        let bytes = strip_bom(bytes);
        let provisional = strip_comments(&normalize_line_feeds(&String::from_utf8_lossy(bytes)));
        let Some(encoding) = provisional.lines().next().map(str::to_owned) else {
            log::debug!("empty rule file");
            return Ok(());
        };

        let text = codec.decode(bytes, &encoding)?;
        let cleaned = strip_comments(&normalize_line_feeds(&text));
        self.add_rules(cleaned.lines().skip(1));
        Ok(())
    }

    /// Add already decoded rule lines.
    pub fn add_rules<'a, I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            self.add_line(line);
        }
    }

    /// Add one rule line. Returns whether it produced an entry.
    pub fn add_line(&mut self, line: &str) -> bool {
        let is_word = is_dictionary_word(line);
        match rule_to_pattern(line) {
            Some((key, mask)) => {
                self.dictionary.insert(&key, mask);
                if is_word {
                    self.stats.words += 1;
                } else {
                    self.stats.patterns += 1;
                }
                true
            }
            None => {
                log::debug!("skipping malformed rule line {line:?}");
                self.stats.skipped += 1;
                false
            }
        }
    }

    /// Counters so far
    pub fn stats(&self) -> CompileStats {
        self.stats
    }

    /// Finish compilation
    pub fn finish(self) -> CompiledDictionary {
        self.dictionary
    }
}

/// A line without digits or boundary dots lists a whole word.
fn is_dictionary_word(line: &str) -> bool {
    !line.chars().any(|ch| ch.is_ascii_digit() || ch == BOUNDARY)
}

/// Turn a rule line into its letter key and digit mask.
pub fn rule_to_pattern(line: &str) -> Option<(String, Mask)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut chars: Vec<char> = if is_dictionary_word(line) {
        let word: Vec<char> = line
            .chars()
            .map(|ch| if ch == '-' { WORD_BREAK } else { ch })
            .collect();
        let mut bracketed = vec![BOUNDARY];
        bracketed.extend(interleave(&word, WORD_NO_BREAK));
        bracketed.push(BOUNDARY);
        bracketed
    } else {
        line.chars().collect()
    };

    chars = interleave(&chars, IMPLIED);
    if chars.first().is_some_and(|ch| !ch.is_ascii_digit()) {
        chars.insert(0, IMPLIED);
    }
    if chars.last().is_some_and(|ch| !ch.is_ascii_digit()) {
        chars.push(IMPLIED);
    }

    let key: String = chars
        .iter()
        .filter(|ch| !ch.is_ascii_digit() && !ch.is_whitespace())
        .collect();
    let mask: Mask = chars
        .iter()
        .filter_map(|ch| ch.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if key.is_empty() || mask.len() != key.chars().count() + 1 {
        return None;
    }
    Some((key, mask))
}

/// Insert `digit` between every two adjacent non-digit characters.
fn interleave(chars: &[char], digit: char) -> Vec<char> {
    let mut out: Vec<char> = Vec::with_capacity(chars.len() * 2);
    for &ch in chars {
        if let Some(&prev) = out.last() {
            if !prev.is_ascii_digit() && !ch.is_ascii_digit() {
                out.push(digit);
            }
        }
        out.push(ch);
    }
    out
}
