//! Profile file parsing
//!
//! Language profiles are plain `key=value` files:
//!
//! ```text
//! // English (US)
//! alphabet=abcdefghijklmnopqrstuvwxyz
//! alphabetUC=ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! left_limit=2
//! right_limit=3
//! internal_encoding=utf-8
//! compiled=cache/en_US.json
//! rules=rules/en_US.pat
//! rules=rules/en_US.dic
//! ```
//!
//! Values may be wrapped in single quotes to keep whitespace, `//`, `=` or
//! line breaks. Keys can repeat; every occurrence is kept in file order.

use std::collections::BTreeMap;
use std::fmt;

use crate::codec::{strip_bom, TextCodec};
use crate::error::{CoreError, Result};

/// Placeholder characters standing in for protected characters inside
/// quoted literals while comments and whitespace are stripped.
const PLACEHOLDERS: [(char, char); 6] = [
    ('\u{E000}', '\n'),
    ('\u{E001}', ' '),
    ('\u{E002}', '\''),
    ('\u{E003}', '"'),
    ('\u{E004}', '/'),
    ('\u{E005}', '='),
];

/// A single value of a profile key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// `key=value`
    Text(String),
    /// A bare `key` line
    Flag,
}

impl ConfigValue {
    /// Text content, if this is not a flag
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(text) => Some(text),
            ConfigValue::Flag => None,
        }
    }
}

/// Keys understood in a language profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKey {
    /// Lowercase alphabet, with `(X>y)` translation pairs
    Alphabet,
    /// Uppercase alphabet, positionally paired with `Alphabet`
    AlphabetUc,
    /// Minimum left margin
    LeftLimit,
    /// Minimum right margin
    RightLimit,
    /// Encoding of the profile and of the compiled dictionary
    InternalEncoding,
    /// Location of the compiled cache, relative to the profile
    Compiled,
    /// Rule files, relative to the profile (repeatable)
    Rules,
}

impl ProfileKey {
    /// Every key of the schema
    pub const ALL: [ProfileKey; 7] = [
        ProfileKey::Alphabet,
        ProfileKey::AlphabetUc,
        ProfileKey::LeftLimit,
        ProfileKey::RightLimit,
        ProfileKey::InternalEncoding,
        ProfileKey::Compiled,
        ProfileKey::Rules,
    ];

    /// Spelling of the key in profile files
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKey::Alphabet => "alphabet",
            ProfileKey::AlphabetUc => "alphabetUC",
            ProfileKey::LeftLimit => "left_limit",
            ProfileKey::RightLimit => "right_limit",
            ProfileKey::InternalEncoding => "internal_encoding",
            ProfileKey::Compiled => "compiled",
            ProfileKey::Rules => "rules",
        }
    }

    /// Resolve a key as written in a profile file
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Whether the key may appear more than once
    pub fn is_repeatable(&self) -> bool {
        matches!(self, ProfileKey::Rules)
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed profile: key to every value it was given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    entries: BTreeMap<String, Vec<ConfigValue>>,
}

impl ProfileConfig {
    /// All values of a raw key
    pub fn get(&self, key: &str) -> Option<&[ConfigValue]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Iterate over raw keys and their values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ConfigValue])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// First text value of a schema key
    pub fn first_text(&self, key: ProfileKey) -> Result<&str> {
        let values = self
            .get(key.as_str())
            .ok_or_else(|| CoreError::config(format!("missing required key '{key}'")))?;
        values
            .first()
            .and_then(ConfigValue::as_text)
            .ok_or_else(|| CoreError::config(format!("key '{key}' requires a value")))
    }

    /// Every text value of a schema key, in file order
    pub fn texts(&self, key: ProfileKey) -> Result<Vec<&str>> {
        let values = self
            .get(key.as_str())
            .ok_or_else(|| CoreError::config(format!("missing required key '{key}'")))?;
        values
            .iter()
            .map(|value| {
                value
                    .as_text()
                    .ok_or_else(|| CoreError::config(format!("key '{key}' requires a value")))
            })
            .collect()
    }

    /// First value of a schema key parsed as a margin
    pub fn first_usize(&self, key: ProfileKey) -> Result<usize> {
        let raw = self.first_text(key)?;
        raw.parse().map_err(|_| {
            CoreError::config(format!("key '{key}' expects a number, got '{raw}'"))
        })
    }

    /// Check the parsed keys against the profile schema.
    ///
    /// Every schema key is required; unknown keys are ignored.
    pub fn validate(&self) -> Result<()> {
        for key in self.entries.keys() {
            if ProfileKey::from_key(key).is_none() {
                log::debug!("ignoring unknown profile key '{key}'");
            }
        }
        for key in ProfileKey::ALL {
            if key.is_repeatable() {
                self.texts(key)?;
            } else {
                if self.get(key.as_str()).map_or(0, <[ConfigValue]>::len) > 1 {
                    log::debug!("profile key '{key}' repeated, using the first value");
                }
                self.first_text(key)?;
            }
        }
        Ok(())
    }

    fn push(&mut self, key: String, value: ConfigValue) {
        self.entries.entry(key).or_default().push(value);
    }
}

/// Parser for `key=value` profile files
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse profile text.
    ///
    /// Never fails: malformed lines simply produce odd keys, which
    /// [`ProfileConfig::validate`] reports.
    pub fn parse(text: &str) -> ProfileConfig {
        let text = normalize_line_feeds(text.strip_prefix('\u{FEFF}').unwrap_or(text));
        let protected = protect_literals(&text);

        let mut config = ProfileConfig::default();
        for line in strip_comments(&protected).lines() {
            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), ConfigValue::Text(restore(value.trim()))),
                None => (line.trim(), ConfigValue::Flag),
            };
            if key.is_empty() {
                log::debug!("skipping profile line without a key: {line:?}");
                continue;
            }
            config.push(restore(key), value);
        }
        config
    }

    /// Parse a raw profile file.
    ///
    /// The bytes are read as UTF-8 first; a profile declaring a different
    /// `internal_encoding` is decoded again with `codec` and reparsed.
    pub fn parse_bytes(bytes: &[u8], codec: &dyn TextCodec) -> Result<ProfileConfig> {
        let bytes = strip_bom(bytes);
        let provisional = Self::parse(&String::from_utf8_lossy(bytes));

        match provisional.first_text(ProfileKey::InternalEncoding) {
            Ok(encoding) if !codec.same_encoding(encoding, "utf-8") => {
                let text = codec.decode(bytes, encoding)?;
                Ok(Self::parse(&text))
            }
            _ => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| CoreError::encoding("utf-8", e.to_string()))?;
                Ok(Self::parse(text))
            }
        }
    }
}

/// Convert `\r\n` and bare `\r` to `\n`.
pub fn normalize_line_feeds(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove `//` comments, trim every line and drop blank lines.
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `'...'` literal with its content, protected by placeholders.
fn protect_literals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let opens = chars[i] == '\'' && (i == 0 || chars[i - 1] != '\\');
        if !opens {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match find_closing_quote(&chars, i + 1) {
            Some(end) => {
                protect_into(&chars[i + 1..end], &mut out);
                i = end + 1;
            }
            None => {
                // unterminated, keep as written
                out.extend(&chars[i..]);
                break;
            }
        }
    }
    out
}

fn find_closing_quote(chars: &[char], start: usize) -> Option<usize> {
    (start..chars.len()).find(|&j| chars[j] == '\'' && chars[j - 1] != '\\')
}

fn protect_into(literal: &[char], out: &mut String) {
    let mut i = 0;
    while i < literal.len() {
        let mut ch = literal[i];
        // `\"` loses its backslash, `\'` keeps it
        if ch == '\\' && literal.get(i + 1) == Some(&'"') {
            i += 1;
            ch = literal[i];
        }
        let placeholder = match ch {
            '\n' => '\u{E000}',
            '\'' => '\u{E002}',
            '"' => '\u{E003}',
            '/' => '\u{E004}',
            '=' => '\u{E005}',
            c if c.is_whitespace() => '\u{E001}',
            c => c,
        };
        out.push(placeholder);
        i += 1;
    }
}

fn restore(text: &str) -> String {
    text.chars()
        .map(|ch| {
            PLACEHOLDERS
                .iter()
                .find(|(placeholder, _)| *placeholder == ch)
                .map_or(ch, |(_, original)| *original)
        })
        .collect()
}
