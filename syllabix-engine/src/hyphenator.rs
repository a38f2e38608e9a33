//! Public hyphenation API and builder

use std::path::{Path, PathBuf};
use std::sync::Arc;

use syllabix_core::{
    CompiledDictionary, CoreError, EncodingRsCodec, HyphenationLimits, LanguageProfile,
    TextCodec, TextScanner, WordHyphenator, DEFAULT_MARKER,
};

use crate::cache::{CacheOutcome, RecompilePolicy};
use crate::error::Result;
use crate::loader::Loader;
use crate::storage::{FsStorage, Storage};

/// Configuration directory used when none is given
pub const DEFAULT_CONFIG_DIR: &str = "conf";

/// Hyphenator for one language.
///
/// The profile and dictionary are loaded once, at construction; afterwards
/// only the margins and the uppercase switch change.
///
/// ```no_run
/// use syllabix_engine::{Hyphenator, RecompilePolicy, DEFAULT_MARKER};
///
/// let mut hyphenator = Hyphenator::open("conf", "en_US", RecompilePolicy::Auto)?;
/// hyphenator.set_limits(2, 3, 6, 4, 3);
/// let text = hyphenator.hyphenate("<p>Hyphenation</p>", DEFAULT_MARKER, true);
/// # Ok::<(), syllabix_engine::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Hyphenator {
    word: WordHyphenator,
    codec: Arc<dyn TextCodec>,
    outcome: CacheOutcome,
}

impl Hyphenator {
    /// Open `language` from `config_dir` with the default storage and codec.
    pub fn open<P: AsRef<Path>>(
        config_dir: P,
        language: &str,
        policy: RecompilePolicy,
    ) -> Result<Self> {
        Self::builder()
            .config_dir(config_dir.as_ref())
            .language(language)
            .recompile(policy)
            .build()
    }

    /// Start configuring a hyphenator
    pub fn builder() -> HyphenatorBuilder {
        HyphenatorBuilder::new()
    }

    /// Change the margins. Values below what the profile allows are raised.
    pub fn set_limits(
        &mut self,
        left: usize,
        right: usize,
        min_word_length: usize,
        right_last: usize,
        left_uc: usize,
    ) {
        self.word.configure(HyphenationLimits::new(
            left,
            right,
            min_word_length,
            right_last,
            left_uc,
        ));
    }

    /// Current margins
    pub fn limits(&self) -> HyphenationLimits {
        self.word.limits()
    }

    /// Hyphenate words with uppercase letters after the first one too.
    pub fn set_proceed_uppercase(&mut self, enabled: bool) {
        self.word.set_proceed_uppercase(enabled);
    }

    /// Insert `marker` at every legal break in `text`.
    pub fn hyphenate(&self, text: &str, marker: &str, preserve_markup: bool) -> String {
        TextScanner::new(&self.word).hyphenate_text(text, marker, preserve_markup)
    }

    /// Hyphenate a document stored in `encoding`.
    ///
    /// A document that cannot be decoded from, or written back to, `encoding`
    /// comes back unchanged. Words whose hyphenated form cannot be written in
    /// `encoding` are left as they are.
    pub fn hyphenate_encoded(
        &self,
        bytes: &[u8],
        encoding: &str,
        marker: &str,
        preserve_markup: bool,
    ) -> Result<Vec<u8>> {
        let text = match self.codec.decode(bytes, encoding) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("leaving document unchanged: {e}");
                return Ok(bytes.to_vec());
            }
        };

        let codec = &self.codec;
        let hyphenated = TextScanner::new(&self.word).hyphenate_text_with(
            &text,
            marker,
            preserve_markup,
            |word| codec.can_encode(word, encoding),
        );
        match self.codec.encode(&hyphenated, encoding) {
            Ok(encoded) => Ok(encoded),
            Err(e) => {
                log::debug!("leaving document unchanged: {e}");
                Ok(bytes.to_vec())
            }
        }
    }

    /// Hyphenate a single word with the soft hyphen.
    pub fn hyphenate_word(&self, word: &str, last_in_paragraph: bool) -> String {
        self.word
            .hyphenate_word(word, last_in_paragraph, DEFAULT_MARKER)
    }

    /// Language profile
    pub fn profile(&self) -> &LanguageProfile {
        self.word.profile()
    }

    /// Compiled dictionary
    pub fn dictionary(&self) -> &CompiledDictionary {
        self.word.dictionary()
    }

    /// Whether the dictionary was loaded from the cache or compiled
    pub fn cache_outcome(&self) -> CacheOutcome {
        self.outcome
    }
}

/// Builder for [`Hyphenator`]
#[derive(Debug, Clone)]
pub struct HyphenatorBuilder {
    config_dir: PathBuf,
    language: Option<String>,
    policy: RecompilePolicy,
    storage: Option<Arc<dyn Storage>>,
    codec: Option<Arc<dyn TextCodec>>,
    limits: Option<HyphenationLimits>,
    proceed_uppercase: bool,
}

impl Default for HyphenatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HyphenatorBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            language: None,
            policy: RecompilePolicy::default(),
            storage: None,
            codec: None,
            limits: None,
            proceed_uppercase: false,
        }
    }

    /// Directory holding `<language>.conf`
    pub fn config_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Language to load
    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Cache policy
    pub fn recompile(mut self, policy: RecompilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Storage backend
    pub fn storage<S: Storage + 'static>(mut self, storage: S) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Encoding converter
    pub fn codec<C: TextCodec + 'static>(mut self, codec: C) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Initial margins
    pub fn limits(mut self, limits: HyphenationLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// See [`Hyphenator::set_proceed_uppercase`]
    pub fn proceed_uppercase(mut self, enabled: bool) -> Self {
        self.proceed_uppercase = enabled;
        self
    }

    /// Load the profile and build the hyphenator
    pub fn build(self) -> Result<Hyphenator> {
        let language = self
            .language
            .ok_or_else(|| CoreError::config("language must be specified"))?;
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(FsStorage::new()) as Arc<dyn Storage>);
        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(EncodingRsCodec::new()) as Arc<dyn TextCodec>);

        let loaded = Loader::new(storage.as_ref(), codec.as_ref()).load(
            &self.config_dir,
            &language,
            self.policy,
        )?;

        let mut word = WordHyphenator::new(loaded.profile, loaded.dictionary);
        if let Some(limits) = self.limits {
            word.configure(limits);
        }
        word.set_proceed_uppercase(self.proceed_uppercase);

        Ok(Hyphenator {
            word,
            codec,
            outcome: loaded.outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::storage::MemoryStorage;

    fn storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage
            .insert(
                "conf/en.conf",
                "alphabet=abcdefghijklmnopqrstuvwxyz\nalphabetUC=ABCDEFGHIJKLMNOPQRSTUVWXYZ\n\
                 left_limit=2\nright_limit=3\ninternal_encoding=utf-8\n\
                 compiled=en.json\nrules=en.pat\n",
            )
            .unwrap();
        storage
            .insert(
                "conf/en.pat",
                "utf-8\nhy3ph\nhe2n\nhena4\nhen5at\n1na\nn2at\n1tio\n2io\no2n\n",
            )
            .unwrap();
        storage
    }

    #[test]
    fn test_builder_defaults() {
        let builder = HyphenatorBuilder::new();
        assert_eq!(builder.config_dir, PathBuf::from("conf"));
        assert_eq!(builder.policy, RecompilePolicy::Auto);
        assert!(builder.language.is_none());
    }

    #[test]
    fn test_language_required() {
        let err = Hyphenator::builder().storage(storage()).build().unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::Config(_))));
    }

    #[test]
    fn test_build_and_hyphenate() {
        let hyphenator = Hyphenator::builder()
            .language("en")
            .storage(storage())
            .build()
            .unwrap();
        assert_eq!(hyphenator.cache_outcome(), CacheOutcome::Recompiled);
        assert_eq!(
            hyphenator.hyphenate("Hyphenation!", "-", false),
            "Hy-phen-ation!"
        );
        assert_eq!(
            hyphenator.hyphenate_word("hyphenation", false),
            "hy\u{AD}phen\u{AD}ation"
        );
    }

    #[test]
    fn test_limits_are_clamped() {
        let mut hyphenator = Hyphenator::builder()
            .language("en")
            .storage(storage())
            .limits(HyphenationLimits::new(0, 0, 0, 0, 0))
            .build()
            .unwrap();
        assert_eq!(hyphenator.limits(), HyphenationLimits::new(2, 3, 5, 3, 2));

        hyphenator.set_limits(3, 1, 0, 0, 5);
        assert_eq!(hyphenator.limits(), HyphenationLimits::new(3, 3, 6, 3, 5));
    }

    #[test]
    fn test_proceed_uppercase() {
        let mut hyphenator = Hyphenator::builder()
            .language("en")
            .storage(storage())
            .build()
            .unwrap();
        assert_eq!(hyphenator.hyphenate("HYPHENATION", "-", false), "HYPHENATION");
        hyphenator.set_proceed_uppercase(true);
        assert_eq!(
            hyphenator.hyphenate("HYPHENATION", "-", false),
            "HY-PHEN-ATION"
        );
    }

    #[test]
    fn test_encoded_document() {
        let hyphenator = Hyphenator::builder()
            .language("en")
            .storage(storage())
            .build()
            .unwrap();

        let out = hyphenator
            .hyphenate_encoded(b"hyphenation", "windows-1252", "\u{AD}", false)
            .unwrap();
        assert_eq!(out, b"hy\xADphen\xADation");

        // KOI8-R has no soft hyphen, so the word stays whole
        let out = hyphenator
            .hyphenate_encoded(b"hyphenation", "koi8-r", "\u{AD}", false)
            .unwrap();
        assert_eq!(out, b"hyphenation");

        // not valid UTF-8
        let out = hyphenator
            .hyphenate_encoded(b"hyphenation \xFF", "utf-8", "-", false)
            .unwrap();
        assert_eq!(out, b"hyphenation \xFF");
    }

    #[test]
    fn test_encoded_document_without_output_encoder() {
        let hyphenator = Hyphenator::builder()
            .language("en")
            .storage(storage())
            .build()
            .unwrap();

        // UTF-16 decodes, but encoding_rs only writes it as UTF-8
        let input: Vec<u8> = "hyphenation"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        let out = hyphenator
            .hyphenate_encoded(&input, "utf-16le", "-", false)
            .unwrap();
        assert_eq!(out, input);
    }
}
