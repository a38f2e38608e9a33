//! Text encoding conversion
//!
//! Profiles, rule files and caller documents may each use their own legacy
//! encoding. Everything inside the core is Unicode; a [`TextCodec`] converts
//! at the edges. The codec is injected so hosts can bring their own
//! conversion tables; [`EncodingRsCodec`] is the default.

use std::fmt;

use encoding_rs::Encoding;

use crate::error::{CoreError, Result};

/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding conversion service
pub trait TextCodec: Send + Sync + fmt::Debug {
    /// Decode `bytes` written in `encoding`. Malformed input is an error,
    /// never silently replaced.
    fn decode(&self, bytes: &[u8], encoding: &str) -> Result<String>;

    /// Encode `text` into `encoding`. Characters the encoding cannot
    /// represent are an error.
    fn encode(&self, text: &str, encoding: &str) -> Result<Vec<u8>>;

    /// Whether two labels name the same encoding.
    fn same_encoding(&self, a: &str, b: &str) -> bool {
        a.trim().eq_ignore_ascii_case(b.trim())
    }

    /// Whether `text` survives a round trip through `encoding`.
    fn can_encode(&self, text: &str, encoding: &str) -> bool {
        self.encode(text, encoding).is_ok()
    }
}

/// [`TextCodec`] backed by the WHATWG encoding tables of `encoding_rs`
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodingRsCodec;

impl EncodingRsCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self
    }

    fn lookup(label: &str) -> Result<&'static Encoding> {
        Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| CoreError::encoding(label, "unknown encoding label"))
    }
}

impl TextCodec for EncodingRsCodec {
    fn decode(&self, bytes: &[u8], encoding: &str) -> Result<String> {
        let enc = Self::lookup(encoding)?;
        enc.decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| CoreError::encoding(encoding, "malformed byte sequence"))
    }

    fn encode(&self, text: &str, encoding: &str) -> Result<Vec<u8>> {
        let enc = Self::lookup(encoding)?;
        let (bytes, used, had_errors) = enc.encode(text);
        if used != enc {
            return Err(CoreError::encoding(
                encoding,
                format!("output is only supported as {}", used.name()),
            ));
        }
        if had_errors {
            return Err(CoreError::encoding(encoding, "unmappable character"));
        }
        Ok(bytes.into_owned())
    }

    fn same_encoding(&self, a: &str, b: &str) -> bool {
        match (Self::lookup(a), Self::lookup(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => a.trim().eq_ignore_ascii_case(b.trim()),
        }
    }
}

/// Drop a leading UTF-8 byte order mark.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}
