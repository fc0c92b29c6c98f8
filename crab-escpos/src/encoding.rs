//! Character conversion for thermal printers
//!
//! Printers only understand their active 8-bit code table. Text arrives as
//! UTF-8 and must be re-encoded before it is written:
//! - Latin printers use ISO-8859-15 (the table selected by `init`)
//! - Chinese printers use GBK (double-byte)
//!
//! Conversion is strict: a character the target table cannot represent is
//! an error, never a replacement byte.

use encoding_rs::{EncoderResult, Encoding};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::error::EncodingError;

/// Output of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Bytes in the printer's code page
    pub bytes: Vec<u8>,
    /// Number of UTF-8 input bytes consumed
    pub count: usize,
}

/// Converts UTF-8 text to a printer code page
#[enum_dispatch]
pub trait CharacterConverter {
    /// Encode `text`, failing on the first unrepresentable character
    fn encode(&self, text: &str) -> Result<Encoded, EncodingError>;
}

/// ISO-8859-15 (Latin-9) single-byte converter
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin9Converter;

impl CharacterConverter for Latin9Converter {
    fn encode(&self, text: &str) -> Result<Encoded, EncodingError> {
        encode_strict(encoding_rs::ISO_8859_15, text)
    }
}

/// GBK double-byte converter
#[derive(Debug, Clone, Copy, Default)]
pub struct GbkConverter;

impl CharacterConverter for GbkConverter {
    fn encode(&self, text: &str) -> Result<Encoded, EncodingError> {
        encode_strict(encoding_rs::GBK, text)
    }
}

/// Built-in converters, dispatched statically
#[enum_dispatch(CharacterConverter)]
#[derive(Debug, Clone, Copy)]
pub enum Converter {
    Latin9(Latin9Converter),
    Gbk(GbkConverter),
}

impl Default for Converter {
    fn default() -> Self {
        Converter::Latin9(Latin9Converter)
    }
}

/// Printer code page, as named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodePage {
    #[default]
    Latin9,
    Gbk,
}

impl CodePage {
    /// Parse a configuration value (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin9" | "iso-8859-15" | "iso8859-15" => Some(CodePage::Latin9),
            "gbk" => Some(CodePage::Gbk),
            _ => None,
        }
    }

    /// The converter for this code page
    pub fn converter(self) -> Converter {
        match self {
            CodePage::Latin9 => Latin9Converter.into(),
            CodePage::Gbk => GbkConverter.into(),
        }
    }
}

fn encode_strict(encoding: &'static Encoding, text: &str) -> Result<Encoded, EncodingError> {
    let mut encoder = encoding.new_encoder();
    let capacity = encoder
        .max_buffer_length_from_utf8_without_replacement(text.len())
        .ok_or(EncodingError::InputTooLarge(text.len()))?;

    let mut bytes = vec![0u8; capacity];
    let (result, read, written) =
        encoder.encode_from_utf8_without_replacement(text, &mut bytes, true);

    match result {
        EncoderResult::InputEmpty => {
            bytes.truncate(written);
            Ok(Encoded { bytes, count: read })
        }
        EncoderResult::Unmappable(ch) => Err(EncodingError::Unmappable {
            ch,
            encoding: encoding.name(),
        }),
        // capacity is the encoder's own worst case
        EncoderResult::OutputFull => Err(EncodingError::InputTooLarge(text.len())),
    }
}

/// Entity substitutions applied to encoded text, in order.
///
/// `&amp;` must stay last so `&amp;lt;` decodes to `&lt;` and not `<`.
const TEXT_REPLACEMENTS: &[(&[u8], &[u8])] = &[
    (b"&#9;", b"\x09"),
    (b"&#x9;", b"\x09"),
    (b"&#10;", b"\n"),
    (b"&#xA;", b"\n"),
    (b"&apos;", b"'"),
    (b"&quot;", b"\""),
    (b"&gt;", b">"),
    (b"&lt;", b"<"),
    (b"&amp;", b"&"),
];

/// Decode the entity table in already-encoded text
///
/// Runs on code page bytes, after conversion. `&` is never a GBK lead or
/// trail byte, so matches cannot straddle a double-byte character.
pub fn substitute(bytes: Vec<u8>) -> Vec<u8> {
    if !bytes.contains(&b'&') {
        return bytes;
    }
    TEXT_REPLACEMENTS
        .iter()
        .fold(bytes, |acc, (from, to)| replace_all(&acc, from, to))
}

fn replace_all(haystack: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin9_encode() {
        let enc = Latin9Converter.encode("Café €5").unwrap();
        assert_eq!(enc.bytes, vec![b'C', b'a', b'f', 0xE9, b' ', 0xA4, b'5']);
        assert_eq!(enc.count, "Café €5".len());
    }

    #[test]
    fn test_latin9_unmappable() {
        let err = Latin9Converter.encode("ok 你").unwrap_err();
        assert_eq!(
            err,
            EncodingError::Unmappable {
                ch: '你',
                encoding: "ISO-8859-15"
            }
        );
    }

    #[test]
    fn test_gbk_encode() {
        let enc = GbkConverter.encode("AB中文").unwrap();
        assert_eq!(enc.bytes, vec![b'A', b'B', 0xD6, 0xD0, 0xCE, 0xC4]);
    }

    #[test]
    fn test_gbk_unmappable() {
        assert!(matches!(
            GbkConverter.encode("🦀"),
            Err(EncodingError::Unmappable { ch: '🦀', .. })
        ));
    }

    #[test]
    fn test_code_page_converter() {
        assert!(matches!(CodePage::Gbk.converter(), Converter::Gbk(_)));
        assert!(matches!(CodePage::default().converter(), Converter::Latin9(_)));
        assert_eq!(CodePage::parse(" GBK "), Some(CodePage::Gbk));
        assert_eq!(CodePage::parse("iso-8859-15"), Some(CodePage::Latin9));
        assert_eq!(CodePage::parse("cp437"), None);
    }

    #[test]
    fn test_substitute_entities() {
        assert_eq!(substitute(b"a&lt;b&gt;c".to_vec()), b"a<b>c");
        assert_eq!(substitute(b"&quot;x&apos;".to_vec()), b"\"x'");
        assert_eq!(substitute(b"a&#9;b&#xA;".to_vec()), b"a\tb\n");
    }

    #[test]
    fn test_substitute_amp_last() {
        assert_eq!(substitute(b"&amp;lt;".to_vec()), b"&lt;");
        assert_eq!(substitute(b"fish &amp; chips".to_vec()), b"fish & chips");
    }

    #[test]
    fn test_substitute_passthrough() {
        let plain = vec![0xD6, 0xD0, b'x', b'&'];
        assert_eq!(substitute(plain.clone()), plain);
    }
}
