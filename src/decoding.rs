//! Byte-to-text decoding shared by local files and fetched pages.
//!
//! The charset comes from, in order: the Content-Type charset parameter (when
//! there is one), `<meta charset>`, `<meta http-equiv="Content-Type">`, and
//! finally a `chardetng` guess over the first 4KB.

use encoding_rs::Encoding;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Bytes scanned for meta declarations and by the detector.
const SNIFF_LENGTH: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed {encoding} byte sequence")]
    Malformed { encoding: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    Utf8,
    Windows1252,
    ShiftJis,
    Gb2312,
    Big5,
    /// Any other WHATWG encoding, by canonical name.
    Other(String),
}

impl Charset {
    pub fn from_encoding(encoding: &'static Encoding) -> Self {
        use std::ptr;

        if ptr::eq(encoding, encoding_rs::UTF_8) {
            Self::Utf8
        } else if ptr::eq(encoding, encoding_rs::WINDOWS_1252) {
            Self::Windows1252
        } else if ptr::eq(encoding, encoding_rs::SHIFT_JIS) {
            Self::ShiftJis
        } else if ptr::eq(encoding, encoding_rs::GBK) || ptr::eq(encoding, encoding_rs::GB18030) {
            Self::Gb2312
        } else if ptr::eq(encoding, encoding_rs::BIG5) {
            Self::Big5
        } else {
            Self::Other(encoding.name().to_string())
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        match self {
            Self::Utf8 => encoding_rs::UTF_8,
            Self::Windows1252 => encoding_rs::WINDOWS_1252,
            Self::ShiftJis => encoding_rs::SHIFT_JIS,
            Self::Gb2312 => encoding_rs::GBK,
            Self::Big5 => encoding_rs::BIG5,
            Self::Other(name) => Encoding::for_label(name.as_bytes()).unwrap_or(encoding_rs::UTF_8),
        }
    }
}

/// Picks the charset for `bytes`, consulting `content_type` first when given.
pub fn detect_charset(content_type: Option<&str>, bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(encoding) = content_type.and_then(|ct| label_from(&CHARSET_REGEX, ct)) {
        return Charset::from_encoding(encoding);
    }

    // 2. Meta declarations near the top of the document
    let sniff = &bytes[..bytes.len().min(SNIFF_LENGTH)];
    let head = String::from_utf8_lossy(sniff);
    if let Some(encoding) = label_from(&META_CHARSET_REGEX, &head)
        .or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &head))
    {
        return Charset::from_encoding(encoding);
    }

    // 3. Heuristic guess
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(sniff, bytes.len() <= SNIFF_LENGTH);
    Charset::from_encoding(detector.guess(None, true))
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Decodes `bytes` strictly: any malformed sequence is an error.
pub fn decode(bytes: &[u8], charset: &Charset) -> Result<String, DecodeError> {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name(),
        });
    }

    Ok(decoded.into_owned())
}

/// Detects and decodes in one step.
pub fn decode_html(
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<(String, Charset), DecodeError> {
    let charset = detect_charset(content_type, bytes);
    let text = decode(bytes, &charset)?;
    Ok((text, charset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_charset_from_content_type() {
        let body = b"<html><head><title>Test</title></head></html>";
        let charset = detect_charset(Some("text/html; charset=utf-8"), body);
        assert_eq!(charset, Charset::Utf8);
    }

    #[test]
    fn test_detect_charset_from_meta_tag() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";
        // encoding_rs maps ISO-8859-1 onto its superset windows-1252
        assert_eq!(detect_charset(None, body), Charset::Windows1252);
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><title>Test</title></head></html>";
        assert_eq!(detect_charset(Some("text/html"), body), Charset::Windows1252);
    }

    #[test]
    fn test_other_encodings_keep_their_name() {
        let body = b"<meta charset=\"koi8-r\">";
        let charset = detect_charset(None, body);
        assert_eq!(charset, Charset::Other("KOI8-R".to_string()));
        assert_eq!(charset.encoding(), encoding_rs::KOI8_R);
    }

    #[test]
    fn test_decode_utf8() {
        let decoded = decode("Hello, 世界!".as_bytes(), &Charset::Utf8).unwrap();
        assert_eq!(decoded, "Hello, 世界!");
    }

    #[test]
    fn test_decode_latin1_page() {
        let body = b"<meta charset=\"latin1\"><p>caf\xe9</p>";
        let (text, charset) = decode_html(None, body).unwrap();
        assert_eq!(charset, Charset::Windows1252);
        assert!(text.contains("café"));
    }

    #[test]
    fn test_malformed_utf8_is_an_error() {
        let body = b"<meta charset=\"utf-8\"><p>\xff\xfe</p>";
        assert_eq!(
            decode_html(None, body),
            Err(DecodeError::Malformed { encoding: "UTF-8" })
        );
    }
}
