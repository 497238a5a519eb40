//! Turns raw input bytes into the text the grammar runs on.
//!
//! The encoding is taken from a byte order mark when there is one, otherwise from the `encoding`
//! pseudo attribute of the XML declaration, and UTF-8 is assumed when neither is present.

use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::borrow::Cow;
use tracing::debug;

// -----------------------------------------------------------------------------------------------

/// Decodes `bytes` into UTF-8 text.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let (encoding, bom) = sniff(bytes);
    let content = &bytes[bom..];

    if encoding != UTF_8 {
        return transcode(content, encoding);
    }

    match std::str::from_utf8(content) {
        Ok(text) => match declared_label(text) {
            Some(label) => match lookup(label)? {
                declared if is_utf(declared) => Ok(text.to_string()),
                declared => transcode(content, declared),
            },
            None => Ok(text.to_string()),
        },
        Err(_) => {
            let head = String::from_utf8_lossy(&content[..content.len().min(512)]);
            match declared_label(&head).map(lookup).transpose()? {
                Some(declared) if !is_utf(declared) => transcode(content, declared),
                _ => Err(Error::Encoding("input is not valid UTF-8".to_string())),
            }
        }
    }
}

/// Applies end-of-line handling: `\r\n` and a lone `\r` both become `\n`.
///
/// [2.11 End-of-Line Handling](https://www.w3.org/TR/2008/REC-xml-20081126/#sec-line-ends)
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

// -----------------------------------------------------------------------------------------------

fn sniff(bytes: &[u8]) -> (&'static Encoding, usize) {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => (UTF_8, 3),
        [0xFE, 0xFF, ..] => (UTF_16BE, 2),
        [0xFF, 0xFE, ..] => (UTF_16LE, 2),
        _ => (UTF_8, 0),
    }
}

fn transcode(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    debug!(encoding = encoding.name(), "transcoding input");
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| {
            Error::Encoding(format!(
                "malformed byte sequence for encoding {}",
                encoding.name()
            ))
        })
}

/// Finds the label of the encoding named by the XML declaration at the start of `text`.
fn declared_label(text: &str) -> Option<&str> {
    let decl = text.strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];
    let rest = decl[decl.find("encoding")? + "encoding".len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[1..];
    rest.find(quote).map(|end| &rest[..end])
}

fn lookup(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::Encoding(format!("unsupported encoding: {}", label)))
}

fn is_utf(encoding: &'static Encoding) -> bool {
    encoding == UTF_8 || encoding == UTF_16LE || encoding == UTF_16BE
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!("<a>é</a>", decode("<a>é</a>".as_bytes()).unwrap());
        assert_eq!("<a/>", decode(b"\xEF\xBB\xBF<a/>").unwrap());
        assert_eq!(
            "<?xml version='1.0' encoding='utf-8'?><a/>",
            decode(b"<?xml version='1.0' encoding='utf-8'?><a/>").unwrap()
        );
    }

    #[test]
    fn test_decode_declared() {
        let bytes = b"<?xml version='1.0' encoding='ISO-8859-1'?><a>\xE9</a>";
        assert_eq!(
            "<?xml version='1.0' encoding='ISO-8859-1'?><a>é</a>",
            decode(bytes).unwrap()
        );
    }

    #[test]
    fn test_decode_utf16() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>é</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!("<a>é</a>", decode(&bytes).unwrap());
    }

    #[test]
    fn test_decode_invalid() {
        assert_eq!(
            Error::Encoding("input is not valid UTF-8".to_string()),
            decode(b"<a>\xE9</a>").unwrap_err()
        );
        assert_eq!(
            Error::Encoding("unsupported encoding: no-such".to_string()),
            decode(b"<?xml version='1.0' encoding='no-such'?><a/>").unwrap_err()
        );
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!("a\nb\nc\n", normalize_newlines("a\r\nb\rc\n"));
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
    }
}
