//! An XML element tree that keeps attributes in document order.

mod build;
pub mod decode;
mod entity;
pub mod error;
pub mod namespace;
pub mod node;
pub mod qname;

pub use namespace::NamespaceRegistry;
pub use node::{AttributeValue, Attributes, Document, Element, Tag};
pub use qname::QName;

use error::{Error, Position, Result};
use tracing::debug;

// -----------------------------------------------------------------------------------------------

/// Parses a document from raw bytes in any encoding `encoding_rs` knows.
pub fn parse(bytes: &[u8]) -> Result<Document> {
    let text = decode::decode(bytes)?;
    parse_str(&text)
}

/// Parses a document from text.
pub fn parse_str(text: &str) -> Result<Document> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let text = decode::normalize_newlines(text);
    let source = text.as_ref();

    let (rest, document) =
        tidyxml_parser::document(source).map_err(|e| Error::from_nom(source, e))?;
    if !rest.is_empty() {
        return Err(Error::TrailingContent {
            position: Position::locate(source, rest),
        });
    }
    debug!(len = source.len(), "parsed document syntax");

    build::build(source, &document)
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let document = parse(b"<?xml version='1.0'?>\r\n<a b='1'>x\r\ny</a>\r\n").unwrap();
        let root = document.root();
        assert_eq!(Some(&QName::local("a")), root.name());
        assert_eq!(Some("x\ny"), root.text());
        assert_eq!(Some("\n"), root.tail());
        assert_eq!(
            Some(&AttributeValue::from("1")),
            root.get(&QName::local("b"))
        );
    }

    #[test]
    fn test_parse_bom() {
        let document = parse_str("\u{FEFF}<a/>").unwrap();
        assert_eq!(Some(&QName::local("a")), document.root().name());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Error::MismatchedTag {
                position: Position { line: 2, column: 4 },
                found: "a".to_string(),
            },
            parse_str("<a>\n<b></a>").unwrap_err()
        );

        assert_eq!(
            Error::TrailingContent {
                position: Position { line: 1, column: 5 },
            },
            parse_str("<a/><b/>").unwrap_err()
        );

        assert!(matches!(
            parse_str("<a>").unwrap_err(),
            Error::UnexpectedEof { .. }
        ));
        assert!(matches!(
            parse_str("").unwrap_err(),
            Error::UnexpectedEof { .. }
        ));
        assert!(matches!(
            parse_str("<a>]]></a>").unwrap_err(),
            Error::Syntax { .. }
        ));
    }

    #[test]
    fn test_parse_deep_nesting() {
        let depth = 100_000;
        let source = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert!(matches!(
            parse_str(&source).unwrap_err(),
            Error::TooDeep { .. }
        ));

        let depth = tidyxml_parser::MAX_DEPTH;
        let source = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert_eq!(depth, parse_str(&source).unwrap().root().iter().count());
    }

    #[test]
    fn test_parse_doctype() {
        let document = parse_str(concat!(
            "<!DOCTYPE a [\n",
            "  <!ELEMENT a (#PCDATA)>\n",
            "  <!ENTITY e 'value'>\n",
            "]>\n",
            "<a t='&e;'>&e;</a>"
        ))
        .unwrap();

        let root = document.root();
        assert_eq!(Some("value"), root.text());
        assert_eq!(
            Some(&AttributeValue::from("value")),
            root.get(&QName::local("t"))
        );
        assert_eq!(1, document.node().children().len());
    }
}
