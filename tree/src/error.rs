use std::fmt;
use tidyxml_parser::nom;

type ParseError<'a> = nom::Err<nom::error::Error<&'a str>>;

// -----------------------------------------------------------------------------------------------

/// Line and column in the parsed text, both starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Locates `at`, which must be a slice of `source`.
    pub fn locate(source: &str, at: &str) -> Self {
        let offset = (at.as_ptr() as usize)
            .saturating_sub(source.as_ptr() as usize)
            .min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map(|v| v.chars().count())
            .unwrap_or_default()
            + 1;
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("syntax error at {position} near `{near}`")]
    Syntax { position: Position, near: String },

    #[error("end tag `</{found}>` does not match its start tag at {position}")]
    MismatchedTag { position: Position, found: String },

    #[error("unexpected end of input at {position}")]
    UnexpectedEof { position: Position },

    #[error("elements nested deeper than {limit} levels at {position}")]
    TooDeep { position: Position, limit: usize },

    #[error("unexpected content after the document element at {position}")]
    TrailingContent { position: Position },

    #[error("unbound namespace prefix `{prefix}` at {position}")]
    UnboundPrefix { prefix: String, position: Position },

    #[error("invalid declaration of namespace prefix `{prefix}` at {position}")]
    InvalidNamespace { prefix: String, position: Position },

    #[error("undefined entity `&{name};` at {position}")]
    UndefinedEntity { name: String, position: Position },

    #[error("recursive reference to entity `&{name};` at {position}")]
    RecursiveEntity { name: String, position: Position },

    #[error("entity `&{name};` at {position} is not supported: {reason}")]
    UnsupportedEntity {
        name: String,
        position: Position,
        reason: &'static str,
    },

    #[error("invalid character reference at {position}")]
    InvalidCharRef { position: Position },
}

impl Error {
    /// Converts a failure of the document grammar into a positioned error.
    pub fn from_nom(source: &str, value: ParseError<'_>) -> Self {
        let e = match value {
            nom::Err::Incomplete(_) => {
                return Error::UnexpectedEof {
                    position: Position::locate(source, &source[source.len()..]),
                }
            }
            nom::Err::Error(e) => e,
            nom::Err::Failure(e) => {
                if e.code == nom::error::ErrorKind::Tag && e.input.starts_with("</") {
                    let found = tidyxml_nom::qname(&e.input[2..])
                        .map(|(_, v)| v.to_string())
                        .unwrap_or_default();
                    return Error::MismatchedTag {
                        position: Position::locate(source, e.input),
                        found,
                    };
                }
                if e.code == nom::error::ErrorKind::TooLarge {
                    return Error::TooDeep {
                        position: Position::locate(source, e.input),
                        limit: tidyxml_parser::MAX_DEPTH,
                    };
                }
                e
            }
        };

        let position = Position::locate(source, e.input);
        if e.input.is_empty() {
            Error::UnexpectedEof { position }
        } else {
            let near = e
                .input
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(20)
                .collect();
            Error::Syntax { position, near }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_locate() {
        let source = "<a>\n  <b>\n</a>";
        assert_eq!(
            Position { line: 1, column: 1 },
            Position::locate(source, source)
        );
        assert_eq!(
            Position { line: 2, column: 3 },
            Position::locate(source, &source[6..])
        );
        assert_eq!(
            Position { line: 3, column: 5 },
            Position::locate(source, &source[source.len()..])
        );
    }

    #[test]
    fn test_from_nom() {
        let source = "<a><b></a>";
        let err = tidyxml_parser::document(source).err().unwrap();
        assert_eq!(
            Error::MismatchedTag {
                position: Position { line: 1, column: 7 },
                found: "a".to_string(),
            },
            Error::from_nom(source, err)
        );

        let source = "<a>";
        let err = tidyxml_parser::document(source).err().unwrap();
        assert_eq!(
            Error::UnexpectedEof {
                position: Position { line: 1, column: 4 },
            },
            Error::from_nom(source, err)
        );

        let source = format!("{}\n<b/>", "<a>".repeat(tidyxml_parser::MAX_DEPTH));
        let err = tidyxml_parser::document(&source).err().unwrap();
        assert_eq!(
            Error::TooDeep {
                position: Position { line: 2, column: 1 },
                limit: tidyxml_parser::MAX_DEPTH,
            },
            Error::from_nom(&source, err)
        );
    }
}
