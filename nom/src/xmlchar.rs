use nom::bytes::complete::{take_while, take_while1};
use nom::IResult;

// -----------------------------------------------------------------------------------------------

/// #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
///
/// [\[2\] Char](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Char)
pub fn is_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// (#x20 | #x9 | #xD | #xA)
///
/// [\[3\] S](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-S)
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// ":" | \[A-Z] | "_" | \[a-z] | \[#xC0-#xD6] | \[#xD8-#xF6] | \[#xF8-#x2FF] | \[#x370-#x37D] |
/// \[#x37F-#x1FFF] | \[#x200C-#x200D] | \[#x2070-#x218F] | \[#x2C00-#x2FEF] | \[#x3001-#xD7FF] |
/// \[#xF900-#xFDCF] | \[#xFDF0-#xFFFD] | \[#x10000-#xEFFFF]
///
/// [\[4\] NameStartChar](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NameStartChar)
pub fn is_name_start_char(c: char) -> bool {
    matches!(
        c,
        ':' | 'A'..='Z'
            | '_'
            | 'a'..='z'
            | '\u{C0}'..='\u{D6}'
            | '\u{D8}'..='\u{F6}'
            | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}'
            | '\u{37F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}'
    )
}

/// NameStartChar | "-" | "." | \[0-9] | #xB7 | \[#x0300-#x036F] | \[#x203F-#x2040]
///
/// [\[4a\] NameChar](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NameChar)
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(
            c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// #x20 | #xD | #xA | [a-zA-Z0-9] | [-'()+,./:=?;!*#@$_%]
///
/// [\[13\] PubidChar](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PubidChar)
pub fn is_pubid_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ' ' | '\r'
                | '\n'
                | '-'
                | '\''
                | '('
                | ')'
                | '+'
                | ','
                | '.'
                | '/'
                | ':'
                | '='
                | '?'
                | ';'
                | '!'
                | '*'
                | '#'
                | '@'
                | '$'
                | '_'
                | '%'
        )
}

// -----------------------------------------------------------------------------------------------

/// Recognizes zero or more XML characters not contained in `except`.
pub fn char_except0<'a>(except: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| take_while(|c: char| is_char(c) && !except.contains(c))(input)
}

/// Recognizes one or more XML characters not contained in `except`.
pub fn char_except1<'a>(except: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| take_while1(|c: char| is_char(c) && !except.contains(c))(input)
}

/// Recognizes zero or more public identifier characters not contained in `except`.
pub fn pubid_char_except0<'a>(
    except: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| take_while(|c: char| is_pubid_char(c) && !except.contains(c))(input)
}

/// (\[A-Za-z0-9._] | '-')*
///
/// [\[81\] EncName](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EncName)
pub fn enc_name0(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))(input)
}

// -----------------------------------------------------------------------------------------------
