use std::borrow::Cow;

/// Escapes character data.
///
/// A carriage return can only come from a character reference and is written back as one.
pub fn escape_cdata(text: &str) -> Cow<'_, str> {
    escape(text, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

/// Escapes a value for a double quoted attribute.
///
/// White space other than a space is written as a character reference so that it survives
/// attribute value normalization when read back.
pub fn escape_attrib(text: &str) -> Cow<'_, str> {
    escape(text, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\r' => Some("&#13;"),
        '\n' => Some("&#10;"),
        '\t' => Some("&#09;"),
        _ => None,
    })
}

fn escape(text: &str, entity: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !text.chars().any(|c| entity(c).is_some()) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match entity(c) {
            Some(v) => escaped.push_str(v),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cdata() {
        assert_eq!("a &amp; b &lt;c&gt; \"'\n\t&#13;", escape_cdata("a & b <c> \"'\n\t\r"));
        assert!(matches!(escape_cdata("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_escape_attrib() {
        assert_eq!(
            "&amp;&lt;&gt;&quot;'&#10;&#09;&#13; ",
            escape_attrib("&<>\"'\n\t\r ")
        );
        assert!(matches!(escape_attrib("it's"), Cow::Borrowed("it's")));
    }
}
