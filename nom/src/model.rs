use std::fmt;

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefixedName<'a> {
    pub prefix: &'a str,
    pub local_part: &'a str,
}

impl<'a> From<(&'a str, &'a str)> for PrefixedName<'a> {
    fn from(value: (&'a str, &'a str)) -> Self {
        let (prefix, local_part) = value;
        PrefixedName { prefix, local_part }
    }
}

// -----------------------------------------------------------------------------------------------

/// A name as written in the source, before its prefix is bound to a namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QName<'a> {
    Prefixed(PrefixedName<'a>),
    Unprefixed(&'a str),
}

impl<'a> QName<'a> {
    pub fn prefix(&self) -> Option<&'a str> {
        match self {
            QName::Prefixed(v) => Some(v.prefix),
            QName::Unprefixed(_) => None,
        }
    }

    pub fn local_part(&self) -> &'a str {
        match self {
            QName::Prefixed(v) => v.local_part,
            QName::Unprefixed(v) => v,
        }
    }
}

impl<'a> Default for QName<'a> {
    fn default() -> Self {
        QName::Unprefixed("")
    }
}

impl<'a> fmt::Display for QName<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QName::Prefixed(v) => write!(f, "{}:{}", v.prefix, v.local_part),
            QName::Unprefixed(v) => write!(f, "{}", v),
        }
    }
}

impl<'a> From<PrefixedName<'a>> for QName<'a> {
    fn from(value: PrefixedName<'a>) -> Self {
        QName::Prefixed(value)
    }
}

impl<'a> From<&'a str> for QName<'a> {
    fn from(value: &'a str) -> Self {
        QName::Unprefixed(value)
    }
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_parts() {
        let name = QName::from(PrefixedName::from(("xs", "element")));
        assert_eq!(Some("xs"), name.prefix());
        assert_eq!("element", name.local_part());
        assert_eq!("xs:element", name.to_string());

        let name = QName::from("root");
        assert_eq!(None, name.prefix());
        assert_eq!("root", name.local_part());
        assert_eq!("root", name.to_string());
    }
}
