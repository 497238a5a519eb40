use std::fmt;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const SCHEMA_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
pub const SCHEMA_INSTANCE_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

// -----------------------------------------------------------------------------------------------

/// A name resolved against the namespaces in scope.
///
/// Comparison uses the expanded name only. Every namespaced name orders before every local name,
/// then by namespace URI, then by local name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QName {
    Namespaced { uri: String, local: String },
    Local(String),
}

impl QName {
    pub fn new(uri: impl Into<String>, local: impl Into<String>) -> Self {
        QName::Namespaced {
            uri: uri.into(),
            local: local.into(),
        }
    }

    pub fn local(local: impl Into<String>) -> Self {
        QName::Local(local.into())
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            QName::Namespaced { uri, .. } => Some(uri.as_str()),
            QName::Local(_) => None,
        }
    }

    pub fn local_name(&self) -> &str {
        match self {
            QName::Namespaced { local, .. } => local.as_str(),
            QName::Local(local) => local.as_str(),
        }
    }
}

/// Clark notation, `{uri}local`.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QName::Namespaced { uri, local } => write!(f, "{{{}}}{}", uri, local),
            QName::Local(local) => write!(f, "{}", local),
        }
    }
}

impl From<&str> for QName {
    fn from(value: &str) -> Self {
        QName::local(value)
    }
}

impl From<(&str, &str)> for QName {
    fn from(value: (&str, &str)) -> Self {
        let (uri, local) = value;
        QName::new(uri, local)
    }
}

// -----------------------------------------------------------------------------------------------
