use indexmap::IndexMap;
use std::borrow::Cow;
use std::iter;
use tidyxml_tree::qname::XML_NAMESPACE;
use tidyxml_tree::{AttributeValue, Element, NamespaceRegistry, QName};
use tracing::debug;

// -----------------------------------------------------------------------------------------------

/// The prefix each namespace URI is written with.
///
/// Registered bindings are kept. A URI the tree uses without a registered prefix gets a
/// generated `ns0`, `ns1`, ... prefix. The default namespace is moved to a generated prefix
/// when an empty prefix could not express every name: an attribute in that namespace, or an
/// unqualified element name or qualified name value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QNameTable {
    prefixes: IndexMap<String, String>,
}

impl QNameTable {
    pub fn new(tree: &Element, namespaces: &NamespaceRegistry) -> Self {
        let mut prefixes = IndexMap::new();
        for (prefix, uri) in namespaces.bindings() {
            if uri != XML_NAMESPACE {
                prefixes.insert(uri.to_string(), prefix.to_string());
            }
        }

        let mut table = QNameTable { prefixes };
        let mut next = 0;

        if let Some(uri) = namespaces.default_namespace() {
            if needs_prefix(tree, uri) {
                let prefix = table.generate(&mut next);
                debug!(uri, prefix = prefix.as_str(), "moved default namespace");
                table.prefixes.insert(uri.to_string(), prefix);
            }
        }

        for node in tree.iter() {
            for uri in names(node).filter_map(QName::namespace) {
                if uri != XML_NAMESPACE && !table.prefixes.contains_key(uri) {
                    let prefix = table.generate(&mut next);
                    debug!(uri, prefix = prefix.as_str(), "generated namespace prefix");
                    table.prefixes.insert(uri.to_string(), prefix);
                }
            }
        }

        table
    }

    /// `prefix:local`, or `local` alone for the default namespace and unqualified names.
    pub fn display<'a>(&self, name: &'a QName) -> Cow<'a, str> {
        match name {
            QName::Namespaced { uri, local } => match self.prefix(uri) {
                Some(prefix) if !prefix.is_empty() => Cow::Owned(format!("{}:{}", prefix, local)),
                _ => Cow::Borrowed(local.as_str()),
            },
            QName::Local(local) => Cow::Borrowed(local.as_str()),
        }
    }

    pub fn prefix(&self, uri: &str) -> Option<&str> {
        if uri == XML_NAMESPACE {
            return Some("xml");
        }

        self.prefixes.get(uri).map(String::as_str)
    }

    /// Every `(prefix, uri)` binding to declare.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(uri, prefix)| (prefix.as_str(), uri.as_str()))
    }

    fn generate(&self, next: &mut usize) -> String {
        loop {
            let prefix = format!("ns{}", next);
            *next += 1;
            if !self.prefixes.values().any(|v| *v == prefix) {
                return prefix;
            }
        }
    }
}

/// The names of `node`, its attributes and its qualified name values.
fn names(node: &Element) -> impl Iterator<Item = &QName> {
    node.name().into_iter().chain(
        node.attributes()
            .iter()
            .flat_map(|(name, value)| iter::once(name).chain(qname_value(value))),
    )
}

fn qname_value(value: &AttributeValue) -> Option<&QName> {
    match value {
        AttributeValue::QName(v) => Some(v),
        AttributeValue::Text(_) => None,
    }
}

fn needs_prefix(tree: &Element, default: &str) -> bool {
    tree.iter().any(|node| {
        matches!(node.name(), Some(QName::Local(_)))
            || node.attributes().iter().any(|(name, value)| {
                name.namespace() == Some(default)
                    || matches!(qname_value(value), Some(QName::Local(_)))
            })
    })
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table(source: &str) -> QNameTable {
        let document = tidyxml_tree::parse_str(source).unwrap();
        QNameTable::new(document.node(), document.namespaces())
    }

    #[test]
    fn test_display() {
        let table = table("<p:a xmlns:p='urn:p' xmlns='urn:d'><b xml:lang='en'/></p:a>");
        assert_eq!("p:a", table.display(&QName::new("urn:p", "a")));
        assert_eq!("b", table.display(&QName::new("urn:d", "b")));
        assert_eq!("xml:lang", table.display(&QName::new(XML_NAMESPACE, "lang")));
        assert_eq!("c", table.display(&QName::local("c")));
        assert_eq!(
            vec![("p", "urn:p"), ("", "urn:d")],
            table.bindings().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_default_moved_for_attribute() {
        let table = table("<a xmlns:q='urn:d' xmlns='urn:d' q:c='1'/>");
        assert_eq!(Some("ns0"), table.prefix("urn:d"));
        assert_eq!("ns0:a", table.display(&QName::new("urn:d", "a")));
        assert_eq!("ns0:c", table.display(&QName::new("urn:d", "c")));
    }

    #[test]
    fn test_default_moved_for_local_name() {
        let table = table("<a xmlns='urn:d'><b xmlns=''/></a>");
        assert_eq!(Some("ns0"), table.prefix("urn:d"));
        assert_eq!("b", table.display(&QName::local("b")));
    }

    #[test]
    fn test_generated_prefix() {
        let table =
            table("<r xmlns:ns0='urn:0'><a:x xmlns:a='urn:1'/><a:y xmlns:a='urn:2'/></r>");
        assert_eq!(Some("ns0"), table.prefix("urn:0"));
        assert_eq!(Some("a"), table.prefix("urn:2"));
        assert_eq!(Some("ns1"), table.prefix("urn:1"));
    }
}
