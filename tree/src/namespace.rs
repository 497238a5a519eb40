use crate::qname::XML_NAMESPACE;
use indexmap::IndexMap;
use tracing::trace;

// -----------------------------------------------------------------------------------------------

/// Prefixes registered for namespace URIs, one prefix per URI and one URI per prefix.
///
/// The empty prefix stands for the default namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceRegistry {
    prefixes: IndexMap<String, String>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        NamespaceRegistry::default()
    }

    /// Binds `prefix` to `uri`, dropping any earlier binding of either.
    pub fn register(&mut self, prefix: &str, uri: &str) {
        self.prefixes.retain(|u, p| u.as_str() != uri && p.as_str() != prefix);
        self.prefixes.insert(uri.to_string(), prefix.to_string());
        trace!(prefix, uri, "registered namespace");
    }

    pub fn prefix(&self, uri: &str) -> Option<&str> {
        if uri == XML_NAMESPACE {
            return Some("xml");
        }

        self.prefixes.get(uri).map(String::as_str)
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.bindings().find(|(p, _)| *p == prefix).map(|(_, u)| u)
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.uri("")
    }

    /// `(prefix, uri)` pairs in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(uri, prefix)| (prefix.as_str(), uri.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

// -----------------------------------------------------------------------------------------------

/// Namespace declarations in scope while walking the tree, innermost last.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    frames: Vec<Vec<(String, String)>>,
}

impl Scope {
    pub fn push(&mut self, bindings: Vec<(String, String)>) {
        self.frames.push(bindings);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// The URI bound to `prefix`. An empty default namespace declaration undeclares it.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }

        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}

// -----------------------------------------------------------------------------------------------
