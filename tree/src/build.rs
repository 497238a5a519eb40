//! Turns the syntax model into the tree.
//!
//! Every namespace declaration of the document is collected first, then the tree is built with
//! names resolved against the declarations in scope.

use crate::entity::{Context, Entities};
use crate::error::{Error, Position, Result};
use crate::namespace::{NamespaceRegistry, Scope};
use crate::node::{AttributeValue, Document, Element};
use crate::qname::{QName, SCHEMA_INSTANCE_NAMESPACE, SCHEMA_NAMESPACE, XML_NAMESPACE};
use indexmap::IndexMap;
use tidyxml_nom::xmlchar;
use tidyxml_parser::model as parser;
use tracing::{debug, trace};

const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Unprefixed attributes of schema components whose values are qualified names.
const SCHEMA_QNAME_ATTRIBUTES: [&str; 6] =
    ["base", "itemType", "ref", "refer", "substitutionGroup", "type"];

// -----------------------------------------------------------------------------------------------

pub(crate) fn build<'a>(source: &'a str, document: &'a parser::Document<'a>) -> Result<Document> {
    let mut builder = Builder {
        source,
        entities: Entities::new(source, document.prolog.declaration_doc.as_ref()),
        scope: Scope::default(),
    };

    let namespaces = builder.namespaces(&document.element)?;
    debug!(count = namespaces.len(), "registered namespaces");

    builder.document(document, namespaces)
}

// -----------------------------------------------------------------------------------------------

struct Builder<'a> {
    source: &'a str,
    entities: Entities<'a>,
    scope: Scope,
}

impl<'a> Builder<'a> {
    /// Registers every namespace declared in the document, in order of first declaration.
    fn namespaces(&self, root: &'a parser::Element<'a>) -> Result<NamespaceRegistry> {
        let mut found = IndexMap::new();
        self.scan(root, &mut found)?;

        let mut registry = NamespaceRegistry::new();
        for (prefix, uri) in found.iter() {
            registry.register(prefix, uri);
        }

        Ok(registry)
    }

    fn scan(
        &self,
        element: &'a parser::Element<'a>,
        found: &mut IndexMap<String, String>,
    ) -> Result<()> {
        for (prefix, uri) in self.declarations(element)? {
            if !uri.is_empty() && prefix != "xml" {
                found.insert(prefix, uri);
            }
        }

        for cell in element.content.iter().flat_map(|v| v.children.iter()) {
            if let parser::Contents::Element(child) = &cell.child {
                self.scan(child, found)?;
            }
        }

        Ok(())
    }

    // -------------------------------------------------------------------------------------------

    fn document(
        &mut self,
        value: &'a parser::Document<'a>,
        namespaces: NamespaceRegistry,
    ) -> Result<Document> {
        let mut node = Element::fragment();

        for misc in value.prolog.heads.iter().chain(value.prolog.tails.iter()) {
            self.misc(&mut node, misc);
        }

        let root = node.children().len();
        let element = self.element(&value.element)?;
        node.push(element);

        for misc in value.miscs.iter() {
            self.misc(&mut node, misc);
        }

        Ok(Document::new(node, root, namespaces))
    }

    /// Top-level comments and processing instructions. White space before the first node has
    /// nowhere to go and is dropped.
    fn misc(&self, node: &mut Element, value: &parser::Misc<'_>) {
        match value {
            parser::Misc::Comment(v) => node.push(Element::comment(v.value)),
            parser::Misc::PI(v) => node.push(processing_instruction(v)),
            parser::Misc::Whitespace(v) => {
                if !node.children().is_empty() {
                    node.push_text(v);
                }
            }
        }
    }

    fn element(&mut self, value: &'a parser::Element<'a>) -> Result<Element> {
        let declarations = self.declarations(value)?;
        trace!(name = %value.name, count = declarations.len(), "entering element");

        self.scope.push(declarations);
        let element = self.element_in_scope(value);
        self.scope.pop();

        element
    }

    fn element_in_scope(&mut self, value: &'a parser::Element<'a>) -> Result<Element> {
        let name = self.resolve(&value.name, true)?;
        let mut element = Element::new(name.clone());

        for attribute in value.attributes.iter() {
            if let parser::AttributeName::QName(v) = &attribute.name {
                let key = self.resolve(v, false)?;
                let text = self.attribute_value(&attribute.value)?;
                let typed = self.typed_value(&name, &key, text);
                element.set(key, typed);
            }
        }

        let content = match &value.content {
            Some(content) => content,
            None => return Ok(element),
        };

        if let Some(head) = content.head {
            element.push_text(head);
        }

        for cell in content.children.iter() {
            match &cell.child {
                parser::Contents::Element(v) => {
                    let child = self.element(v)?;
                    element.push(child);
                }
                parser::Contents::Reference(v) => {
                    let mut text = String::new();
                    self.entities.expand(v, Context::Content, &mut text)?;
                    element.push_text(&text);
                }
                parser::Contents::CData(v) => element.push_text(v.value),
                parser::Contents::PI(v) => element.push(processing_instruction(v)),
                parser::Contents::Comment(v) => element.push(Element::comment(v.value)),
            }

            if let Some(tail) = cell.tail {
                element.push_text(tail);
            }
        }

        Ok(element)
    }

    // -------------------------------------------------------------------------------------------

    /// The `xmlns` and `xmlns:prefix` attributes of `element` as `(prefix, uri)` pairs.
    fn declarations(&self, element: &'a parser::Element<'a>) -> Result<Vec<(String, String)>> {
        let mut declarations = vec![];

        for attribute in element.attributes.iter() {
            let prefix = match attribute.name {
                parser::AttributeName::DefaultNamespace => "",
                parser::AttributeName::Namespace(v) => v,
                parser::AttributeName::QName(_) => continue,
            };

            let uri = self.attribute_value(&attribute.value)?;
            let valid = match prefix {
                "xml" => uri == XML_NAMESPACE,
                "xmlns" => false,
                "" => uri != XML_NAMESPACE && uri != XMLNS_NAMESPACE,
                _ => !uri.is_empty() && uri != XML_NAMESPACE && uri != XMLNS_NAMESPACE,
            };
            if !valid {
                return Err(Error::InvalidNamespace {
                    prefix: prefix.to_string(),
                    position: self.locate(&element.name),
                });
            }

            declarations.push((prefix.to_string(), uri));
        }

        Ok(declarations)
    }

    /// Resolves a name against the scope. Unprefixed attribute names have no namespace.
    fn resolve(&self, name: &parser::QName<'a>, element: bool) -> Result<QName> {
        match name {
            parser::QName::Prefixed(v) => match self.scope.resolve(v.prefix) {
                Some(uri) => Ok(QName::new(uri, v.local_part)),
                None => Err(Error::UnboundPrefix {
                    prefix: v.prefix.to_string(),
                    position: self.locate(name),
                }),
            },
            parser::QName::Unprefixed(v) => match self.scope.resolve("") {
                Some(uri) if element => Ok(QName::new(uri, *v)),
                _ => Ok(QName::local(*v)),
            },
        }
    }

    /// Attribute value normalization, without the extra steps for non-CDATA types.
    ///
    /// [3.3.3 Attribute-Value Normalization](https://www.w3.org/TR/2008/REC-xml-20081126/#AVNormalize)
    fn attribute_value(&self, values: &[parser::AttributeValue<'a>]) -> Result<String> {
        let mut text = String::new();

        for value in values.iter() {
            match value {
                parser::AttributeValue::Text(v) => text.extend(v.chars().map(|c| {
                    if xmlchar::is_whitespace(c) {
                        ' '
                    } else {
                        c
                    }
                })),
                parser::AttributeValue::Reference(v) => {
                    self.entities.expand(v, Context::Attribute, &mut text)?
                }
            }
        }

        Ok(text)
    }

    /// Resolves the values of attributes known to hold qualified names.
    ///
    /// A value that is not a qualified name or whose prefix is not bound stays text.
    fn typed_value(&self, element: &QName, attribute: &QName, text: String) -> AttributeValue {
        let typed = match attribute {
            QName::Namespaced { uri, local } => uri == SCHEMA_INSTANCE_NAMESPACE && local == "type",
            QName::Local(local) => {
                element.namespace() == Some(SCHEMA_NAMESPACE)
                    && SCHEMA_QNAME_ATTRIBUTES.contains(&local.as_str())
            }
        };
        if !typed {
            return AttributeValue::Text(text);
        }

        let resolved = match tidyxml_nom::qname(text.trim()) {
            Ok(("", parser::QName::Prefixed(v))) => self
                .scope
                .resolve(v.prefix)
                .map(|uri| QName::new(uri, v.local_part)),
            Ok(("", parser::QName::Unprefixed(v))) => match self.scope.resolve("") {
                Some(uri) => Some(QName::new(uri, v)),
                None => Some(QName::local(v)),
            },
            _ => None,
        };

        match resolved {
            Some(name) => AttributeValue::QName(name),
            None => AttributeValue::Text(text),
        }
    }

    fn locate(&self, name: &parser::QName<'a>) -> Position {
        Position::locate(self.source, name.prefix().unwrap_or(name.local_part()))
    }
}

fn processing_instruction(value: &parser::PI<'_>) -> Element {
    match value.value {
        Some(v) => Element::processing_instruction(&format!("{} {}", value.target, v)),
        None => Element::processing_instruction(value.target),
    }
}

// -----------------------------------------------------------------------------------------------
