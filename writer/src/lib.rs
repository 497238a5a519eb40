//! Canonical serialization of a `tidyxml_tree` document.
//!
//! Attributes are written in a fixed order and every namespace declaration is written on the
//! document element, sorted by prefix. Everything else is written as parsed.

pub mod error;
pub mod escape;
pub mod order;
mod qnames;

pub use qnames::QNameTable;

use error::Result;
use escape::{escape_attrib, escape_cdata};
use std::io::Write;
use tidyxml_tree::{AttributeValue, Document, Element, NamespaceRegistry, Tag};
use tracing::debug;

const XML_DECLARATION: &[u8] = b"<?xml version='1.0' encoding='UTF-8'?>\n";

// -----------------------------------------------------------------------------------------------

pub trait Serializer {
    fn serialize(&self, tree: &Element, namespaces: &NamespaceRegistry) -> Result<Vec<u8>>;
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    xml_declaration: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            xml_declaration: true,
        }
    }
}

impl WriterOptions {
    /// Writes `<?xml version='1.0' encoding='UTF-8'?>` before the document. On by default.
    pub fn xml_declaration(mut self, value: bool) -> Self {
        self.xml_declaration = value;
        self
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalSerializer {
    options: WriterOptions,
}

impl CanonicalSerializer {
    pub fn new(options: WriterOptions) -> Self {
        CanonicalSerializer { options }
    }

    pub fn write<W: Write>(
        &self,
        out: &mut W,
        tree: &Element,
        namespaces: &NamespaceRegistry,
    ) -> Result<()> {
        let table = QNameTable::new(tree, namespaces);
        let declarations = order::sort_declarations(table.bindings());
        debug!(count = declarations.len(), "writing namespace declarations");

        if self.options.xml_declaration {
            out.write_all(XML_DECLARATION)?;
        }

        write_node(out, tree, &table, Some(declarations.as_slice()))
    }
}

impl Serializer for CanonicalSerializer {
    fn serialize(&self, tree: &Element, namespaces: &NamespaceRegistry) -> Result<Vec<u8>> {
        let mut out = vec![];
        self.write(&mut out, tree, namespaces)?;
        Ok(out)
    }
}

/// Serializes `document` with the default options.
pub fn to_vec(document: &Document) -> Result<Vec<u8>> {
    CanonicalSerializer::default().serialize(document.node(), document.namespaces())
}

// -----------------------------------------------------------------------------------------------

/// Writes `node` and its tail. `declarations` go on the first element reached.
fn write_node<W: Write>(
    out: &mut W,
    node: &Element,
    table: &QNameTable,
    declarations: Option<&[(&str, &str)]>,
) -> Result<()> {
    let text = node.text().unwrap_or_default();

    match node.tag() {
        Tag::Comment => write!(out, "<!--{}-->", text)?,
        Tag::ProcessingInstruction => write!(out, "<?{}?>", text)?,
        Tag::Fragment => {
            out.write_all(escape_cdata(text).as_bytes())?;

            let mut declarations = declarations;
            for child in node.children() {
                write_node(out, child, table, declarations)?;
                if child.name().is_some() {
                    declarations = None;
                }
            }
        }
        Tag::Element(name) => {
            let tag = table.display(name);
            write!(out, "<{}", tag)?;

            for (prefix, uri) in declarations.unwrap_or_default() {
                if prefix.is_empty() {
                    write!(out, " xmlns=\"{}\"", escape_attrib(uri))?;
                } else {
                    write!(out, " xmlns:{}=\"{}\"", prefix, escape_attrib(uri))?;
                }
            }

            for (key, value) in order::sort_attributes(node.attributes()) {
                let value = match value {
                    AttributeValue::QName(v) => table.display(v),
                    AttributeValue::Text(v) => escape_attrib(v),
                };
                write!(out, " {}=\"{}\"", table.display(key), value)?;
            }

            if node.has_content() {
                out.write_all(b">")?;
                out.write_all(escape_cdata(text).as_bytes())?;
                for child in node.children() {
                    write_node(out, child, table, None)?;
                }
                write!(out, "</{}>", tag)?;
            } else {
                out.write_all(b" />")?;
            }
        }
    }

    if let Some(tail) = node.tail() {
        out.write_all(escape_cdata(tail).as_bytes())?;
    }

    Ok(())
}

// -----------------------------------------------------------------------------------------------
