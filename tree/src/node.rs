use crate::namespace::NamespaceRegistry;
use crate::qname::QName;
use indexmap::IndexMap;

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Element(QName),
    Comment,
    ProcessingInstruction,
    /// No tag of its own. Only the text and the children are rendered.
    Fragment,
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    /// A value holding a reference to a qualified name, such as `xsi:type="xs:string"`.
    QName(QName),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<QName> for AttributeValue {
    fn from(value: QName) -> Self {
        AttributeValue::QName(value)
    }
}

/// Attributes in the order they were first set.
pub type Attributes = IndexMap<QName, AttributeValue>;

// -----------------------------------------------------------------------------------------------

/// A node of the tree.
///
/// Character data is held the ElementTree way: `text` is the data before the first child and
/// each child's `tail` is the data following it up to the next sibling.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    tag: Tag,
    attributes: Attributes,
    text: Option<String>,
    tail: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: QName) -> Self {
        Element::with_tag(Tag::Element(name))
    }

    pub fn comment(text: &str) -> Self {
        Element::with_tag(Tag::Comment).set_text(text)
    }

    pub fn processing_instruction(text: &str) -> Self {
        Element::with_tag(Tag::ProcessingInstruction).set_text(text)
    }

    pub fn fragment() -> Self {
        Element::with_tag(Tag::Fragment)
    }

    fn with_tag(tag: Tag) -> Self {
        Element {
            tag,
            attributes: Attributes::new(),
            text: None,
            tail: None,
            children: vec![],
        }
    }

    pub fn set_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn set_tail(mut self, tail: &str) -> Self {
        self.tail = Some(tail.to_string());
        self
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// The element name, `None` for comments, processing instructions and fragments.
    pub fn name(&self) -> Option<&QName> {
        match &self.tag {
            Tag::Element(name) => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn get(&self, name: &QName) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Sets an attribute. Setting an existing name replaces its value and keeps its position.
    pub fn set(&mut self, name: QName, value: AttributeValue) {
        self.attributes.insert(name, value);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        self.children.as_slice()
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends character data after everything already in this element.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let slot = match self.children.last_mut() {
            Some(last) => &mut last.tail,
            None => &mut self.text,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    /// True when the element has text or children.
    pub fn has_content(&self) -> bool {
        self.text.as_deref().map_or(false, |v| !v.is_empty()) || !self.children.is_empty()
    }

    /// This node and all of its descendants in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

// -----------------------------------------------------------------------------------------------

pub struct Iter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// -----------------------------------------------------------------------------------------------

/// A parsed document.
///
/// The top-level comments and processing instructions and the document element are held as the
/// children of a fragment node, in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    node: Element,
    root: usize,
    namespaces: NamespaceRegistry,
}

impl Document {
    pub(crate) fn new(node: Element, root: usize, namespaces: NamespaceRegistry) -> Self {
        Document {
            node,
            root,
            namespaces,
        }
    }

    /// The document element.
    pub fn root(&self) -> &Element {
        &self.node.children[self.root]
    }

    /// The fragment node holding every top-level node.
    pub fn node(&self) -> &Element {
        &self.node
    }

    /// Every namespace binding declared in the document.
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text() {
        let mut element = Element::new(QName::from("a"));
        element.push_text("");
        assert_eq!(None, element.text());

        element.push_text("x");
        element.push_text("y");
        assert_eq!(Some("xy"), element.text());

        element.push(Element::new(QName::from("b")));
        element.push_text("z");
        assert_eq!(Some("xy"), element.text());
        assert_eq!(Some("z"), element.children()[0].tail());
    }

    #[test]
    fn test_set_keeps_position() {
        let mut element = Element::new(QName::from("a"));
        element.set(QName::from("x"), AttributeValue::from("1"));
        element.set(QName::from("y"), AttributeValue::from("2"));
        element.set(QName::from("x"), AttributeValue::from("3"));

        let attributes: Vec<_> = element.attributes().iter().collect();
        assert_eq!(
            vec![
                (&QName::from("x"), &AttributeValue::from("3")),
                (&QName::from("y"), &AttributeValue::from("2")),
            ],
            attributes
        );
    }

    #[test]
    fn test_has_content() {
        assert!(!Element::new(QName::from("a")).has_content());
        assert!(!Element::new(QName::from("a")).set_text("").has_content());
        assert!(Element::new(QName::from("a")).set_text("x").has_content());

        let mut element = Element::new(QName::from("a"));
        element.push(Element::comment("c"));
        assert!(element.has_content());
    }

    #[test]
    fn test_iter() {
        let mut b = Element::new(QName::from("b"));
        b.push(Element::new(QName::from("c")));
        let mut a = Element::new(QName::from("a"));
        a.push(b);
        a.push(Element::new(QName::from("d")));

        let names: Vec<_> = a
            .iter()
            .filter_map(|v| v.name())
            .map(|v| v.local_name())
            .collect();
        assert_eq!(vec!["a", "b", "c", "d"], names);
    }
}
