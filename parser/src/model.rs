pub use tidyxml_nom::model::{PrefixedName, QName};

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct Attribute<'a> {
    pub name: AttributeName<'a>,
    pub value: Vec<AttributeValue<'a>>,
}

impl<'a> From<(AttributeName<'a>, Vec<AttributeValue<'a>>)> for Attribute<'a> {
    fn from(value: (AttributeName<'a>, Vec<AttributeValue<'a>>)) -> Self {
        let (name, value) = value;
        Attribute { name, value }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum AttributeName<'a> {
    DefaultNamespace,
    Namespace(&'a str),
    QName(QName<'a>),
}

impl<'a> From<QName<'a>> for AttributeName<'a> {
    fn from(value: QName<'a>) -> Self {
        match value {
            QName::Unprefixed("xmlns") => AttributeName::DefaultNamespace,
            QName::Prefixed(PrefixedName {
                prefix: "xmlns",
                local_part,
            }) => AttributeName::Namespace(local_part),
            _ => AttributeName::QName(value),
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum AttributeValue<'a> {
    Reference(Reference<'a>),
    Text(&'a str),
}

impl<'a> From<Reference<'a>> for AttributeValue<'a> {
    fn from(value: Reference<'a>) -> Self {
        AttributeValue::Reference(value)
    }
}

impl<'a> From<&'a str> for AttributeValue<'a> {
    fn from(value: &'a str) -> Self {
        AttributeValue::Text(value)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct CData<'a> {
    pub value: &'a str,
}

impl<'a> From<&'a str> for CData<'a> {
    fn from(value: &'a str) -> Self {
        CData { value }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct Comment<'a> {
    pub value: &'a str,
}

impl<'a> From<&'a str> for Comment<'a> {
    fn from(value: &'a str) -> Self {
        Comment { value }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct Content<'a> {
    pub head: Option<&'a str>,
    pub children: Vec<ContentCell<'a>>,
}

impl<'a> From<(Option<&'a str>, Vec<ContentCell<'a>>)> for Content<'a> {
    fn from(value: (Option<&'a str>, Vec<ContentCell<'a>>)) -> Self {
        let (head, children) = value;
        Content { head, children }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct ContentCell<'a> {
    pub child: Contents<'a>,
    pub tail: Option<&'a str>,
}

impl<'a> From<(Contents<'a>, Option<&'a str>)> for ContentCell<'a> {
    fn from(value: (Contents<'a>, Option<&'a str>)) -> Self {
        let (child, tail) = value;
        ContentCell { child, tail }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum Contents<'a> {
    Element(Element<'a>),
    Reference(Reference<'a>),
    CData(CData<'a>),
    PI(PI<'a>),
    Comment(Comment<'a>),
}

impl<'a> From<Element<'a>> for Contents<'a> {
    fn from(value: Element<'a>) -> Self {
        Contents::Element(value)
    }
}

impl<'a> From<Reference<'a>> for Contents<'a> {
    fn from(value: Reference<'a>) -> Self {
        Contents::Reference(value)
    }
}

impl<'a> From<CData<'a>> for Contents<'a> {
    fn from(value: CData<'a>) -> Self {
        Contents::CData(value)
    }
}

impl<'a> From<PI<'a>> for Contents<'a> {
    fn from(value: PI<'a>) -> Self {
        Contents::PI(value)
    }
}

impl<'a> From<Comment<'a>> for Contents<'a> {
    fn from(value: Comment<'a>) -> Self {
        Contents::Comment(value)
    }
}

// -----------------------------------------------------------------------------------------------

/// `<!DOCTYPE ...>`, keeping only what affects the document content.
///
/// Markup declarations other than general entities are recognized and dropped.
#[derive(Debug, PartialEq)]
pub struct DeclarationDoc<'a> {
    pub name: QName<'a>,
    pub external_id: Option<ExternalId<'a>>,
    pub entities: Vec<DeclarationEntity<'a>>,
}

#[allow(clippy::type_complexity)]
impl<'a> From<(QName<'a>, Option<ExternalId<'a>>, Option<Vec<Option<DeclarationEntity<'a>>>>)>
    for DeclarationDoc<'a>
{
    fn from(
        value: (
            QName<'a>,
            Option<ExternalId<'a>>,
            Option<Vec<Option<DeclarationEntity<'a>>>>,
        ),
    ) -> Self {
        let (name, external_id, subset) = value;
        DeclarationDoc {
            name,
            external_id,
            entities: subset.into_iter().flatten().flatten().collect(),
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct DeclarationEntity<'a> {
    pub name: &'a str,
    pub definition: EntityDef<'a>,
}

impl<'a> From<(&'a str, EntityDef<'a>)> for DeclarationEntity<'a> {
    fn from(value: (&'a str, EntityDef<'a>)) -> Self {
        let (name, definition) = value;
        DeclarationEntity { name, definition }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct DeclarationXml<'a> {
    pub version: &'a str,
    pub encoding: Option<&'a str>,
    pub standalone: Option<bool>,
}

impl<'a> From<(&'a str, Option<&'a str>, Option<bool>)> for DeclarationXml<'a> {
    fn from(value: (&'a str, Option<&'a str>, Option<bool>)) -> Self {
        let (version, encoding, standalone) = value;
        DeclarationXml {
            version,
            encoding,
            standalone,
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct Document<'a> {
    pub prolog: Prolog<'a>,
    pub element: Element<'a>,
    pub miscs: Vec<Misc<'a>>,
}

impl<'a> From<(Prolog<'a>, Element<'a>, Vec<Misc<'a>>)> for Document<'a> {
    fn from(value: (Prolog<'a>, Element<'a>, Vec<Misc<'a>>)) -> Self {
        let (prolog, element, miscs) = value;
        Document {
            prolog,
            element,
            miscs,
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct Element<'a> {
    pub name: QName<'a>,
    pub attributes: Vec<Attribute<'a>>,
    pub content: Option<Content<'a>>,
}

impl<'a> Element<'a> {
    pub fn set_content(mut self, content: Content<'a>) -> Self {
        self.content = Some(content);
        self
    }
}

impl<'a> From<(QName<'a>, Vec<Attribute<'a>>)> for Element<'a> {
    fn from(value: (QName<'a>, Vec<Attribute<'a>>)) -> Self {
        let (name, attributes) = value;
        Element {
            name,
            attributes,
            content: None,
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum EntityDef<'a> {
    Internal(Vec<EntityValue<'a>>),
    External(ExternalId<'a>, Option<&'a str>),
}

impl<'a> From<Vec<EntityValue<'a>>> for EntityDef<'a> {
    fn from(value: Vec<EntityValue<'a>>) -> Self {
        EntityDef::Internal(value)
    }
}

impl<'a> From<(ExternalId<'a>, Option<&'a str>)> for EntityDef<'a> {
    fn from(value: (ExternalId<'a>, Option<&'a str>)) -> Self {
        let (id, ndata) = value;
        EntityDef::External(id, ndata)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum EntityValue<'a> {
    Text(&'a str),
    Reference(Reference<'a>),
}

impl<'a> From<&'a str> for EntityValue<'a> {
    fn from(value: &'a str) -> Self {
        EntityValue::Text(value)
    }
}

impl<'a> From<Reference<'a>> for EntityValue<'a> {
    fn from(value: Reference<'a>) -> Self {
        EntityValue::Reference(value)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum ExternalId<'a> {
    System(&'a str),
    Public(&'a str, &'a str),
}

impl<'a> From<&'a str> for ExternalId<'a> {
    fn from(value: &'a str) -> Self {
        ExternalId::System(value)
    }
}

impl<'a> From<(&'a str, &'a str)> for ExternalId<'a> {
    fn from(value: (&'a str, &'a str)) -> Self {
        let (public, system) = value;
        ExternalId::Public(public, system)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum Misc<'a> {
    Comment(Comment<'a>),
    PI(PI<'a>),
    Whitespace(&'a str),
}

impl<'a> From<Comment<'a>> for Misc<'a> {
    fn from(value: Comment<'a>) -> Self {
        Misc::Comment(value)
    }
}

impl<'a> From<PI<'a>> for Misc<'a> {
    fn from(value: PI<'a>) -> Self {
        Misc::PI(value)
    }
}

impl<'a> From<&'a str> for Misc<'a> {
    fn from(value: &'a str) -> Self {
        Misc::Whitespace(value)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct PI<'a> {
    pub target: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> From<(&'a str, Option<&'a str>)> for PI<'a> {
    fn from(value: (&'a str, Option<&'a str>)) -> Self {
        let (target, value) = value;
        PI { target, value }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct Prolog<'a> {
    pub declaration_xml: Option<DeclarationXml<'a>>,
    pub heads: Vec<Misc<'a>>,
    pub declaration_doc: Option<DeclarationDoc<'a>>,
    pub tails: Vec<Misc<'a>>,
}

#[allow(clippy::type_complexity)]
impl<'a>
    From<(
        Option<DeclarationXml<'a>>,
        Vec<Misc<'a>>,
        Option<(DeclarationDoc<'a>, Vec<Misc<'a>>)>,
    )> for Prolog<'a>
{
    fn from(
        value: (
            Option<DeclarationXml<'a>>,
            Vec<Misc<'a>>,
            Option<(DeclarationDoc<'a>, Vec<Misc<'a>>)>,
        ),
    ) -> Self {
        let (declaration_xml, heads, tail) = value;
        let (declaration_doc, tails) = match tail {
            Some((doc, tails)) => (Some(doc), tails),
            None => (None, vec![]),
        };
        Prolog {
            declaration_xml,
            heads,
            declaration_doc,
            tails,
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum Reference<'a> {
    Character(&'a str, u32),
    Entity(&'a str),
}

impl<'a> Reference<'a> {
    pub fn digit(value: &'a str) -> Self {
        Reference::Character(value, 10)
    }

    pub fn entity(value: &'a str) -> Self {
        Reference::Entity(value)
    }

    pub fn hex(value: &'a str) -> Self {
        Reference::Character(value, 16)
    }
}

// -----------------------------------------------------------------------------------------------
