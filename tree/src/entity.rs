use crate::error::{Error, Position, Result};
use std::collections::HashMap;
use tidyxml_nom::xmlchar;
use tidyxml_parser::model::{DeclarationDoc, EntityDef, EntityValue, Reference};

const PREDEFINED: [(&str, char); 5] = [
    ("amp", '&'),
    ("apos", '\''),
    ("gt", '>'),
    ("lt", '<'),
    ("quot", '"'),
];

const MAX_EXPANSION: usize = 1 << 20;

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Context {
    Content,
    /// Literal white space in replacement text becomes a space.
    Attribute,
}

// -----------------------------------------------------------------------------------------------

/// General entities declared in the internal subset, with the predefined ones.
pub(crate) struct Entities<'a> {
    source: &'a str,
    declared: HashMap<&'a str, &'a EntityDef<'a>>,
}

impl<'a> Entities<'a> {
    pub fn new(source: &'a str, declaration: Option<&'a DeclarationDoc<'a>>) -> Self {
        let mut declared = HashMap::new();
        for entity in declaration.iter().flat_map(|v| v.entities.iter()) {
            // the first declaration is binding
            declared.entry(entity.name).or_insert(&entity.definition);
        }

        Entities { source, declared }
    }

    /// Appends the replacement text of `reference` to `out`.
    pub fn expand(
        &self,
        reference: &Reference<'a>,
        context: Context,
        out: &mut String,
    ) -> Result<()> {
        let mut stack = vec![];
        self.expand_nested(reference, context, &mut stack, out)
    }

    /// The character a character reference stands for.
    ///
    /// [\[66\] CharRef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CharRef)
    pub fn character(&self, value: &str, radix: u32) -> Result<char> {
        u32::from_str_radix(value, radix)
            .ok()
            .and_then(char::from_u32)
            .filter(|c| xmlchar::is_char(*c))
            .ok_or_else(|| Error::InvalidCharRef {
                position: Position::locate(self.source, value),
            })
    }

    fn expand_nested(
        &self,
        reference: &Reference<'a>,
        context: Context,
        stack: &mut Vec<&'a str>,
        out: &mut String,
    ) -> Result<()> {
        let name = match reference {
            Reference::Character(value, radix) => {
                out.push(self.character(value, *radix)?);
                return Ok(());
            }
            Reference::Entity(name) => *name,
        };

        if let Some((_, c)) = PREDEFINED.iter().find(|(n, _)| *n == name) {
            out.push(*c);
            return Ok(());
        }

        let position = Position::locate(self.source, name);
        let unsupported = |reason| Error::UnsupportedEntity {
            name: name.to_string(),
            position,
            reason,
        };

        let values = match self.declared.get(name) {
            Some(EntityDef::Internal(values)) => values,
            Some(EntityDef::External(_, Some(_))) => return Err(unsupported("unparsed entity")),
            Some(EntityDef::External(_, None)) => return Err(unsupported("external entity")),
            None => {
                return Err(Error::UndefinedEntity {
                    name: name.to_string(),
                    position,
                })
            }
        };

        if stack.contains(&name) {
            return Err(Error::RecursiveEntity {
                name: name.to_string(),
                position,
            });
        }

        stack.push(name);
        for value in values.iter() {
            match value {
                EntityValue::Text(text) => {
                    if text.contains('<') {
                        return Err(unsupported("replacement text contains markup"));
                    }

                    match context {
                        Context::Content => out.push_str(text),
                        Context::Attribute => out.extend(text.chars().map(|c| {
                            if xmlchar::is_whitespace(c) {
                                ' '
                            } else {
                                c
                            }
                        })),
                    }
                }
                EntityValue::Reference(reference) => {
                    self.expand_nested(reference, context, stack, out)?
                }
            }

            if out.len() > MAX_EXPANSION {
                return Err(unsupported("replacement text is too large"));
            }
        }
        stack.pop();

        Ok(())
    }
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(source: &str, name: &str, context: Context) -> Result<String> {
        let (_, document) = tidyxml_parser::document(source).unwrap();
        let entities = Entities::new(source, document.prolog.declaration_doc.as_ref());
        let mut out = String::new();
        entities.expand(&Reference::entity(name), context, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_expand_predefined() {
        assert_eq!("<", expand("<a/>", "lt", Context::Content).unwrap());
        assert_eq!("\"", expand("<a/>", "quot", Context::Content).unwrap());
    }

    #[test]
    fn test_expand_internal() {
        let source = "<!DOCTYPE a [<!ENTITY e 'x&f;z'><!ENTITY f 'y&#65;'><!ENTITY e 'no'>]><a/>";
        assert_eq!("xyAz", expand(source, "e", Context::Content).unwrap());

        let source = "<!DOCTYPE a [<!ENTITY e 'x\ty&#9;'>]><a/>";
        assert_eq!("x\ty\t", expand(source, "e", Context::Content).unwrap());
        assert_eq!("x y\t", expand(source, "e", Context::Attribute).unwrap());
    }

    #[test]
    fn test_expand_errors() {
        let err = expand("<a/>", "nope", Context::Content).unwrap_err();
        assert!(matches!(err, Error::UndefinedEntity { name, .. } if name == "nope"));

        let source = "<!DOCTYPE a [<!ENTITY e '&f;'><!ENTITY f '&e;'>]><a/>";
        let err = expand(source, "e", Context::Content).unwrap_err();
        assert!(matches!(err, Error::RecursiveEntity { name, .. } if name == "e"));

        let source = "<!DOCTYPE a [<!ENTITY e SYSTEM 'e.xml'>]><a/>";
        let err = expand(source, "e", Context::Content).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEntity { reason: "external entity", .. }));

        let source = "<!DOCTYPE a [<!ENTITY e '<b/>'>]><a/>";
        let err = expand(source, "e", Context::Content).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEntity { name, .. } if name == "e"));
    }

    #[test]
    fn test_expand_too_large() {
        let source = "<!DOCTYPE a [
            <!ENTITY a0 'xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx'>
            <!ENTITY a1 '&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;&a0;'>
            <!ENTITY a2 '&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;&a1;'>
            <!ENTITY a3 '&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;&a2;'>
            <!ENTITY a4 '&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;&a3;'>
        ]><a/>";
        let err = expand(source, "a4", Context::Content).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedEntity {
                reason: "replacement text is too large",
                ..
            }
        ));
    }

    #[test]
    fn test_character() {
        let source = "&#65;&#x1F600;&#0;";
        let entities = Entities::new(source, None);
        assert_eq!('A', entities.character(&source[2..4], 10).unwrap());
        assert_eq!('\u{1F600}', entities.character(&source[8..13], 16).unwrap());
        assert_eq!(
            Error::InvalidCharRef {
                position: crate::error::Position { line: 1, column: 17 }
            },
            entities.character(&source[16..17], 10).unwrap_err()
        );
    }
}
