//! The ordering policy of attributes and namespace declarations.

use tidyxml_tree::{AttributeValue, Attributes, QName};

/// Namespaces of XML Schema and XML Schema instance share this prefix.
const SCHEMA_NAMESPACE_PREFIX: &str = "http://www.w3.org/2001/XMLSchema";

pub fn is_schema(name: &QName) -> bool {
    name.namespace()
        .map_or(false, |v| v.starts_with(SCHEMA_NAMESPACE_PREFIX))
}

/// Attributes in XML Schema namespaces first, then the others. Each group is ordered by
/// expanded name.
pub fn sort_attributes(attributes: &Attributes) -> Vec<(&QName, &AttributeValue)> {
    let mut items: Vec<_> = attributes.iter().collect();
    items.sort_by_key(|(name, _)| (!is_schema(name), *name));
    items
}

/// `(prefix, uri)` pairs ordered by prefix.
pub fn sort_declarations<'a>(
    bindings: impl Iterator<Item = (&'a str, &'a str)>,
) -> Vec<(&'a str, &'a str)> {
    let mut items: Vec<_> = bindings.collect();
    items.sort();
    items
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tidyxml_tree::qname::{SCHEMA_INSTANCE_NAMESPACE, SCHEMA_NAMESPACE};

    #[test]
    fn test_is_schema() {
        assert!(is_schema(&QName::new(SCHEMA_NAMESPACE, "a")));
        assert!(is_schema(&QName::new(SCHEMA_INSTANCE_NAMESPACE, "type")));
        assert!(!is_schema(&QName::new("urn:a", "type")));
        assert!(!is_schema(&QName::local("type")));
    }

    #[test]
    fn test_sort_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert(QName::local("b"), AttributeValue::from("2"));
        attributes.insert(QName::local("a"), AttributeValue::from("1"));
        attributes.insert(QName::new("urn:p", "x"), AttributeValue::from("3"));
        attributes.insert(
            QName::new(SCHEMA_INSTANCE_NAMESPACE, "type"),
            AttributeValue::from("t"),
        );
        attributes.insert(
            QName::new(SCHEMA_INSTANCE_NAMESPACE, "nil"),
            AttributeValue::from("true"),
        );

        let names: Vec<_> = sort_attributes(&attributes)
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(
            vec![
                format!("{{{}}}nil", SCHEMA_INSTANCE_NAMESPACE),
                format!("{{{}}}type", SCHEMA_INSTANCE_NAMESPACE),
                "{urn:p}x".to_string(),
                "a".to_string(),
                "b".to_string(),
            ],
            names
        );
    }

    #[test]
    fn test_sort_declarations() {
        let bindings = vec![("z", "urn:a"), ("", "urn:d"), ("a", "urn:z")];
        assert_eq!(
            vec![("", "urn:d"), ("a", "urn:z"), ("z", "urn:a")],
            sort_declarations(bindings.into_iter())
        );
    }
}
