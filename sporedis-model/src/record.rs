use crate::AttributeValue;
use std::collections::BTreeMap;
use std::fmt;

/// A stored entity: type, id and its schema-validated attributes.
///
/// Built through [`crate::RecordSchema::build`] or
/// [`crate::RecordSchema::decode`]. The id is not part of `attributes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    entity_type: String,
    id: String,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Record {
    pub(crate) fn from_parts(
        entity_type: String,
        id: String,
        attributes: BTreeMap<String, AttributeValue>,
    ) -> Self {
        Self {
            entity_type,
            id,
            attributes,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the attribute value, or `None` if the record does not carry it.
    pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
        self.attributes.get(attribute)
    }

    pub fn has(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(AttributeValue::as_str)
    }

    pub fn get_bool(&self, attribute: &str) -> Option<bool> {
        self.get(attribute).and_then(AttributeValue::as_bool)
    }

    pub fn get_i64(&self, attribute: &str) -> Option<i64> {
        self.get(attribute).and_then(AttributeValue::as_i64)
    }

    /// Attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when every `(attribute, value)` pair is present and equal.
    ///
    /// Stops at the first missing or mismatched attribute.
    pub fn matches_all<'a, I>(&self, predicates: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a AttributeValue)>,
    {
        predicates
            .into_iter()
            .all(|(attr, expected)| self.get(attr) == Some(expected))
    }
}

/// `<type> <id> {attr: value, ...}` with attributes in name order.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {{", self.entity_type, self.id)?;
        for (i, (name, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}
