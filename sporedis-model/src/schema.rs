use crate::{AttributeValue, ModelError, ModelResult, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Describes an entity type's attributes and the attribute holding its id.
///
/// Attribute names are unique and never equal the id attribute; both
/// [`RecordSchema::new`] and deserialization enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaFields")]
pub struct RecordSchema {
    pub entity_type: String,
    /// Name of the id attribute in the serialized blob (e.g. `"sku"`).
    pub id_attribute: String,
    pub attributes: Vec<AttributeDef>,
}

/// Unvalidated wire form of a [`RecordSchema`].
#[derive(Deserialize)]
struct SchemaFields {
    entity_type: String,
    id_attribute: String,
    attributes: Vec<AttributeDef>,
}

impl TryFrom<SchemaFields> for RecordSchema {
    type Error = ModelError;

    fn try_from(fields: SchemaFields) -> ModelResult<Self> {
        Self::new(fields.entity_type, fields.id_attribute, fields.attributes)
    }
}

/// A named, typed attribute declared by a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    pub kind: AttributeKind,
    /// A required attribute without a default must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Applied when the attribute is not supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AttributeValue>,
}

impl AttributeDef {
    fn simple(name: &str, kind: AttributeKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            default: None,
        }
    }

    /// Shorthand for a required text attribute.
    pub fn text(name: &str) -> Self {
        Self::simple(name, AttributeKind::Text, true)
    }

    /// Shorthand for a required boolean attribute.
    pub fn bool(name: &str) -> Self {
        Self::simple(name, AttributeKind::Bool, true)
    }

    /// Shorthand for a required integer attribute.
    pub fn integer(name: &str) -> Self {
        Self::simple(name, AttributeKind::Integer, true)
    }

    /// Marks the attribute optional; records may omit it.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the value used when the attribute is omitted.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<AttributeValue>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }
}

/// The kind of scalar an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Text,
    Bool,
    Integer,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Integer => "integer",
        };
        f.write_str(name)
    }
}

impl RecordSchema {
    /// Creates a schema, rejecting duplicate attribute names and an
    /// attribute that shadows the id attribute.
    pub fn new(
        entity_type: impl Into<String>,
        id_attribute: impl Into<String>,
        attributes: Vec<AttributeDef>,
    ) -> ModelResult<Self> {
        let entity_type = entity_type.into();
        let id_attribute = id_attribute.into();

        let mut seen = HashSet::with_capacity(attributes.len());
        for def in &attributes {
            if def.name == id_attribute {
                return Err(ModelError::ShadowsId {
                    entity_type,
                    attribute: def.name.clone(),
                });
            }
            if !seen.insert(def.name.as_str()) {
                return Err(ModelError::DuplicateAttribute {
                    entity_type,
                    attribute: def.name.clone(),
                });
            }
        }

        Ok(Self {
            entity_type,
            id_attribute,
            attributes,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Builds a record, validating `values` against the schema.
    ///
    /// Unknown attributes and kind mismatches are rejected. Missing
    /// attributes take their default, fail if required, and are otherwise
    /// left absent.
    pub fn build<I, K, V>(&self, id: impl Into<String>, values: I) -> ModelResult<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::MissingId(self.id_attribute.clone()));
        }

        let mut attributes = BTreeMap::new();
        for (name, value) in values {
            let name: String = name.into();
            let value: AttributeValue = value.into();
            let def = self
                .attribute(&name)
                .ok_or_else(|| ModelError::UnknownAttribute {
                    entity_type: self.entity_type.clone(),
                    attribute: name.clone(),
                })?;
            if value.kind() != def.kind {
                return Err(ModelError::TypeMismatch {
                    attribute: name,
                    expected: def.kind,
                    actual: value.kind().to_string(),
                });
            }
            attributes.insert(name, value);
        }

        for def in &self.attributes {
            if attributes.contains_key(&def.name) {
                continue;
            }
            if let Some(default) = &def.default {
                attributes.insert(def.name.clone(), default.clone());
            } else if def.required {
                return Err(ModelError::MissingAttribute {
                    entity_type: self.entity_type.clone(),
                    attribute: def.name.clone(),
                });
            }
        }

        Ok(Record::from_parts(self.entity_type.clone(), id, attributes))
    }

    /// Serializes a record to its flat JSON blob, id attribute included.
    pub fn encode(&self, record: &Record) -> ModelResult<String> {
        self.check_type(record)?;
        let mut obj = serde_json::Map::new();
        obj.insert(
            self.id_attribute.clone(),
            serde_json::Value::String(record.id().to_string()),
        );
        for (name, value) in record.attributes() {
            obj.insert(name.to_string(), serde_json::to_value(value)?);
        }
        Ok(serde_json::to_string(&serde_json::Value::Object(obj))?)
    }

    /// Parses a blob written by [`RecordSchema::encode`].
    ///
    /// `null` attribute values are treated as absent.
    pub fn decode(&self, blob: &str) -> ModelResult<Record> {
        let value: serde_json::Value = serde_json::from_str(blob)?;
        self.from_json(&value)
    }

    /// Builds a record from an already-parsed JSON object.
    pub fn from_json(&self, value: &serde_json::Value) -> ModelResult<Record> {
        let obj = value.as_object().ok_or(ModelError::NotAnObject)?;

        let id = match obj.get(&self.id_attribute) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => {
                return Err(ModelError::MissingId(self.id_attribute.clone()));
            }
            Some(other) => {
                return Err(ModelError::TypeMismatch {
                    attribute: self.id_attribute.clone(),
                    expected: AttributeKind::Text,
                    actual: json_kind(other).to_string(),
                });
            }
        };

        let mut values = Vec::with_capacity(obj.len());
        for (name, raw) in obj {
            if name == &self.id_attribute || raw.is_null() {
                continue;
            }
            let value = AttributeValue::from_json(raw).ok_or_else(|| ModelError::TypeMismatch {
                attribute: name.clone(),
                expected: self
                    .attribute(name)
                    .map(|d| d.kind)
                    .unwrap_or(AttributeKind::Text),
                actual: json_kind(raw).to_string(),
            })?;
            values.push((name.clone(), value));
        }

        self.build(id, values)
    }

    /// Rejects records that belong to another entity type.
    pub fn check_type(&self, record: &Record) -> ModelResult<()> {
        if record.entity_type() != self.entity_type {
            return Err(ModelError::EntityTypeMismatch {
                expected: self.entity_type.clone(),
                actual: record.entity_type().to_string(),
            });
        }
        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "text",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
