//! Error types for record construction and decoding.

use crate::AttributeKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building a record against its schema.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Record belongs to a different entity type than the schema.
    #[error("expected entity type {expected}, got {actual}")]
    EntityTypeMismatch { expected: String, actual: String },

    /// Attribute is not declared by the schema.
    #[error("unknown attribute {attribute} for entity type {entity_type}")]
    UnknownAttribute {
        entity_type: String,
        attribute: String,
    },

    /// Required attribute was not supplied and has no default.
    #[error("missing required attribute {attribute} for entity type {entity_type}")]
    MissingAttribute {
        entity_type: String,
        attribute: String,
    },

    /// Attribute value has the wrong kind.
    #[error("attribute {attribute}: expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: AttributeKind,
        actual: String,
    },

    /// Schema declares the same attribute twice.
    #[error("attribute {attribute} declared twice for entity type {entity_type}")]
    DuplicateAttribute {
        entity_type: String,
        attribute: String,
    },

    /// Schema declares an attribute named like its id attribute.
    #[error("attribute {attribute} of entity type {entity_type} shadows the id attribute")]
    ShadowsId {
        entity_type: String,
        attribute: String,
    },

    /// Id is empty or missing from the blob.
    #[error("missing id attribute {0}")]
    MissingId(String),

    /// Blob is not a JSON object.
    #[error("record blob is not a JSON object")]
    NotAnObject,

    /// Blob is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
