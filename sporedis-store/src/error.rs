//! Error types for the storage layer.

use sporedis_keys::KeyError;
use sporedis_model::ModelError;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No value stored at the key.
    #[error("no value at key: {0}")]
    NotFound(String),

    /// Stored blob does not decode against the record schema.
    #[error("failed to decode value at {key}: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: ModelError,
    },

    /// Stored bytes are not a readable string (e.g. invalid UTF-8).
    #[error("unreadable value at {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// Backend connection or transport failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation's deadline passed before it completed.
    #[error("store operation timed out")]
    Timeout,

    /// Key holds a different kind of value (string vs set).
    #[error("wrong kind of value at key: {0}")]
    WrongType(String),

    /// A facet query or scan was given no predicates.
    #[error("query needs at least one predicate")]
    EmptyQuery,

    /// No index with this name is attached.
    #[error("unknown index: {0}")]
    UnknownIndex(String),

    /// Scan cursor does not belong to this backend.
    #[error("invalid scan cursor: {0}")]
    InvalidCursor(String),

    /// Record rejected by its schema.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Key naming misconfigured.
    #[error("key error: {0}")]
    Key(#[from] KeyError),
}
