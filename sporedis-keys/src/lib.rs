//! Composite key naming for sporedis.
//!
//! Every key the store touches is built here from an ordered list of parts:
//! - [`KeyNamer::make_key`]: `[prefix + sep] part (sep part)*`
//! - [`KeyNamer::make_field`]: the same join, never prefixed
//!
//! The naming configuration is an immutable value handed to each component
//! that builds keys. Two namers with different configuration generate
//! different keys for the same parts, so every component sharing a keyspace
//! must be built from the same [`KeyConfig`].

mod namer;

pub use namer::{KeyConfig, KeyNamer, DEFAULT_SEPARATOR};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, KeyError>;

/// Errors that can occur while configuring key naming.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("key separator must not be empty")]
    EmptySeparator,
}
