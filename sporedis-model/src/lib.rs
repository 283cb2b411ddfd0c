//! Record model for sporedis.
//!
//! Defines the types every other sporedis crate depends on:
//! - [`Record`]: an entity type, an id and a fixed set of scalar attributes
//! - [`RecordSchema`]: declares an entity type's attributes, their kinds,
//!   defaults and the attribute that carries the id
//! - [`AttributeValue`]: the scalar stored in an attribute
//!
//! Records are only built through a schema, so a `Record` in hand always has
//! the attribute set its schema allows. The JSON blob produced by
//! [`RecordSchema::encode`] is what the store persists.

mod builtin;
mod error;
mod record;
mod schema;
mod value;

pub use builtin::{customer_schema, event_schema, CUSTOMER, EVENT};
pub use error::{ModelError, ModelResult};
pub use record::Record;
pub use schema::{AttributeDef, AttributeKind, RecordSchema};
pub use value::AttributeValue;
