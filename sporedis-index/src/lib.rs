//! Attribute lookup for sporedis records.
//!
//! Three ways to find records by attribute value:
//! - [`FacetIndex::plain`]: one set of ids per `(attribute, value)` at
//!   `fs:<attribute>:<value>`, queried by set intersection
//! - [`FacetIndex::hashed`]: the same sets at `hfs:<sha256>` so key names do
//!   not reveal indexed values
//! - [`search_greedy`]: decode every record of the type and filter, no index
//!
//! Both index kinds return identical id sets for identical inputs. The
//! [`Catalog`] keeps indexes in step with record updates and deletes; direct
//! index writes are additive only.

mod catalog;
mod facet;
mod hashed;
mod linear;
mod predicate;

pub use catalog::Catalog;
pub use facet::{FacetIndex, FacetKeyScheme, FacetSearch, HashedFacetIndex, PlainFacets};
pub use hashed::HashedFacets;
pub use linear::search_greedy;
pub use predicate::Predicate;
