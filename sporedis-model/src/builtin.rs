//! Schemas for the two entity types shipped with sporedis.

use crate::{AttributeDef, RecordSchema};

/// Entity type name for customers.
pub const CUSTOMER: &str = "customer";

/// Entity type name for sporting events.
pub const EVENT: &str = "event";

/// `customer`: id in `id`, a required `name`.
pub fn customer_schema() -> RecordSchema {
    RecordSchema {
        entity_type: CUSTOMER.into(),
        id_attribute: "id".into(),
        attributes: vec![AttributeDef::text("name")],
    }
}

/// `event`: id in `sku`. Events default to not being medal events and to
/// having disabled access.
pub fn event_schema() -> RecordSchema {
    RecordSchema {
        entity_type: EVENT.into(),
        id_attribute: "sku".into(),
        attributes: vec![
            AttributeDef::text("name"),
            AttributeDef::text("venue"),
            AttributeDef::text("category"),
            AttributeDef::bool("medal_event").with_default(false),
            AttributeDef::bool("disabled_access").with_default(true),
        ],
    }
}
