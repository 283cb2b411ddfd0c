//! The sample customers and events the demo loads.

use serde_json::json;
use sporedis_model::{customer_schema, event_schema, ModelResult, Record};

/// `(id, customer_name)` rows.
const CUSTOMERS: [(&str, &str); 7] = [
    ("bill", "bill smith"),
    ("mary", "mary jane"),
    ("jamie", "jamie north"),
    ("joan", "joan west"),
    ("fred", "fred smith"),
    ("amy", "amy south"),
    ("jim", "jim somebody"),
];

pub fn sample_customers() -> ModelResult<Vec<Record>> {
    let schema = customer_schema();
    CUSTOMERS
        .iter()
        .map(|(id, customer_name)| schema.build(*id, [("name", *customer_name)]))
        .collect()
}

/// Three events across two venues, parsed the way stored blobs are.
pub fn sample_events() -> ModelResult<Vec<Record>> {
    let rows = json!([
        {
            "sku": "123-ABC-723",
            "name": "Men's 100m Final",
            "disabled_access": true,
            "medal_event": true,
            "venue": "Olympic Stadium",
            "category": "Track & Field"
        },
        {
            "sku": "737-DEF-911",
            "name": "Women's 4x100m Heats",
            "disabled_access": true,
            "medal_event": false,
            "venue": "Olympic Stadium",
            "category": "Track & Field"
        },
        {
            "sku": "320-GHI-921",
            "name": "Womens Judo Qualifying",
            "disabled_access": false,
            "medal_event": false,
            "venue": "Nippon Budokan",
            "category": "Martial Arts"
        }
    ]);

    let schema = event_schema();
    rows.as_array()
        .into_iter()
        .flatten()
        .map(|row| schema.from_json(row))
        .collect()
}
