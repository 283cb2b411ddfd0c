use pretty_assertions::assert_eq;
use sporedis_model::{
    customer_schema, event_schema, AttributeDef, AttributeKind, AttributeValue, ModelError,
    RecordSchema,
};

fn make_task_schema() -> RecordSchema {
    RecordSchema::new(
        "task",
        "id",
        vec![
            AttributeDef::text("title"),
            AttributeDef::bool("done").with_default(false),
            AttributeDef::integer("priority").optional(),
        ],
    )
    .unwrap()
}

// ── Schema validation ────────────────────────────────────────────

#[test]
fn new_rejects_attribute_named_like_id() {
    let err = RecordSchema::new(
        "task",
        "id",
        vec![AttributeDef::text("title"), AttributeDef::text("id")],
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::ShadowsId { attribute, .. } if attribute == "id"));
}

#[test]
fn new_rejects_duplicate_attributes() {
    let err = RecordSchema::new(
        "task",
        "id",
        vec![AttributeDef::text("title"), AttributeDef::bool("title")],
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateAttribute { attribute, .. } if attribute == "title"));
}

#[test]
fn builtin_schemas_are_valid() {
    for schema in [customer_schema(), event_schema()] {
        let rebuilt =
            RecordSchema::new(schema.entity_type.clone(), schema.id_attribute.clone(), schema.attributes.clone())
                .unwrap();
        assert_eq!(rebuilt, schema);
    }
}

// ── AttributeDef constructors ────────────────────────────────────

#[test]
fn text_attribute_is_required() {
    let a = AttributeDef::text("title");
    assert_eq!(a.name, "title");
    assert_eq!(a.kind, AttributeKind::Text);
    assert!(a.required);
    assert_eq!(a.default, None);
}

#[test]
fn optional_clears_required() {
    let a = AttributeDef::integer("priority").optional();
    assert_eq!(a.kind, AttributeKind::Integer);
    assert!(!a.required);
}

#[test]
fn default_makes_attribute_optional() {
    let a = AttributeDef::bool("done").with_default(true);
    assert!(!a.required);
    assert_eq!(a.default, Some(AttributeValue::Bool(true)));
}

#[test]
fn schema_attribute_lookup() {
    let s = make_task_schema();
    assert_eq!(s.attribute("done").map(|a| a.kind), Some(AttributeKind::Bool));
    assert!(s.attribute("missing").is_none());
}

// ── build ────────────────────────────────────────────────────────

#[test]
fn build_applies_defaults_and_leaves_optional_absent() {
    let s = make_task_schema();
    let r = s.build("t1", [("title", "write docs")]).unwrap();
    assert_eq!(r.entity_type(), "task");
    assert_eq!(r.id(), "t1");
    assert_eq!(r.get_str("title"), Some("write docs"));
    assert_eq!(r.get_bool("done"), Some(false));
    assert!(!r.has("priority"));
}

#[test]
fn build_rejects_unknown_attribute() {
    let s = make_task_schema();
    let err = s
        .build("t1", [("title", "x"), ("colour", "red")])
        .unwrap_err();
    assert!(matches!(err, ModelError::UnknownAttribute { attribute, .. } if attribute == "colour"));
}

#[test]
fn build_rejects_missing_required() {
    let s = make_task_schema();
    let err = s.build("t1", Vec::<(&str, &str)>::new()).unwrap_err();
    assert!(matches!(err, ModelError::MissingAttribute { attribute, .. } if attribute == "title"));
}

#[test]
fn build_rejects_kind_mismatch() {
    let s = make_task_schema();
    let err = s
        .build(
            "t1",
            [
                ("title", AttributeValue::from("x")),
                ("done", AttributeValue::from("yes")),
            ],
        )
        .unwrap_err();
    match err {
        ModelError::TypeMismatch {
            attribute,
            expected,
            actual,
        } => {
            assert_eq!(attribute, "done");
            assert_eq!(expected, AttributeKind::Bool);
            assert_eq!(actual, "text");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn build_rejects_empty_id() {
    let s = make_task_schema();
    let err = s.build("", [("title", "x")]).unwrap_err();
    assert!(matches!(err, ModelError::MissingId(attr) if attr == "id"));
}

// ── encode / decode ──────────────────────────────────────────────

#[test]
fn encode_is_flat_json_with_id_attribute() {
    let s = event_schema();
    let r = s
        .build(
            "320-GHI-921",
            [
                ("name", AttributeValue::from("Womens Judo Qualifying")),
                ("venue", "Nippon Budokan".into()),
                ("category", "Martial Arts".into()),
                ("disabled_access", false.into()),
            ],
        )
        .unwrap();
    let blob = s.encode(&r).unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "sku": "320-GHI-921",
            "name": "Womens Judo Qualifying",
            "venue": "Nippon Budokan",
            "category": "Martial Arts",
            "medal_event": false,
            "disabled_access": false,
        })
    );
}

#[test]
fn decode_restores_equal_record() {
    let s = make_task_schema();
    let r = s
        .build(
            "t9",
            [
                ("title", AttributeValue::from("ship")),
                ("priority", 3i64.into()),
            ],
        )
        .unwrap();
    let decoded = s.decode(&s.encode(&r).unwrap()).unwrap();
    assert_eq!(decoded, r);
}

#[test]
fn decode_treats_null_as_absent() {
    let s = make_task_schema();
    let r = s
        .decode(r#"{"id":"t1","title":"x","priority":null}"#)
        .unwrap();
    assert!(!r.has("priority"));
}

#[test]
fn decode_rejects_invalid_json() {
    let err = make_task_schema().decode("{not json").unwrap_err();
    assert!(matches!(err, ModelError::Json(_)));
}

#[test]
fn decode_rejects_non_object() {
    let err = make_task_schema().decode("[1,2,3]").unwrap_err();
    assert!(matches!(err, ModelError::NotAnObject));
}

#[test]
fn decode_rejects_missing_id() {
    let err = make_task_schema().decode(r#"{"title":"x"}"#).unwrap_err();
    assert!(matches!(err, ModelError::MissingId(_)));
}

#[test]
fn decode_rejects_non_string_id() {
    let err = make_task_schema()
        .decode(r#"{"id":42,"title":"x"}"#)
        .unwrap_err();
    assert!(matches!(err, ModelError::TypeMismatch { attribute, .. } if attribute == "id"));
}

#[test]
fn decode_rejects_nested_values() {
    let err = make_task_schema()
        .decode(r#"{"id":"t","title":{"a":1}}"#)
        .unwrap_err();
    assert!(matches!(err, ModelError::TypeMismatch { .. }));
}

#[test]
fn encode_rejects_foreign_record() {
    let customer = customer_schema().build("bill", [("name", "bill smith")]).unwrap();
    let err = event_schema().encode(&customer).unwrap_err();
    assert!(matches!(err, ModelError::EntityTypeMismatch { .. }));
}

// ── built-in schemas ─────────────────────────────────────────────

#[test]
fn customer_schema_shape() {
    let s = customer_schema();
    assert_eq!(s.entity_type, "customer");
    assert_eq!(s.id_attribute, "id");
    let r = s.decode(r#"{"id":"mary","name":"mary jane"}"#).unwrap();
    assert_eq!(r.get_str("name"), Some("mary jane"));
}

#[test]
fn event_schema_defaults() {
    let s = event_schema();
    let r = s
        .build(
            "123-ABC-723",
            [
                ("name", "Men's 100m Final"),
                ("venue", "Olympic Stadium"),
                ("category", "Track & Field"),
            ],
        )
        .unwrap();
    assert_eq!(r.get_bool("medal_event"), Some(false));
    assert_eq!(r.get_bool("disabled_access"), Some(true));
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn attribute_kind_serde_uses_snake_case() {
    assert_eq!(serde_json::to_string(&AttributeKind::Integer).unwrap(), "\"integer\"");
    assert_eq!(serde_json::to_string(&AttributeKind::Text).unwrap(), "\"text\"");
}

#[test]
fn schema_deserializes_from_json() {
    let json = r#"{
        "entity_type": "ticket",
        "id_attribute": "code",
        "attributes": [
            {"name": "holder", "kind": "text", "required": true},
            {"name": "used", "kind": "bool", "default": false}
        ]
    }"#;
    let s: RecordSchema = serde_json::from_str(json).unwrap();
    assert_eq!(s.entity_type, "ticket");
    assert_eq!(s.attributes.len(), 2);
    assert!(!s.attributes[1].required);
    assert_eq!(s.attributes[1].default, Some(AttributeValue::Bool(false)));
}

#[test]
fn deserialization_rejects_shadowed_id() {
    let json = r#"{
        "entity_type": "ticket",
        "id_attribute": "code",
        "attributes": [{"name": "code", "kind": "text", "required": true}]
    }"#;
    let err = serde_json::from_str::<RecordSchema>(json).unwrap_err();
    assert!(err.to_string().contains("shadows the id attribute"));
}
