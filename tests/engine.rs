//! End-to-end tests driving the engine the way a form UI would: load
//! documents, seed defaults, edit at paths, switch variants, and read the
//! violation list and export preview back.

use std::time::{Duration, Instant};

use serde_json::json;

use jsonforge::Session;
use jsonforge::data::oneof::VariantSelector;
use jsonforge::data::path::Token;
use jsonforge::loader::SchemaDocument;
use jsonforge::schema::default::synthesize;
use jsonforge::schema::validate::{ROOT_LOCATION, validate};

fn service_schema() -> serde_json::Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Service",
        "type": "object",
        "definitions": {
            "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
        },
        "properties": {
            "name": { "type": "string" },
            "port": { "$ref": "#/definitions/port", "default": 8080 },
            "replicas": { "type": "integer", "minimum": 0 },
            "tags": { "type": "array", "items": { "type": "string" }, "maxItems": 3 },
            "endpoint": {
                "oneOf": [
                    { "type": "string" },
                    {
                        "type": "object",
                        "properties": {
                            "host": { "type": "string" },
                            "port": { "$ref": "#/definitions/port" }
                        },
                        "required": ["host", "port"]
                    }
                ]
            }
        },
        "required": ["name", "port"]
    })
}

#[test]
fn defaults_are_self_valid_for_a_batch_of_schemas() {
    let schemas = [
        service_schema(),
        json!({ "type": "array", "items": { "type": "number" }, "minItems": 0 }),
        json!({ "enum": ["a", "b"] }),
        json!({ "oneOf": [{ "type": "boolean" }, { "type": "string" }] }),
        json!({
            "allOf": [
                { "properties": { "a": { "type": "string" } }, "required": ["a"] },
                { "properties": { "b": { "type": "number" } }, "required": ["b"] }
            ]
        }),
    ];
    for schema in &schemas {
        let seeded = synthesize(schema, schema).unwrap();
        let violations = validate(
            schema,
            schema,
            Some(&seeded),
            ROOT_LOCATION,
            &VariantSelector::new(),
        )
        .unwrap();
        assert!(
            violations.is_empty(),
            "seed {seeded} of {schema} produced {violations:?}"
        );
    }
}

#[test]
fn edit_validate_export_cycle() {
    let mut session = Session::new();
    session.add_documents([SchemaDocument::from_value(
        "service.schema.json",
        service_schema(),
    )]);
    session.activate(0).unwrap();

    // Seeded skeleton: required fields only, `default` taken verbatim.
    assert_eq!(session.value_at(&[Token::key("port")]), Some(&json!(8080)));
    assert_eq!(session.value_at(&[Token::key("name")]), Some(&json!("")));
    assert_eq!(session.value_at(&[Token::key("tags")]), None);
    assert!(session.violations().is_empty());

    // A burst of edits, some of them invalid.
    session.set_value(&[Token::key("name")], json!(7));
    session.set_value(&[Token::key("port")], json!(70000));
    session.set_value(
        &[Token::key("tags")],
        json!(["a", "b", "c", "d"]),
    );
    session.set_value(&[Token::key("tags"), Token::index(3)], json!(9));

    let ran = session
        .tick(Instant::now() + Duration::from_millis(100))
        .unwrap();
    assert!(ran);
    assert_eq!(
        session.violations(),
        [
            "$.name must be a string",
            "$.port maximum 65535",
            "$.tags maxItems 3",
            "$.tags[3] must be a string",
        ]
    );

    // Fix everything; the preview reflects the final state.
    session.set_value(&[Token::key("name")], json!("api"));
    session.set_value(&[Token::key("port")], json!(443));
    session.remove_value(&[Token::key("tags")]);
    session.recompute_now().unwrap();

    assert!(session.violations().is_empty());
    let exported: serde_json::Value = serde_json::from_str(session.preview()).unwrap();
    assert_eq!(exported, json!({ "name": "api", "port": 443 }));
    assert_eq!(session.suggested_file_name().as_deref(), Some("service.json"));
}

#[test]
fn field_variant_switch_clears_and_revalidates() {
    let mut session = Session::new();
    session.add_documents([SchemaDocument::from_value(
        "service.schema.json",
        service_schema(),
    )]);
    session.activate(0).unwrap();

    let endpoint = [Token::key("endpoint")];
    session.set_value(&endpoint, json!("https://example.com"));
    session.recompute_now().unwrap();
    assert!(session.violations().is_empty());

    // Switching the branch throws the string value away.
    session.select_variant(&endpoint, 1);
    assert_eq!(session.value_at(&endpoint), None);

    // An object against branch 1 reports its own required fields.
    session.set_value(&[Token::key("endpoint"), Token::key("host")], json!("h"));
    session.recompute_now().unwrap();
    assert_eq!(session.violations(), ["$.endpoint.port is required"]);
}

#[test]
fn switching_documents_discards_all_state() {
    let mut session = Session::new();
    session.add_documents([
        SchemaDocument::from_value("service.schema.json", service_schema()),
        SchemaDocument::from_value(
            "flag.schema.json",
            json!({ "type": "object", "properties": { "on": { "type": "boolean" } }, "required": ["on"] }),
        ),
    ]);
    session.activate(0).unwrap();
    session.set_value(&[Token::key("name")], json!("api"));
    session.select_variant(&[Token::key("endpoint")], 1);

    session.activate(1).unwrap();
    assert_eq!(session.value_at(&[Token::key("name")]), None);
    assert_eq!(session.value_at(&[Token::key("on")]), Some(&json!(false)));
    assert!(session.violations().is_empty());
    assert_eq!(session.suggested_file_name().as_deref(), Some("flag.json"));
}
