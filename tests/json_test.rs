//! Tests for validating `serde_json` documents.

use serde_json::json;
use waymark::{
    constraints, rules, validate, validate_context, Context, Elements, Fields, Keys, Kind, Map,
    Node,
};

fn order_constraints() -> Map {
    Map::new()
        .key("id", constraints![rules::required(), rules::kind(&[Kind::String])])
        .key(
            "lines",
            constraints![
                rules::min_length(1),
                Elements::new().with(
                    Map::new()
                        .key("sku", rules::pattern("^[A-Z]{3}-[0-9]+$").unwrap())
                        .key("quantity", constraints![rules::required(), rules::min(1.0)]),
                ),
            ],
        )
        .key("meta", Keys::new().with(rules::max_length(8)))
}

#[test]
fn test_valid_document() {
    let order = json!({
        "id": "ord-1",
        "lines": [
            { "sku": "ABC-1", "quantity": 2 },
            { "sku": "XYZ-99", "quantity": 1 }
        ],
        "meta": { "source": "web" }
    });

    let violations = validate(&order, &order_constraints()).unwrap();
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn test_invalid_document() {
    let order = json!({
        "id": 42,
        "lines": [
            { "sku": "abc", "quantity": 2 },
            { "sku": "XYZ-99" }
        ],
        "meta": { "campaign_id": "c-1" }
    });

    let violations = validate(&order, &order_constraints()).unwrap();
    let found: Vec<_> = violations
        .iter()
        .map(|v| (v.path.as_str(), v.message.as_str()))
        .collect();

    assert_eq!(
        found,
        vec![
            (".id", "value must be one of the allowed kinds"),
            (".lines.[0].sku", "value must match regular expression"),
            (".lines.[1].quantity", "a value is required"),
            (".meta.campaign_id", "maximum length exceeded"),
        ]
    );
}

#[test]
fn test_empty_values_only_fail_presence_rules() {
    let order = json!({ "id": null, "lines": [], "meta": {} });

    let violations = validate(&order, &order_constraints()).unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, ".id");
    assert_eq!(violations[0].message, "a value is required");
}

#[test]
fn test_records_need_a_record_node() {
    let document = json!({ "name": "ann" });
    let node = Node::from_json(&document);
    let constraints = Fields::new().field("name", rules::required());

    let ctx = Context::new(&node).with_strict_types(false);
    let violations = validate_context(&ctx, &constraints).unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].details["allowed_kinds"], json!(["record"]));
}

#[test]
fn test_violation_details_are_json() {
    let violations = validate(
        &json!("purple"),
        &rules::one_of(["red", "green"]).unwrap(),
    )
    .unwrap();

    assert_eq!(violations[0].details["allowed"], json!(["red", "green"]));
}
