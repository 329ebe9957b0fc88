//! Tests for shape-agnostic lookup: a single root behaves like a one-element root list

use rstest::rstest;
use serde_json::json;

use entity_hierarchy::domain::{all_ids, find_by_id, path_to, Forest, RootShape};

fn payload() -> serde_json::Value {
    json!({
        "id": "X", "name": "Group Treasury",
        "data": {"id": "X", "name": "Group Treasury", "level": "Level 1"},
        "children": [
            {"id": "Y", "name": "EMEA",
             "data": {"id": "Y", "name": "EMEA", "level": "Level 2", "parentName": "Group Treasury"},
             "children": [
                {"id": "Z", "name": "Frankfurt",
                 "data": {"id": "Z", "name": "Frankfurt", "level": "Level 3", "currency": "EUR"}}
             ]},
            {"id": "W", "name": "APAC",
             "data": {"id": "W", "name": "APAC", "level": "Level 2"}}
        ]
    })
}

fn single() -> Forest {
    Forest::from_json_value(payload()).unwrap()
}

fn wrapped() -> Forest {
    Forest::from_json_value(json!([payload()])).unwrap()
}

#[test]
fn given_node_and_one_element_array_when_parsing_then_only_shape_differs() {
    assert_eq!(single().shape(), RootShape::Single);
    assert_eq!(wrapped().shape(), RootShape::Multiple);
    assert_eq!(single().roots(), wrapped().roots());
}

#[test]
fn given_both_shapes_when_listing_ids_then_identical() {
    assert_eq!(all_ids(&single()), all_ids(&wrapped()));
    assert_eq!(all_ids(&single()), vec!["X", "Y", "Z", "W"]);
}

#[rstest]
#[case("X")]
#[case("Y")]
#[case("Z")]
#[case("W")]
#[case("absent")]
fn given_both_shapes_when_finding_then_identical(#[case] id: &str) {
    let (single, wrapped) = (single(), wrapped());
    assert_eq!(find_by_id(&single, id), find_by_id(&wrapped, id));
    assert_eq!(path_to(&single, id), path_to(&wrapped, id));
}

#[test]
fn given_payload_with_descriptive_fields_when_finding_then_fields_are_kept() {
    let forest = single();
    let frankfurt = find_by_id(&forest, "Z").unwrap();
    assert_eq!(frankfurt.data.level.as_deref(), Some("Level 3"));
    assert_eq!(frankfurt.data.attributes.get("currency"), Some(&json!("EUR")));
}

#[test]
fn given_multiple_roots_when_listing_ids_then_roots_in_order() {
    let forest = Forest::from_json_value(json!([
        {"id": "R1", "name": "R1", "data": {"id": "R1"},
         "children": [{"id": "R1a", "name": "R1a", "data": {"id": "R1a"}}]},
        {"id": "R2", "name": "R2", "data": {"id": "R2"}}
    ]))
    .unwrap();
    assert_eq!(all_ids(&forest), vec!["R1", "R1a", "R2"]);
    assert_eq!(forest.root_ids(), vec!["R1", "R2"]);
}
