use decl_domain::value::{ConfigValue, PropertyValue, ValueKind};
use serde_json::json;

#[test]
fn integer_fields_reject_out_of_range_values() {
    assert_eq!(i32::from_value(&PropertyValue::Int(42)), Some(42));
    assert_eq!(i32::from_value(&PropertyValue::Int(i64::from(i32::MAX) + 1)), None);
    assert_eq!(u32::from_value(&PropertyValue::Int(-1)), None);
    assert_eq!(i32::from_value(&PropertyValue::Text("42".to_owned())), None);
}

#[test]
fn doubles_accept_integer_representations() {
    assert_eq!(f64::from_value(&PropertyValue::Int(3)), Some(3.0));
    assert_eq!(
        Vec::<f64>::from_value(&PropertyValue::IntList(vec![1, 2])),
        Some(vec![1.0, 2.0])
    );
}

#[test]
fn parse_respects_arity_of_scalar_kinds() {
    assert_eq!(ValueKind::Int.parse(&["12"]), Some(PropertyValue::Int(12)));
    assert_eq!(ValueKind::Int.parse(&["1", "2"]), None);
    assert_eq!(ValueKind::Int.parse(&[]), None);
    assert_eq!(ValueKind::Bool.parse(&[" TRUE "]), Some(PropertyValue::Bool(true)));
    assert_eq!(ValueKind::Bool.parse(&["yes"]), None);
}

#[test]
fn parse_lists_item_by_item() {
    assert_eq!(ValueKind::IntList.parse(&["1", "2", "3"]), Some(PropertyValue::IntList(vec![1, 2, 3])));
    assert_eq!(ValueKind::IntList.parse(&["1", "x"]), None);
    assert_eq!(ValueKind::TextList.parse(&[]), Some(PropertyValue::TextList(Vec::new())));
}

#[test]
fn property_value_serializes_with_kind_tag() {
    let value = PropertyValue::IntList(vec![4, 2]);
    let raw = serde_json::to_value(&value).expect("serialize");
    assert_eq!(raw, json!({ "kind": "int_list", "value": [4, 2] }));

    let back: PropertyValue = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(back.kind(), ValueKind::IntList);
}

#[test]
fn display_joins_lists() {
    assert_eq!(PropertyValue::TextList(vec!["a".to_owned(), "b".to_owned()]).to_string(), "[a, b]");
    assert_eq!(PropertyValue::Int(7).to_string(), "7");
}
