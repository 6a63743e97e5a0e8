//! End-to-end scenarios over parsed documents

use dynamic_value::object::{get, get_object};
use dynamic_value::{clone_value, parse_json, to_key_value_list, Truthy, Value};

/// Scenario: read fields and nested objects off a parsed document
#[test]
fn scenario_read_parsed_document() {
    let value = parse_json(r#"{"name":"a","tags":["x","y"],"meta":{"n":0}}"#).unwrap();
    let obj = value.as_object();

    assert_eq!(get::<String>(obj, "name"), "a");
    assert_eq!(get::<Vec<String>>(obj, "tags"), vec!["x", "y"]);

    let meta = get_object(obj, "meta");
    assert!(meta.is_truthy());
    assert!(!meta.as_ref().unwrap().get::<i32>("n").is_truthy());

    let pairs = to_key_value_list(meta.as_ref());
    assert_eq!(pairs, vec![("n".to_string(), Value::Int(0))]);
}

/// Scenario: deep clone, then mutate the copy's nested object
#[test]
fn scenario_deep_clone_isolates_nested_mutation() {
    let original = parse_json(r#"{"outer":{"inner":{"k":"v"}}}"#).unwrap();
    let copy = clone_value(&original, true).unwrap();

    let copied_outer = get_object(copy.as_object(), "outer").unwrap();
    copied_outer.set("inner", "gone");
    copied_outer.set("added", 1);

    let outer = get_object(original.as_object(), "outer").unwrap();
    assert_eq!(outer.keys(), vec!["inner"]);
    let inner = outer.get_object("inner").unwrap();
    assert_eq!(inner.get::<String>("k"), "v");
}

/// Scenario: shallow clone shares nested objects with the source
#[test]
fn scenario_shallow_clone_shares_nested_mutation() {
    let original = parse_json(r#"{"outer":{"k":1}}"#).unwrap();
    let copy = clone_value(&original, false).unwrap();

    get_object(copy.as_object(), "outer").unwrap().set("k", 2);

    assert_eq!(get::<i32>(get_object(original.as_object(), "outer").as_ref(), "k"), 2);
}
