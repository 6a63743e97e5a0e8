//! Properties that hold for every input of a given shape

use dynamic_value::object::get;
use dynamic_value::{clone_value, convert, parse_json, to_json, ConversionError, Value};

const DOCUMENTS: &[&str] = &[
    "null",
    "true",
    "0",
    "-12",
    "3.25",
    r#""""#,
    r#""quote \" and \\ slash""#,
    "[]",
    "{}",
    r#"[1,"two",[3,[4]],{"five":5}]"#,
    r#"{"z":null,"y":false,"x":{"w":[{"v":"u"}]},"t":1e3}"#,
    r#"{"unicode":"é中","empty":{},"nested":{"list":[[],{}]}}"#,
];

/// Contract: serializing a parsed document parses back to an equal graph
#[test]
fn contract_round_trip_preserves_graph() {
    for text in DOCUMENTS {
        let parsed = parse_json(text).unwrap();
        let written = to_json(&parsed).unwrap();
        assert_eq!(parse_json(&written).unwrap(), parsed, "document {}", text);
    }
}

/// Contract: member order survives a round trip
#[test]
fn contract_round_trip_preserves_key_order() {
    let text = r#"{"z":1,"a":{"q":1,"b":2},"m":[]}"#;
    assert_eq!(to_json(&parse_json(text).unwrap()).unwrap(), text);
}

/// Contract: shallow copies share children, deep copies share nothing
#[test]
fn contract_clone_identity() {
    for text in DOCUMENTS.iter().filter(|t| t.starts_with('{')) {
        let source = parse_json(text).unwrap();
        let shallow = clone_value(&source, false).unwrap();
        let deep = clone_value(&source, true).unwrap();

        let src = source.as_object().unwrap();
        let sh = shallow.as_object().unwrap();
        let dp = deep.as_object().unwrap();
        assert!(!sh.ptr_eq(src));
        assert!(!dp.ptr_eq(src));

        for (key, value) in src.to_key_value_list() {
            let shared = sh.get_value(&key).unwrap();
            let copied = dp.get_value(&key).unwrap();
            match (&value, &shared, &copied) {
                (Value::Object(a), Value::Object(b), Value::Object(c)) => {
                    assert!(a.ptr_eq(b));
                    assert!(!a.ptr_eq(c));
                }
                (Value::List(a), Value::List(b), Value::List(c)) => {
                    assert!(a.ptr_eq(b));
                    assert!(!a.ptr_eq(c));
                }
                _ => {
                    assert_eq!(value, shared);
                    assert_eq!(value, copied);
                }
            }
        }
    }
}

/// Contract: truthiness table
#[test]
fn contract_truthiness() {
    let cases = [
        ("null", false),
        (r#""""#, false),
        (r#""0""#, true),
        ("0", false),
        ("0.0", false),
        ("{}", false),
        (r#"{"a":1}"#, true),
        (r#"{"a":0}"#, true),
        (r#"{"a":null}"#, true),
        ("[]", false),
        ("[0]", true),
        ("false", false),
        ("true", true),
        ("-1", true),
    ];
    for (text, expected) in cases {
        assert_eq!(parse_json(text).unwrap().is_truthy(), expected, "{}", text);
    }
}

/// Contract: reading from an absent object never fails
#[test]
fn contract_get_on_null_is_default() {
    for key in ["x", "", "a.b", "0"] {
        assert_eq!(get::<i32>(None, key), 0);
    }
}

/// Contract: textual integers convert, other text fails
#[test]
fn contract_convert_text_to_int() {
    assert_eq!(convert::<i32>(&Value::from("5")).unwrap(), 5);
    assert!(matches!(
        convert::<i32>(&Value::from("abc")),
        Err(ConversionError::InvalidText { .. })
    ));
}
