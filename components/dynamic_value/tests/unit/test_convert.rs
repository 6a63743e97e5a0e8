//! Unit tests for value coercion

use dynamic_value::{convert, parse_json, ConversionError, DynamicList, Value};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
struct Margin {
    top: i32,
    left: i32,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
struct Layout {
    id: String,
    margin: Margin,
    classes: Vec<String>,
    #[serde(rename = "z-index")]
    z_index: Option<i64>,
}

#[cfg(test)]
mod primitive_tests {
    use super::*;

    #[test]
    fn test_string_five_to_int() {
        assert_eq!(convert::<i32>(&Value::from("5")).unwrap(), 5);
    }

    #[test]
    fn test_non_numeric_string_fails() {
        let err = convert::<i32>(&Value::from("abc")).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidText { .. }));
    }

    #[test]
    fn test_string_to_float() {
        assert_eq!(convert::<f64>(&Value::from("2.5")).unwrap(), 2.5);
        assert_eq!(convert::<f32>(&Value::from(3)).unwrap(), 3.0);
    }

    #[test]
    fn test_bool_to_number() {
        assert_eq!(convert::<u8>(&Value::Bool(true)).unwrap(), 1);
        assert_eq!(convert::<f64>(&Value::Bool(false)).unwrap(), 0.0);
    }

    #[test]
    fn test_char() {
        assert_eq!(convert::<char>(&Value::from("x")).unwrap(), 'x');
        assert!(convert::<char>(&Value::from("xy")).is_err());
    }

    #[test]
    fn test_containers_do_not_become_scalars() {
        let list = Value::List(DynamicList::new());
        assert!(matches!(
            convert::<String>(&list),
            Err(ConversionError::Mismatch { found: "list", .. })
        ));
        assert!(convert::<i32>(&list).is_err());
    }
}

#[cfg(test)]
mod structured_tests {
    use super::*;

    #[test]
    fn test_nested_record() {
        let value = parse_json(
            r#"{"id":"box","margin":{"top":"4"},"classes":["a","b"],"z-index":"10","extra":1}"#,
        )
        .unwrap();
        let layout: Layout = convert(&value).unwrap();
        assert_eq!(
            layout,
            Layout {
                id: "box".to_string(),
                margin: Margin { top: 4, left: 0 },
                classes: vec!["a".to_string(), "b".to_string()],
                z_index: Some(10),
            }
        );
    }

    #[test]
    fn test_null_record_member_gets_defaults() {
        let value = parse_json(r#"{"id":null,"margin":null}"#).unwrap();
        let layout: Layout = convert(&value).unwrap();
        assert_eq!(layout, Layout::default());
    }

    #[test]
    fn test_list_of_records() {
        let value = parse_json(r#"[{"top":1},{"left":2}]"#).unwrap();
        let margins: Vec<Margin> = convert(&value).unwrap();
        assert_eq!(margins, vec![Margin { top: 1, left: 0 }, Margin { top: 0, left: 2 }]);
    }

    #[test]
    fn test_scalar_to_record_fails() {
        assert!(convert::<Margin>(&Value::from(3)).is_err());
    }

    #[test]
    fn test_dynamic_member_inside_record() {
        #[derive(Debug, Deserialize)]
        struct Envelope {
            kind: String,
            payload: Value,
        }

        let value = parse_json(r#"{"kind":"event","payload":{"x":[1,2]}}"#).unwrap();
        let envelope: Envelope = convert(&value).unwrap();
        assert_eq!(envelope.kind, "event");
        assert_eq!(envelope.payload, parse_json(r#"{"x":[1,2]}"#).unwrap());
    }
}

#[cfg(test)]
mod declared_default_tests {
    use super::*;

    fn five() -> u32 {
        5
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Retry {
        name: String,
        #[serde(default = "five")]
        retries: u32,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    impl Default for Endpoint {
        fn default() -> Self {
            Endpoint {
                host: "localhost".to_string(),
                port: 8080,
            }
        }
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    enum Mode {
        #[default]
        Fast,
        Careful,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Job {
        name: String,
        #[serde(default)]
        mode: Mode,
    }

    #[test]
    fn test_field_default_applies_when_absent() {
        let retry: Retry = convert(&parse_json(r#"{"name":"a"}"#).unwrap()).unwrap();
        assert_eq!(retry.retries, 5);

        let value = parse_json(r#"{"name":"a","retries":"2"}"#).unwrap();
        let retry: Retry = convert(&value).unwrap();
        assert_eq!(retry.retries, 2);
    }

    #[test]
    fn test_record_default_applies_when_absent() {
        let endpoint: Endpoint = convert(&parse_json(r#"{"host":"h"}"#).unwrap()).unwrap();
        assert_eq!(
            endpoint,
            Endpoint {
                host: "h".to_string(),
                port: 8080,
            }
        );
    }

    #[test]
    fn test_enum_field_default_applies_when_absent() {
        let job: Job = convert(&parse_json(r#"{"name":"a"}"#).unwrap()).unwrap();
        assert_eq!(job.mode, Mode::Fast);

        let value = parse_json(r#"{"name":"a","mode":"Careful"}"#).unwrap();
        let job: Job = convert(&value).unwrap();
        assert_eq!(job.mode, Mode::Careful);
    }

    #[test]
    fn test_fields_without_default_still_fall_back() {
        let retry: Retry = convert(&parse_json(r#"{}"#).unwrap()).unwrap();
        assert_eq!(
            retry,
            Retry {
                name: String::new(),
                retries: 5,
            }
        );
    }

    #[test]
    fn test_declared_defaults_inside_lists() {
        let value = parse_json(r#"[{"name":"a"},{"mode":"Careful"}]"#).unwrap();
        let jobs: Vec<Job> = convert(&value).unwrap();
        assert_eq!(jobs[0].mode, Mode::Fast);
        assert_eq!(jobs[1].name, "");
        assert_eq!(jobs[1].mode, Mode::Careful);
    }

    #[test]
    fn test_typed_null_is_absent_option() {
        assert_eq!(convert::<Option<i32>>(&Value::typed(None::<i32>)).unwrap(), None);
        assert_eq!(convert::<Option<i32>>(&Value::typed(Some(4))).unwrap(), Some(4));
    }
}
