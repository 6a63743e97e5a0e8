//! Unit tests for the dynamic object model

use dynamic_value::object::{get, get_object};
use dynamic_value::{
    has, is_dynamic_object, is_empty_object, parse_json, to_key_value_list, DynamicList,
    DynamicObject, Value,
};

#[cfg(test)]
mod accessor_tests {
    use super::*;

    #[test]
    fn test_get_on_absent_object_is_default() {
        assert_eq!(get::<i32>(None, "x"), 0);
        assert_eq!(get::<String>(None, "x"), "");
        assert_eq!(get::<Vec<bool>>(None, "x"), Vec::<bool>::new());
        assert_eq!(get::<Option<f64>>(None, "x"), None);
    }

    #[test]
    fn test_get_coerces_stored_text() {
        let obj: DynamicObject = [("width", "120"), ("visible", "true")].into_iter().collect();
        assert_eq!(get::<u32>(Some(&obj), "width"), 120);
        assert!(get::<bool>(Some(&obj), "visible"));
    }

    #[test]
    fn test_get_missing_key_is_default() {
        let obj = DynamicObject::new();
        assert_eq!(obj.get::<f64>("ratio"), 0.0);
    }

    #[test]
    fn test_get_object_from_json_text_member() {
        let obj = DynamicObject::new();
        obj.set("data", r#"{"id":7}"#);
        let data = get_object(Some(&obj), "data").unwrap();
        assert_eq!(data.get::<i64>("id"), 7);
    }

    #[test]
    fn test_get_object_absent() {
        let obj = DynamicObject::new();
        obj.set("n", 1);
        assert!(get_object(Some(&obj), "n").is_none());
        assert!(get_object(Some(&obj), "missing").is_none());
        assert!(get_object(None, "n").is_none());
    }

    #[test]
    fn test_has() {
        let obj = DynamicObject::new();
        obj.set("present", Value::Null);
        assert!(has(Some(&obj), "present"));
        assert!(!has(Some(&obj), "absent"));
        assert!(!has(None, "present"));
    }
}

#[cfg(test)]
mod shape_tests {
    use super::*;

    #[derive(Debug, serde::Serialize)]
    struct Attrs {
        id: String,
    }

    #[test]
    fn test_is_dynamic_object_matches_mapping_only() {
        assert!(is_dynamic_object(&Value::Object(DynamicObject::new())));
        assert!(!is_dynamic_object(&Value::List(DynamicList::new())));
        assert!(!is_dynamic_object(&Value::from("{}")));
        assert!(!is_dynamic_object(&Value::typed(Attrs {
            id: "main".to_string()
        })));
    }

    #[test]
    fn test_is_empty_object() {
        let obj = DynamicObject::new();
        assert!(is_empty_object(&Value::Object(obj.clone())));
        obj.set("k", false);
        assert!(!is_empty_object(&Value::Object(obj)));
        assert!(!is_empty_object(&Value::Null));
    }

    #[test]
    fn test_key_value_list_keeps_insertion_order() {
        let value = parse_json(r#"{"b":1,"a":2,"c":3}"#).unwrap();
        let keys: Vec<String> = to_key_value_list(value.as_object())
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_key_value_list_of_nothing_is_empty() {
        assert!(to_key_value_list(None).is_empty());
        assert!(to_key_value_list(Some(&DynamicObject::new())).is_empty());
    }

    #[test]
    fn test_remove_and_len() {
        let obj: DynamicObject = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(obj.remove("a"), Some(Value::Int(1)));
        assert_eq!(obj.remove("a"), None);
        assert_eq!(obj.len(), 1);
    }
}
