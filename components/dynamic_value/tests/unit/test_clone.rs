//! Unit tests for shallow and deep copies

use dynamic_value::{clone_items, clone_value, parse_json, DynamicObject, Value};

fn sample() -> Value {
    parse_json(r#"{"a":{"b":{"c":[1,{"d":2}]}},"e":"text"}"#).unwrap()
}

#[cfg(test)]
mod clone_tests {
    use super::*;

    #[test]
    fn test_copy_is_a_new_container() {
        let source = sample();
        for deep in [false, true] {
            let copy = clone_value(&source, deep).unwrap();
            assert!(!copy.as_object().unwrap().ptr_eq(source.as_object().unwrap()));
            assert_eq!(copy, source);
        }
    }

    #[test]
    fn test_shallow_copy_top_level_identity() {
        let source = sample();
        let copy = clone_value(&source, false).unwrap();
        let a1 = source.as_object().unwrap().get_object("a").unwrap();
        let a2 = copy.as_object().unwrap().get_object("a").unwrap();
        assert!(a1.ptr_eq(&a2));
    }

    #[test]
    fn test_deep_copy_distinct_at_every_depth() {
        let source = sample();
        let copy = clone_value(&source, true).unwrap();

        let b1 = source.as_object().unwrap().get_object("a").unwrap().get_object("b").unwrap();
        let b2 = copy.as_object().unwrap().get_object("a").unwrap().get_object("b").unwrap();
        assert!(!b1.ptr_eq(&b2));

        let c1 = b1.get_value("c").unwrap();
        let c2 = b2.get_value("c").unwrap();
        let (c1, c2) = (c1.as_list().unwrap(), c2.as_list().unwrap());
        assert!(!c1.ptr_eq(c2));

        let d1 = c1.get(1).unwrap();
        let d2 = c2.get(1).unwrap();
        assert!(!d1.as_object().unwrap().ptr_eq(d2.as_object().unwrap()));
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_mutating_deep_copy_leaves_original() {
        let source = sample();
        let copy = clone_value(&source, true).unwrap();
        let nested = copy.as_object().unwrap().get_object("a").unwrap();
        nested.set("b", "replaced");
        nested.set("new", true);

        assert_eq!(source, sample());
    }

    #[test]
    fn test_mutating_shallow_copy_top_level_leaves_original() {
        let source = sample();
        let copy = clone_value(&source, false).unwrap();
        copy.as_object().unwrap().set("e", "changed");
        assert_eq!(source.as_object().unwrap().get::<String>("e"), "text");
    }

    #[test]
    fn test_clone_items_shallow() {
        let obj = DynamicObject::new();
        let items = vec![Value::Object(obj.clone()), Value::from(0)];
        let copy = clone_items(items.iter(), false).unwrap();
        assert!(copy.get(0).unwrap().as_object().unwrap().ptr_eq(&obj));
    }

    #[test]
    fn test_deeply_nested_payload() {
        let depth = 100;
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let value = parse_json(&text).unwrap();
        let copy = clone_value(&value, true).unwrap();
        assert_eq!(copy, value);
    }
}
