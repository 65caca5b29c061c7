//! Unit tests for Value

use core_types::{Callable, Key, MappingRef, Value};

#[cfg(test)]
mod value_type_tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Absent.type_name(), "absent");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Boolean(true).type_name(), "boolean");
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Float(1.5).type_name(), "float");
        assert_eq!(Value::from("s").type_name(), "string");
        assert_eq!(Value::sequence(vec![]).type_name(), "sequence");
        assert_eq!(Value::mapping().type_name(), "mapping");
        assert_eq!(
            Value::from(Callable::native("f", |_| Ok(Value::Null))).type_name(),
            "function"
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from(3i32), Value::Int(3));
        assert_eq!(Value::from(3usize), Value::Int(3));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from(String::from("x")), Value::from("x"));
    }

    #[test]
    fn test_int_and_float_are_distinct_variants() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Int(1).as_f64(), Value::Float(1.0).as_f64());
    }

    #[test]
    fn test_referent_predicates() {
        assert!(Value::mapping().is_referent());
        assert!(Value::sequence(vec![]).is_referent());
        assert!(!Value::from("abc").is_referent());
        assert!(Value::Float(0.5).is_number());
    }
}

#[cfg(test)]
mod value_identity_tests {
    use super::*;

    #[test]
    fn test_clone_shares_mapping() {
        let original = Value::mapping();
        let alias = original.clone();
        alias
            .as_mapping()
            .unwrap()
            .set(Key::from("p"), Value::Int(1));
        assert_eq!(
            original.as_mapping().unwrap().get_own(&Key::from("p")),
            Some(Value::Int(1))
        );
        assert!(original.same(&alias));
    }

    #[test]
    fn test_scalar_same_is_value_equality() {
        assert!(Value::from("a").same(&Value::from("a")));
        assert!(!Value::Int(1).same(&Value::Int(2)));
    }

    #[test]
    fn test_metatable_visible_through_value() {
        let meta = MappingRef::new();
        let seq = Value::sequence(vec![Value::Int(1)]);
        seq.as_sequence().unwrap().set_metatable(Some(meta.clone()));
        assert!(seq.metatable().unwrap().ptr_eq(&meta));
        assert!(Value::Int(1).metatable().is_none());
    }
}

#[cfg(test)]
mod value_display_tests {
    use super::*;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_display_mapping() {
        let m = MappingRef::from_pairs([("name", Value::from("Hippo")), ("age", Value::Int(3))]);
        assert_eq!(
            Value::Mapping(m).to_string(),
            "{\"name\": \"Hippo\", \"age\": 3}"
        );
    }

    #[test]
    fn test_display_function() {
        let f = Value::from(Callable::native("greet", |_| Ok(Value::Null)));
        assert_eq!(f.to_string(), "<function greet>");
    }
}
