//! Overlay and metamethod dispatcher integration tests
//!
//! Verifies truthiness, indexing, coercion and override precedence for one
//! referent viewed through several profiles.

use core_types::{MappingRef, RuntimeError, Value};
use integration_tests::{metatable, runtime, Probe};
use interpreter::Operator;

// ============================================================================
// Truthiness
// ============================================================================

#[test]
fn test_zero_truthiness_diverges() {
    let rt = runtime();
    let zero = Value::Int(0);
    assert!(!rt.truthy("js", &zero).unwrap());
    assert!(!rt.truthy("php", &zero).unwrap());
    assert!(!rt.truthy("py", &zero).unwrap());
    assert!(!rt.truthy("c", &zero).unwrap());
    assert!(rt.truthy("lua", &zero).unwrap());
    assert!(rt.truthy("ruby", &zero).unwrap());
}

#[test]
fn test_string_and_container_truthiness() {
    let rt = runtime();
    let empty = Value::sequence(vec![]);
    assert!(rt.truthy("js", &empty).unwrap());
    assert!(!rt.truthy("php", &empty).unwrap());
    assert!(!rt.truthy("py", &empty).unwrap());
    assert!(!rt.truthy("php", &Value::from("0")).unwrap());
    assert!(rt.truthy("js", &Value::from("0")).unwrap());
    assert!(!rt.truthy("js", &Value::from("")).unwrap());
    assert!(rt.truthy("ruby", &Value::from("")).unwrap());
}

// ============================================================================
// Indexing
// ============================================================================

#[test]
fn test_index_bases_address_same_slot() {
    let mut rt = runtime();
    let seq = Value::sequence(vec![Value::from("a"), Value::from("b"), Value::from("c")]);
    for (profile, index) in [("lua", 1), ("js", 0), ("ruby", 0), ("py", 0), ("php", 0), ("c", 0)] {
        assert_eq!(
            rt.index_get(profile, &seq, &Value::Int(index)).unwrap(),
            Value::from("a"),
            "{}[{}]",
            profile,
            index
        );
    }

    rt.index_set("lua", &seq, &Value::Int(2), Value::from("B")).unwrap();
    assert_eq!(rt.index_get("js", &seq, &Value::Int(1)).unwrap(), Value::from("B"));
}

#[test]
fn test_negative_indices_only_where_enabled() {
    let mut rt = runtime();
    let seq = Value::sequence(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(rt.index_get("py", &seq, &Value::Int(-1)).unwrap(), Value::Int(2));
    assert_eq!(rt.index_get("ruby", &seq, &Value::Int(-2)).unwrap(), Value::Int(1));
    assert_eq!(rt.index_get("js", &seq, &Value::Int(-1)).unwrap(), Value::Absent);
    assert_eq!(rt.index_get("lua", &seq, &Value::Int(0)).unwrap(), Value::Absent);
}

#[test]
fn test_string_index_write_rejected() {
    let mut rt = runtime();
    let err = rt
        .index_set("js", &Value::from("abc"), &Value::Int(0), Value::from("x"))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
}

// ============================================================================
// Shared identity
// ============================================================================

#[test]
fn test_property_visible_across_overlays() {
    let mut rt = runtime();
    let obj = Value::mapping();
    let in_ruby = rt.wrap("ruby", obj.clone()).unwrap();
    let in_py = rt.wrap("py", obj.clone()).unwrap();

    rt.set_member(in_ruby.profile(), in_ruby.value(), "p", Value::Int(1)).unwrap();
    assert_eq!(rt.get_member(in_py.profile(), in_py.value(), "p").unwrap(), Value::Int(1));
    assert!(in_ruby.value().same(in_py.value()));
}

// ============================================================================
// Coercion
// ============================================================================

#[test]
fn test_mixed_addition_per_profile() {
    let mut rt = runtime();
    let one = Value::from("1");
    assert_eq!(rt.binary("js", Operator::Add, &one, &Value::Int(1)).unwrap(), Value::from("11"));
    assert_eq!(rt.binary("lua", Operator::Add, &one, &Value::Int(1)).unwrap(), Value::Int(2));
    assert_eq!(
        rt.binary("php", Operator::Add, &Value::from("42"), &Value::Int(8)).unwrap(),
        Value::Int(50)
    );
    match rt.binary("py", Operator::Add, &one, &Value::Int(1)) {
        Err(RuntimeError::TypeMismatch { scope, .. }) => assert_eq!(scope, "py"),
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
    assert!(rt.binary("c", Operator::Add, &one, &Value::Int(1)).is_err());
}

#[test]
fn test_division_per_profile() {
    let mut rt = runtime();
    let (seven, two) = (Value::Int(7), Value::Int(2));
    assert_eq!(rt.binary("js", Operator::Div, &seven, &two).unwrap(), Value::Float(3.5));
    assert_eq!(rt.binary("c", Operator::Div, &seven, &two).unwrap(), Value::Int(3));
    assert_eq!(rt.binary("ruby", Operator::Div, &seven, &two).unwrap(), Value::Int(3));
    assert!(rt.binary("py", Operator::Div, &seven, &Value::Int(0)).is_err());
}

#[test]
fn test_loose_equality_per_profile() {
    let mut rt = runtime();
    let (one, text) = (Value::Int(1), Value::from("1"));
    assert_eq!(rt.binary("js", Operator::Eq, &one, &text).unwrap(), Value::Boolean(true));
    assert_eq!(rt.binary("php", Operator::Eq, &one, &text).unwrap(), Value::Boolean(true));
    assert_eq!(rt.binary("lua", Operator::Eq, &one, &text).unwrap(), Value::Boolean(false));
    assert_eq!(rt.binary("py", Operator::Eq, &one, &text).unwrap(), Value::Boolean(false));
}

#[test]
fn test_display_text_per_profile() {
    let rt = runtime();
    assert_eq!(rt.stringify("lua", &Value::Null).unwrap(), "nil");
    assert_eq!(rt.stringify("py", &Value::Boolean(true)).unwrap(), "True");
    assert_eq!(rt.stringify("php", &Value::Boolean(true)).unwrap(), "1");
    assert_eq!(rt.stringify("c", &Value::Null).unwrap(), "NULL");
}

// ============================================================================
// Metamethod precedence
// ============================================================================

#[test]
fn test_left_override_wins_over_right() {
    let mut rt = runtime();
    let probe = Probe::new();
    let left = Value::mapping();
    let right = Value::sequence(vec![]);
    rt.set_metatable("lua", &left, &metatable("add", probe.handler("L", Value::Int(1))))
        .unwrap();
    rt.set_metatable("lua", &right, &metatable("__add", probe.handler("R", Value::Int(2))))
        .unwrap();

    for profile in ["js", "lua", "ruby", "php", "py", "c"] {
        assert_eq!(rt.binary(profile, Operator::Add, &left, &right).unwrap(), Value::Int(1));
    }
    assert!(probe.fired().iter().all(|f| f.starts_with("L(")));
}

#[test]
fn test_right_override_receives_right_first() {
    let mut rt = runtime();
    let probe = Probe::new();
    let obj = Value::mapping();
    rt.set_metatable("js", &obj, &metatable("sub", probe.handler("sub", Value::Null)))
        .unwrap();
    rt.binary("ruby", Operator::Sub, &Value::Int(5), &obj).unwrap();
    assert_eq!(probe.fired(), vec!["sub(mapping,int)".to_string()]);
}

#[test]
fn test_override_beats_profile_default() {
    let mut rt = runtime();
    let probe = Probe::new();
    let seq = Value::sequence(vec![Value::Int(1), Value::Int(2)]);
    rt.set_metatable("lua", &seq, &metatable("__len", probe.handler("len", Value::Int(99))))
        .unwrap();
    assert_eq!(rt.unary("py", Operator::Length, &seq).unwrap(), Value::Int(99));
    assert_eq!(probe.fired(), vec!["len(sequence)".to_string()]);
}

#[test]
fn test_metatable_prototype_is_not_consulted() {
    let mut rt = runtime();
    let probe = Probe::new();
    let base = metatable("add", probe.handler("inherited", Value::Null));
    let meta = Value::mapping();
    rt.set_prototype("lua", &meta, &base).unwrap();
    let obj = Value::mapping();
    rt.set_metatable("lua", &obj, &meta).unwrap();
    assert!(rt.binary("lua", Operator::Add, &obj, &Value::Int(1)).is_err());
    assert!(probe.fired().is_empty());
}

#[test]
fn test_metatable_on_number_rejected() {
    let rt = runtime();
    let err = rt
        .set_metatable("lua", &Value::Int(3), &Value::mapping())
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidMetatableTarget { .. }));
}

// ============================================================================
// Prototype chain
// ============================================================================

#[test]
fn test_prototype_fallback_and_unlink() {
    let mut rt = runtime();
    let parent = Value::Mapping(MappingRef::from_pairs([("species", Value::from("cat"))]));
    let child = Value::mapping();
    rt.set_prototype("js", &child, &parent).unwrap();
    assert_eq!(rt.get_member("js", &child, "species").unwrap(), Value::from("cat"));

    rt.set_prototype("js", &child, &Value::Null).unwrap();
    assert!(matches!(
        rt.get_member("js", &child, "species"),
        Err(RuntimeError::PropertyNotFound { .. })
    ));
}

#[test]
fn test_prototype_cycle_rejected() {
    let rt = runtime();
    let a = Value::mapping();
    let b = Value::mapping();
    rt.set_prototype("js", &b, &a).unwrap();
    assert!(matches!(
        rt.set_prototype("js", &a, &b),
        Err(RuntimeError::PrototypeCycle)
    ));
    assert!(matches!(
        rt.set_prototype("js", &a, &a),
        Err(RuntimeError::PrototypeCycle)
    ));
}
