//! Contract tests for the primitive operation library
//!
//! The runtime relies on these properties of every primitive.

use core_types::{Key, MappingRef, Value};
use primitives::{ContainerOps, PrimitiveOp};

/// Contract: primitives never consult the prototype chain
#[test]
fn test_get_is_raw() {
    let parent = MappingRef::from_pairs([("inherited", Value::Int(1))]);
    let child = MappingRef::new();
    child.set_prototype(Some(parent)).unwrap();
    assert_eq!(
        ContainerOps::get(&Value::Mapping(child), &Value::from("inherited")),
        Ok(Value::Absent)
    );
}

/// Contract: primitives never consult metatables
#[test]
fn test_len_ignores_metatable() {
    let meta = MappingRef::new();
    meta.set(Key::from("length"), Value::Int(99));
    let seq = Value::sequence(vec![Value::Int(1)]);
    seq.as_sequence().unwrap().set_metatable(Some(meta));
    assert_eq!(PrimitiveOp::Len.apply(&[seq]), Ok(Value::Int(1)));
}

/// Contract: container mutation acts on the shared referent
#[test]
fn test_mutation_is_shared() {
    let seq = Value::sequence(vec![]);
    let alias = seq.clone();
    PrimitiveOp::Append.apply(&[alias, Value::Int(7)]).unwrap();
    assert_eq!(ContainerOps::len(&seq), Ok(Value::Int(1)));
}

/// Contract: operations that build containers return fresh referents
#[test]
fn test_builders_return_fresh_referents() {
    let a = PrimitiveOp::NewSequence.apply(&[]).unwrap();
    let b = PrimitiveOp::NewSequence.apply(&[]).unwrap();
    assert!(!a.same(&b));
}

/// Contract: failures are values, never panics
#[test]
fn test_type_errors_are_reported() {
    for op in [PrimitiveOp::Add, PrimitiveOp::Lt, PrimitiveOp::Upper] {
        let (min, _) = op.arity();
        let args = vec![Value::mapping(); min];
        assert!(op.apply(&args).is_err(), "{} accepted mappings", op);
    }
}
