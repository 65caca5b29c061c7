//! Contract compliance tests for core_types
//!
//! These tests verify the public surface other components rely on.

use core_types::{Callable, Key, LogicId, MappingRef, RuntimeError, RuntimeResult, SequenceRef, Value};

#[cfg(test)]
mod value_contract_tests {
    use super::*;

    /// Contract: Value must have every variant of the data model
    #[test]
    fn test_value_has_all_variants() {
        let values = vec![
            Value::Absent,
            Value::Null,
            Value::Boolean(true),
            Value::Int(0),
            Value::Float(0.0),
            Value::String(String::new()),
            Value::Sequence(SequenceRef::new()),
            Value::Mapping(MappingRef::new()),
            Value::Function(Callable::logic(LogicId(0), None)),
        ];
        assert_eq!(values.len(), 9);
    }

    /// Contract: Absent and Null are distinguishable
    #[test]
    fn test_absent_distinct_from_null() {
        assert_ne!(Value::Absent, Value::Null);
        assert!(Value::Absent.is_absent());
        assert!(!Value::Null.is_absent());
    }

    /// Contract: copying a reference never copies the referent
    #[test]
    fn test_reference_semantics() {
        let seq = SequenceRef::new();
        let a = Value::Sequence(seq.clone());
        let b = a.clone();
        seq.push(Value::Int(1));
        assert_eq!(b.as_sequence().unwrap().len(), 1);
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod referent_contract_tests {
    use super::*;

    /// Contract: both referent shapes carry a first-class metatable slot
    #[test]
    fn test_metatable_slots() {
        let meta = MappingRef::new();
        let m = MappingRef::new();
        let s = SequenceRef::new();
        m.set_metatable(Some(meta.clone()));
        s.set_metatable(Some(meta.clone()));
        assert!(m.metatable().unwrap().ptr_eq(&meta));
        assert!(s.metatable().unwrap().ptr_eq(&meta));
        // The metatable is not ordinary content
        assert!(m.is_empty());
        assert!(s.is_empty());
    }

    /// Contract: prototype links reject cycles
    #[test]
    fn test_prototype_cycle_contract() {
        let m = MappingRef::new();
        let result: RuntimeResult<()> = m.set_prototype(Some(m.clone()));
        assert_eq!(result, Err(RuntimeError::PrototypeCycle));
    }

    /// Contract: keys round-trip to values
    #[test]
    fn test_key_to_value() {
        assert_eq!(Key::from("a").to_value(), Value::from("a"));
        assert_eq!(Key::from(3).to_value(), Value::Int(3));
    }
}

#[cfg(test)]
mod callable_contract_tests {
    use super::*;

    /// Contract: native callables run host code
    #[test]
    fn test_native_callable_invocation() {
        let f = Callable::native("inc", |args| match args.first() {
            Some(Value::Int(n)) => Ok(Value::Int(n + 1)),
            _ => Ok(Value::Null),
        });
        match f {
            Callable::Native(native) => {
                assert_eq!(native.invoke(&[Value::Int(1)]), Ok(Value::Int(2)));
            }
            other => panic!("expected native callable, got {:?}", other),
        }
    }

    /// Contract: logic callables carry their home profile
    #[test]
    fn test_logic_callable_home() {
        match Callable::logic(LogicId(4), Some("lua")) {
            Callable::Logic { id, home } => {
                assert_eq!(id, LogicId(4));
                assert_eq!(home.as_deref(), Some("lua"));
            }
            other => panic!("expected logic callable, got {:?}", other),
        }
    }
}
