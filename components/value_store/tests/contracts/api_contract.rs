//! Contract tests verifying the value_store API other components rely on.

use core_types::{Key, MappingRef, Value};
use value_store::{GhostHook, Store, GLOBAL_SCOPE};

/// Contract: set then get returns the value, for every scope
#[test]
fn contract_read_after_write() {
    let mut store = Store::new();
    let values = vec![
        Value::Null,
        Value::Boolean(false),
        Value::Int(-1),
        Value::Float(0.5),
        Value::from(""),
    ];
    for scope in ["global", "js", "lua", "ruby", "php", "py", "c"] {
        for (i, v) in values.iter().enumerate() {
            let name = format!("v{}", i);
            store.set(scope, &name, v.clone());
            assert_eq!(&store.get(scope, &name), v, "{}.{}", scope, name);
        }
    }
}

/// Contract: stored referents are the same referent on read
#[test]
fn contract_referents_not_copied() {
    let mut store = Store::new();
    let obj = MappingRef::new();
    store.set(GLOBAL_SCOPE, "obj", Value::Mapping(obj.clone()));
    obj.set(Key::from("late"), Value::Int(1));
    let read = store.get(GLOBAL_SCOPE, "obj");
    assert_eq!(
        read.as_mapping().unwrap().get_own(&Key::from("late")),
        Some(Value::Int(1))
    );
}

/// Contract: ghost reads return the old value, then advance
#[test]
fn contract_ghost_return_old_then_advance() {
    let mut store = Store::new();
    store.set_ghost("lua", "ctr", Value::Int(10), GhostHook::increment());
    let reads: Vec<Value> = (0..3).map(|_| store.get("lua", "ctr")).collect();
    assert_eq!(reads, vec![Value::Int(10), Value::Int(11), Value::Int(12)]);
}

/// Contract: an absent ghost starts counting at zero
#[test]
fn contract_ghost_from_nothing() {
    let mut store = Store::new();
    store.set_ghost("js", "n", Value::Absent, GhostHook::increment());
    assert_eq!(store.get("js", "n"), Value::Absent);
    assert_eq!(store.get("js", "n"), Value::Int(0));
}

/// Contract: unknown scopes are not created by reads
#[test]
fn contract_reads_do_not_create_scopes() {
    let mut store = Store::new();
    let _ = store.get("cobol", "x");
    assert!(!store.has_scope("cobol"));
}
