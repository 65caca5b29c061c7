//! Value store and scope resolver integration tests
//!
//! Verifies read-after-write, shadowing, ghost variables and late binding
//! through the runtime's public surface.

use core_types::{RuntimeError, Value};
use integration_tests::runtime;
use interpreter::{Expr, Logic, Runtime, RuntimeConfig};
use value_store::{GhostHook, Store, GLOBAL_SCOPE};

// ============================================================================
// Read-after-write
// ============================================================================

#[test]
fn test_read_after_write_every_scope() {
    let mut rt = runtime();
    let values = [
        Value::Null,
        Value::Boolean(false),
        Value::Int(-3),
        Value::Float(2.5),
        Value::from("text"),
    ];
    for scope in ["js", "lua", "ruby", "php", "py", "c", GLOBAL_SCOPE] {
        for (i, value) in values.iter().enumerate() {
            let name = format!("v{}", i);
            rt.set(scope, &name, value.clone());
            assert_eq!(rt.get(scope, &name), *value, "{}.{}", scope, name);
        }
    }
}

#[test]
fn test_referents_keep_identity_through_store() {
    let mut rt = runtime();
    let seq = Value::sequence(vec![]);
    rt.set("ruby", "items", seq.clone());
    assert!(rt.get("ruby", "items").same(&seq));
}

// ============================================================================
// Shadowing precedence
// ============================================================================

#[test]
fn test_profile_scope_shadows_global() {
    let mut rt = runtime();
    rt.set_shared("key", Value::from("G"));
    assert_eq!(rt.resolve("lua", "key").unwrap(), Value::from("G"));

    rt.set("lua", "key", Value::from("A"));
    assert_eq!(rt.resolve("lua", "key").unwrap(), Value::from("A"));
    assert_eq!(rt.resolve("js", "key").unwrap(), Value::from("G"));

    rt.delete("lua", "key");
    assert_eq!(rt.resolve("lua", "key").unwrap(), Value::from("G"));
}

#[test]
fn test_builtin_between_scope_and_global() {
    let mut rt = runtime();
    rt.set_shared("len", Value::from("shared"));
    // py has a `len` builtin; c does not
    assert!(matches!(rt.resolve("py", "len").unwrap(), Value::Function(_)));
    assert_eq!(rt.resolve("c", "len").unwrap(), Value::from("shared"));

    rt.set("py", "len", Value::Int(0));
    assert_eq!(rt.resolve("py", "len").unwrap(), Value::Int(0));
}

#[test]
fn test_unresolved_name_reports_scope() {
    let mut rt = runtime();
    match rt.resolve("php", "missing") {
        Err(RuntimeError::NameNotFound { scope, name }) => {
            assert_eq!(scope, "php");
            assert_eq!(name, "missing");
        }
        other => panic!("expected NameNotFound, got {:?}", other),
    }
}

// ============================================================================
// Ghost variables
// ============================================================================

#[test]
fn test_ghost_counter_reads() {
    let mut rt = runtime();
    rt.set_ghost("lua", "ctr", Value::Int(10), GhostHook::increment());
    assert_eq!(rt.get("lua", "ctr"), Value::Int(10));
    assert_eq!(rt.get("lua", "ctr"), Value::Int(11));
    assert_eq!(rt.get("lua", "ctr"), Value::Int(12));
}

#[test]
fn test_ghost_advances_through_resolution() {
    let mut rt = runtime();
    rt.set_ghost(GLOBAL_SCOPE, "tick", Value::Int(0), GhostHook::increment());
    assert_eq!(rt.resolve("js", "tick").unwrap(), Value::Int(0));
    assert_eq!(rt.resolve("ruby", "tick").unwrap(), Value::Int(1));
    assert_eq!(rt.peek(GLOBAL_SCOPE, "tick"), Value::Int(2));
    assert_eq!(rt.peek(GLOBAL_SCOPE, "tick"), Value::Int(2));
}

#[test]
fn test_ghost_prefix_convention_configurable() {
    let config = RuntimeConfig {
        ghost_prefix: None,
        ..RuntimeConfig::default()
    };
    let mut rt = Runtime::with_config(config).unwrap();
    rt.set("js", "ghost_n", Value::Int(1));
    assert_eq!(rt.get("js", "ghost_n"), Value::Int(1));
    assert_eq!(rt.get("js", "ghost_n"), Value::Int(1));
}

#[test]
fn test_ghost_custom_hook() {
    let mut store = Store::new();
    let hook = GhostHook::new("double", |v| match v {
        Value::Int(n) => Value::Int(n * 2),
        other => other.clone(),
    });
    store.set_ghost("c", "x", Value::Int(1), hook);
    assert_eq!(store.get("c", "x"), Value::Int(1));
    assert_eq!(store.get("c", "x"), Value::Int(2));
    assert_eq!(store.get("c", "x"), Value::Int(4));
}

// ============================================================================
// Late binding
// ============================================================================

#[test]
fn test_name_set_after_definition_resolves() {
    let mut rt = runtime();
    let id = rt.define_logic(Logic::new("late", &[]).returns(Expr::ident("later")));
    assert!(rt.execute_under("lua", id, &[]).is_err());

    rt.set("lua", "later", Value::from("bound"));
    assert_eq!(rt.execute_under("lua", id, &[]).unwrap().value(), &Value::from("bound"));

    rt.set("lua", "later", Value::from("rebound"));
    assert_eq!(rt.execute_under("lua", id, &[]).unwrap().value(), &Value::from("rebound"));
}
