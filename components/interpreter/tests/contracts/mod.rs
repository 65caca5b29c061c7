//! Contract tests for interpreter API
//!
//! These tests verify the public API keeps its documented guarantees.

use core_types::{LogicId, RuntimeError, Value};
use interpreter::{Operator, ProfileSpec, Resolver, Runtime, RuntimeConfig};

/// Runtime::new() registers every bundled profile
#[test]
fn test_runtime_new_contract() {
    let rt = Runtime::new().unwrap();
    let mut expected: Vec<String> = ProfileSpec::BUNDLED.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(rt.profile_names(), expected);
}

/// Every operation that names a profile rejects an unregistered one
#[test]
fn test_unknown_profile_contract() {
    let mut rt = Runtime::new().unwrap();
    let v = Value::Int(1);
    assert!(matches!(rt.truthy("cobol", &v), Err(RuntimeError::UnknownProfile(_))));
    assert!(matches!(
        rt.binary("cobol", Operator::Add, &v, &v),
        Err(RuntimeError::UnknownProfile(_))
    ));
    assert!(matches!(rt.wrap("cobol", v), Err(RuntimeError::UnknownProfile(_))));
}

/// Truthiness and out-of-range indexing never fail
#[test]
fn test_total_functions_contract() {
    let mut rt = Runtime::new().unwrap();
    let seq = Value::sequence(vec![]);
    for profile in ProfileSpec::BUNDLED {
        for v in [Value::Absent, Value::Null, Value::Float(f64::NAN), seq.clone()] {
            assert!(rt.truthy(profile, &v).is_ok());
        }
        assert_eq!(rt.index_get(profile, &seq, &Value::Int(100)).unwrap(), Value::Absent);
        assert_eq!(rt.index_get(profile, &seq, &Value::from("k")).unwrap(), Value::Absent);
    }
}

/// Errors raised under a profile name that profile
#[test]
fn test_error_scope_contract() {
    let mut rt = Runtime::new().unwrap();
    let errors = [
        rt.resolve("ruby", "nope").unwrap_err(),
        rt.binary("c", Operator::Add, &Value::from("a"), &Value::Int(1)).unwrap_err(),
        rt.get_member("php", &Value::mapping(), "nope").unwrap_err(),
        rt.call("lua", &Value::Null, &[]).unwrap_err(),
        rt.set_metatable("js", &Value::from("s"), &Value::mapping()).unwrap_err(),
    ];
    let scopes: Vec<Option<&str>> = errors.iter().map(|e| e.scope()).collect();
    assert_eq!(
        scopes,
        vec![Some("ruby"), Some("c"), Some("php"), Some("lua"), Some("js")]
    );
}

/// The runtime itself is a Resolver
#[test]
fn test_resolver_trait_contract() {
    fn lookup(r: &mut dyn Resolver) -> Value {
        r.resolve("py", "None").unwrap()
    }
    let mut rt = Runtime::new().unwrap();
    assert_eq!(lookup(&mut rt), Value::Null);
}

/// Unknown logic ids are reported, not panicked on
#[test]
fn test_unknown_logic_contract() {
    let mut rt = Runtime::new().unwrap();
    assert_eq!(
        rt.execute_under("js", LogicId(99), &[]).unwrap_err(),
        RuntimeError::UnknownLogic(99)
    );
}

/// Default configuration values
#[test]
fn test_config_defaults_contract() {
    let config = RuntimeConfig::default();
    assert_eq!(config.ghost_prefix.as_deref(), Some("ghost_"));
    assert_eq!(config.max_prototype_depth, 64);
    assert_eq!(config.max_call_depth, 64);
}
