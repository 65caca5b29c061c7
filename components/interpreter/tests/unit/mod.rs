//! Unit tests for interpreter components

use std::io::Write;

use core_types::{Callable, MappingRef, RuntimeError, Value};
use interpreter::{
    Binding, BindingKind, ConfigError, Dispatcher, Operator, Overlay, ProfileSpec, Returns,
    Runtime, RuntimeConfig,
};
use primitives::PrimitiveOp;

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"profiles": ["py"], "max_call_depth": 4}}"#).unwrap();
    let config = RuntimeConfig::from_file(file.path()).unwrap();
    assert_eq!(config.profiles, vec!["py".to_string()]);
    assert_eq!(config.max_call_depth, 4);

    let rt = Runtime::with_config(config).unwrap();
    assert_eq!(rt.profile_names(), vec!["py".to_string()]);
}

#[test]
fn test_config_rejects_unknown_profile() {
    let config = RuntimeConfig {
        profiles: vec!["cobol".to_string()],
        ..RuntimeConfig::default()
    };
    assert!(matches!(
        Runtime::with_config(config),
        Err(ConfigError::UnknownProfile(name)) if name == "cobol"
    ));
}

#[test]
fn test_config_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{not json").unwrap();
    assert!(matches!(
        RuntimeConfig::from_file(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

// ============================================================================
// Profiles
// ============================================================================

const TOY: &str = r#"{
    "name": "toy",
    "index_base": 1,
    "falsy": ["null", "false", "empty_string"],
    "coercion": "numeric_only",
    "display": {"null": "nothing", "true": "yes", "false": "no"},
    "operators": {"div": "quot"},
    "methods": {
        "size": {"op": "len", "kind": "property"},
        "shout": {"op": "upper"},
        "add": {"op": "append", "returns": "receiver"}
    },
    "builtins": {
        "answer": 42,
        "show": {"op": "to_string"},
        "util": {"pair": {"op": "new_sequence"}}
    }
}"#;

#[test]
fn test_register_custom_profile() {
    let mut rt = Runtime::new().unwrap();
    let name = rt.register_profile_json(TOY).unwrap();
    assert_eq!(name, "toy");
    assert!(rt.profile_names().contains(&"toy".to_string()));

    assert_eq!(rt.resolve("toy", "answer").unwrap(), Value::Int(42));
    let show = rt.resolve("toy", "show").unwrap();
    assert_eq!(rt.call("toy", &show, &[Value::Boolean(true)]).unwrap(), Value::from("yes"));
    assert_eq!(
        rt.binary("toy", Operator::Div, &Value::Int(7), &Value::Int(2)).unwrap(),
        Value::Int(3)
    );
}

#[test]
fn test_custom_profile_methods() {
    let mut rt = Runtime::new().unwrap();
    rt.register_profile_json(TOY).unwrap();
    let seq = Value::sequence(vec![]);
    let returned = rt.invoke_method("toy", &seq, "add", &[Value::Int(1)]).unwrap();
    assert!(returned.same(&seq));
    assert_eq!(rt.get_member("toy", &seq, "size").unwrap(), Value::Int(1));
    assert_eq!(
        rt.invoke_method("toy", &Value::from("hi"), "shout", &[]).unwrap(),
        Value::from("HI")
    );
    assert_eq!(rt.index_get("toy", &seq, &Value::Int(1)).unwrap(), Value::Int(1));
}

#[test]
fn test_custom_profile_namespace() {
    let mut rt = Runtime::new().unwrap();
    rt.register_profile_json(TOY).unwrap();
    let util = rt.resolve("toy", "util").unwrap();
    let pair = rt.get_member("toy", &util, "pair").unwrap();
    let made = rt.call("toy", &pair, &[Value::Int(1), Value::Int(2)]).unwrap();
    assert_eq!(made.as_sequence().unwrap().len(), 2);
}

#[test]
fn test_invalid_profile_documents() {
    let mut rt = Runtime::new().unwrap();
    let bad_base = r#"{"name": "x", "index_base": 2, "falsy": [], "coercion": "juggle"}"#;
    assert!(matches!(
        rt.register_profile_json(bad_base),
        Err(ConfigError::InvalidProfile { .. })
    ));
    let bad_order = r#"{"name": "x", "falsy": [], "coercion": "juggle",
                        "builtins": {"r": {"op": "replace", "order": [0]}}}"#;
    assert!(matches!(
        rt.register_profile_json(bad_order),
        Err(ConfigError::InvalidProfile { .. })
    ));
    let unknown_field = r#"{"name": "x", "falsy": [], "coercion": "juggle", "colour": 1}"#;
    assert!(matches!(rt.register_profile_json(unknown_field), Err(ConfigError::Parse(_))));
}

#[test]
fn test_binding_defaults() {
    let binding: Binding = serde_json::from_str(r#"{"op": "len"}"#).unwrap();
    assert_eq!(binding, Binding::to(PrimitiveOp::Len));
    assert_eq!(binding.kind, BindingKind::Method);
    assert_eq!(binding.returns, Returns::Result);
}

#[test]
fn test_profile_round_trips_through_serde() {
    let spec = ProfileSpec::load_bundled("ruby").unwrap();
    let text = serde_json::to_string(&spec).unwrap();
    assert_eq!(ProfileSpec::from_json(&text).unwrap(), spec);
}

// ============================================================================
// Overlay
// ============================================================================

#[test]
fn test_overlay_truthiness_table() {
    let cases: &[(&str, Value, bool)] = &[
        ("js", Value::from(""), false),
        ("js", Value::sequence(vec![]), true),
        ("lua", Value::Int(0), true),
        ("lua", Value::from(""), true),
        ("ruby", Value::Int(0), true),
        ("php", Value::from("0"), false),
        ("php", Value::mapping(), false),
        ("py", Value::sequence(vec![]), false),
        ("py", Value::Float(0.0), false),
        ("c", Value::Int(0), false),
        ("c", Value::from(""), true),
    ];
    for (profile, value, expected) in cases {
        let overlay = Overlay::new(ProfileSpec::load_bundled(profile).unwrap()).unwrap();
        assert_eq!(overlay.truthy(value), *expected, "{} truthiness of {:?}", profile, value);
    }
}

#[test]
fn test_absent_always_falsy() {
    for name in ProfileSpec::BUNDLED {
        let overlay = Overlay::new(ProfileSpec::load_bundled(name).unwrap()).unwrap();
        assert!(!overlay.truthy(&Value::Absent), "{}", name);
    }
}

#[test]
fn test_overlay_comparisons() {
    let js = Overlay::new(ProfileSpec::load_bundled("js").unwrap()).unwrap();
    assert_eq!(
        js.binary(Operator::Lt, &Value::from("2"), &Value::Int(10)).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        js.binary(Operator::Ge, &Value::from("b"), &Value::from("a")).unwrap(),
        Value::Boolean(true)
    );
    let lua = Overlay::new(ProfileSpec::load_bundled("lua").unwrap()).unwrap();
    assert!(matches!(
        lua.binary(Operator::Lt, &Value::from("2"), &Value::Int(10)),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn test_overlay_length_and_negation() {
    let py = Overlay::new(ProfileSpec::load_bundled("py").unwrap()).unwrap();
    assert_eq!(py.unary(Operator::Length, &Value::from("héllo")).unwrap(), Value::Int(5));
    assert_eq!(py.unary(Operator::Neg, &Value::Int(3)).unwrap(), Value::Int(-3));
    assert!(py.unary(Operator::Neg, &Value::from("3")).is_err());
}

#[test]
fn test_overlay_bitwise() {
    let c = Overlay::new(ProfileSpec::load_bundled("c").unwrap()).unwrap();
    assert_eq!(
        c.binary(Operator::BitAnd, &Value::Int(6), &Value::Int(3)).unwrap(),
        Value::Int(2)
    );
    assert_eq!(
        c.binary(Operator::Shl, &Value::Int(1), &Value::Int(4)).unwrap(),
        Value::Int(16)
    );
}

// ============================================================================
// Dispatcher
// ============================================================================

#[test]
fn test_dispatcher_ignores_prototype_of_metatable() {
    let inherited = MappingRef::from_pairs([(
        "add",
        Value::Function(Callable::native("add", |_| Ok(Value::Null))),
    )]);
    let meta = MappingRef::new();
    meta.set_prototype(Some(inherited)).unwrap();
    let obj = Value::mapping();
    obj.as_mapping().unwrap().set_metatable(Some(meta));
    assert!(Dispatcher::metamethod(&obj, Operator::Add).is_none());
}

#[test]
fn test_dispatcher_sequence_metatable() {
    let seq = Value::sequence(vec![]);
    let meta = MappingRef::from_pairs([(
        "__len",
        Value::Function(Callable::native("len", |_| Ok(Value::Int(99)))),
    )]);
    seq.as_sequence().unwrap().set_metatable(Some(meta));
    let mut rt = Runtime::new().unwrap();
    assert_eq!(rt.unary("py", Operator::Length, &seq).unwrap(), Value::Int(99));
}
