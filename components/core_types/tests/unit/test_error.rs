//! Unit tests for RuntimeError

use core_types::{RuntimeError, Value};

#[cfg(test)]
mod error_message_tests {
    use super::*;

    #[test]
    fn test_name_not_found_names_scope_and_identifier() {
        let err = RuntimeError::NameNotFound {
            scope: "ruby".to_string(),
            name: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "[ruby] name 'ghost' not found");
    }

    #[test]
    fn test_type_mismatch_helper() {
        let err = RuntimeError::type_mismatch(
            "c",
            "add",
            &[&Value::sequence(vec![]), &Value::Float(1.0)],
        );
        match &err {
            RuntimeError::TypeMismatch {
                scope,
                operator,
                operands,
            } => {
                assert_eq!(scope, "c");
                assert_eq!(operator, "add");
                assert_eq!(operands, "sequence and float");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unary_type_mismatch_has_single_operand() {
        let err = RuntimeError::type_mismatch("lua", "neg", &[&Value::from("x")]);
        assert_eq!(err.to_string(), "[lua] type mismatch in 'neg': string");
    }

    #[test]
    fn test_invalid_metatable_target_message() {
        let err = RuntimeError::InvalidMetatableTarget {
            scope: "lua".to_string(),
            operator: "setmetatable".to_string(),
            type_name: "int".to_string(),
        };
        assert!(err.to_string().contains("cannot carry a metatable"));
        assert_eq!(err.scope(), Some("lua"));
    }

    #[test]
    fn test_property_not_found_message() {
        let err = RuntimeError::PropertyNotFound {
            scope: "php".to_string(),
            name: "frobnicate".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "[php] property or method 'frobnicate' not found"
        );
    }
}

#[cfg(test)]
mod error_scope_tests {
    use super::*;

    #[test]
    fn test_every_profile_error_reports_scope() {
        let errors = vec![
            RuntimeError::NotCallable {
                scope: "js".to_string(),
                type_name: "int".to_string(),
            },
            RuntimeError::ArityMismatch {
                scope: "js".to_string(),
                name: "logic#0".to_string(),
                expected: 2,
                got: 1,
            },
            RuntimeError::CallDepthExceeded {
                scope: "js".to_string(),
                limit: 4,
            },
            RuntimeError::Primitive {
                scope: "js".to_string(),
                operator: "div".to_string(),
                message: "division by zero".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(err.scope(), Some("js"), "{}", err);
        }
    }

    #[test]
    fn test_registry_errors_have_no_scope() {
        assert_eq!(RuntimeError::UnknownProfile("cobol".into()).scope(), None);
        assert_eq!(
            RuntimeError::UnknownProfile("cobol".into()).to_string(),
            "unknown profile 'cobol'"
        );
    }

    #[test]
    fn test_errors_compare_structurally() {
        let a = RuntimeError::UnknownLogic(1);
        assert_eq!(a.clone(), RuntimeError::UnknownLogic(1));
        assert_ne!(a, RuntimeError::UnknownLogic(2));
    }
}
