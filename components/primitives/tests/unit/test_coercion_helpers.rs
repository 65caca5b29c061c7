//! Unit tests for conversion helpers used by profile coercion

use core_types::Value;
use primitives::{Arithmetic, Convert, Number};

#[test]
fn test_juggled_addition() {
    let left = Convert::leading_number("42");
    let right = Convert::leading_number("8 apples");
    assert_eq!(Arithmetic::add(&left, &right), Ok(Value::Int(50)));
}

#[test]
fn test_number_normalization() {
    assert_eq!(Number::from_value(&Value::Boolean(false)), Some(Number::Int(0)));
    assert_eq!(Number::from_value(&Value::from("1")), None);
    assert_eq!(Number::Float(2.5).into_value(), Value::Float(2.5));
    assert_eq!(Number::Int(2).as_f64(), 2.0);
}

#[test]
fn test_to_string_of_containers() {
    let seq = Value::sequence(vec![Value::from("a"), Value::Int(1)]);
    assert_eq!(Convert::to_string(&seq), Value::from("[\"a\", 1]"));
}

#[test]
fn test_to_int_of_bool_and_null() {
    assert_eq!(Convert::to_int(&Value::Boolean(true)), Ok(Value::Int(1)));
    assert_eq!(Convert::to_int(&Value::Null), Ok(Value::Int(0)));
    assert!(Convert::to_int(&Value::mapping()).is_err());
}
