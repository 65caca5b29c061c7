//! Equality and ordering over raw values.

use std::cmp::Ordering;

use core_types::Value;

use crate::arith::Number;
use crate::error::{OpError, OpResult};

/// Comparison operations
pub struct Comparison;

impl Comparison {
    /// Strict equality.
    ///
    /// Numbers compare numerically across `Int`/`Float`, strings and
    /// booleans by value, referents and callables by identity. `Absent` and
    /// `Null` are both "nothing" and compare equal. Values of different
    /// kinds are unequal; equality never fails.
    pub fn eq(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                match (a, b) {
                    (Value::Int(x), Value::Int(y)) => x == y,
                    _ => a.as_f64() == b.as_f64(),
                }
            }
            (Value::Absent | Value::Null, Value::Absent | Value::Null) => true,
            _ => a == b,
        }
    }

    /// Ordering of two numbers or two strings
    pub fn compare(op: &str, a: &Value, b: &Value) -> OpResult<Option<Ordering>> {
        match (a, b) {
            (Value::String(x), Value::String(y)) => Ok(Some(x.cmp(y))),
            _ => match (Number::from_value(a), Number::from_value(b)) {
                (Some(Number::Int(x)), Some(Number::Int(y))) => Ok(Some(x.cmp(&y))),
                (Some(x), Some(y)) => Ok(x.as_f64().partial_cmp(&y.as_f64())),
                _ => Err(OpError::type_mismatch(op, &[a, b])),
            },
        }
    }

    /// a < b
    pub fn lt(a: &Value, b: &Value) -> OpResult<bool> {
        Ok(Self::compare("lt", a, b)? == Some(Ordering::Less))
    }

    /// a <= b
    pub fn le(a: &Value, b: &Value) -> OpResult<bool> {
        Ok(matches!(
            Self::compare("le", a, b)?,
            Some(Ordering::Less | Ordering::Equal)
        ))
    }

    /// a > b
    pub fn gt(a: &Value, b: &Value) -> OpResult<bool> {
        Ok(Self::compare("gt", a, b)? == Some(Ordering::Greater))
    }

    /// a >= b
    pub fn ge(a: &Value, b: &Value) -> OpResult<bool> {
        Ok(matches!(
            Self::compare("ge", a, b)?,
            Some(Ordering::Greater | Ordering::Equal)
        ))
    }
}
