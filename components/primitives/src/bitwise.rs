//! Bitwise operations on 64-bit integers.

use core_types::Value;

use crate::error::{OpError, OpResult};

fn int(op: &str, v: &Value) -> OpResult<i64> {
    match v {
        Value::Int(n) => Ok(*n),
        Value::Boolean(b) => Ok(i64::from(*b)),
        Value::Float(_) => v
            .as_i64()
            .ok_or_else(|| OpError::invalid(op, "operand has no integer representation")),
        _ => Err(OpError::type_mismatch(op, &[v])),
    }
}

fn shift_amount(op: &str, v: &Value) -> OpResult<u32> {
    let n = int(op, v)?;
    u32::try_from(n)
        .ok()
        .filter(|s| *s < 64)
        .ok_or_else(|| OpError::invalid(op, format!("shift amount {} out of range", n)))
}

/// Bitwise operations
pub struct Bitwise;

impl Bitwise {
    /// a & b
    pub fn and(a: &Value, b: &Value) -> OpResult<Value> {
        Ok(Value::Int(int("bit_and", a)? & int("bit_and", b)?))
    }

    /// a | b
    pub fn or(a: &Value, b: &Value) -> OpResult<Value> {
        Ok(Value::Int(int("bit_or", a)? | int("bit_or", b)?))
    }

    /// a ^ b
    pub fn xor(a: &Value, b: &Value) -> OpResult<Value> {
        Ok(Value::Int(int("bit_xor", a)? ^ int("bit_xor", b)?))
    }

    /// ~a
    pub fn not(a: &Value) -> OpResult<Value> {
        Ok(Value::Int(!int("bit_not", a)?))
    }

    /// a << b
    pub fn shl(a: &Value, b: &Value) -> OpResult<Value> {
        Ok(Value::Int(int("shl", a)? << shift_amount("shl", b)?))
    }

    /// Arithmetic a >> b
    pub fn shr(a: &Value, b: &Value) -> OpResult<Value> {
        Ok(Value::Int(int("shr", a)? >> shift_amount("shr", b)?))
    }
}
