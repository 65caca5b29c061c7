//! Arithmetic over raw numbers.
//!
//! Operands must already be numeric (`Int`, `Float` or `Boolean`); profile
//! coercion happens before these functions are reached. Integer operations
//! stay integral and fall back to floating point on overflow.

use core_types::Value;
use num_integer::Integer;
use num_traits::ToPrimitive;

use crate::error::{OpError, OpResult};

/// A numeric operand, normalized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integral operand
    Int(i64),
    /// Floating-point operand
    Float(f64),
}

impl Number {
    /// Read a numeric operand; booleans count as 0 and 1
    pub fn from_value(v: &Value) -> Option<Number> {
        match v {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Boolean(b) => Some(Number::Int(i64::from(*b))),
            _ => None,
        }
    }

    /// Widen to `f64`
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// Back into a value
    pub fn into_value(self) -> Value {
        match self {
            Number::Int(n) => Value::Int(n),
            Number::Float(f) => Value::Float(f),
        }
    }
}

fn operands(op: &str, a: &Value, b: &Value) -> OpResult<(Number, Number)> {
    match (Number::from_value(a), Number::from_value(b)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(OpError::type_mismatch(op, &[a, b])),
    }
}

fn integral(
    op: &str,
    a: &Value,
    b: &Value,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> OpResult<Value> {
    let (x, y) = operands(op, a, b)?;
    if let (Number::Int(l), Number::Int(r)) = (x, y) {
        if let Some(n) = int_op(l, r) {
            return Ok(Value::Int(n));
        }
    }
    Ok(Value::Float(float_op(x.as_f64(), y.as_f64())))
}

fn int_divisor(op: &str, y: Number) -> OpResult<()> {
    match y {
        Number::Int(0) => Err(OpError::DivisionByZero { op: op.to_string() }),
        _ => Ok(()),
    }
}

/// Arithmetic operations
pub struct Arithmetic;

impl Arithmetic {
    /// a + b
    pub fn add(a: &Value, b: &Value) -> OpResult<Value> {
        integral("add", a, b, i64::checked_add, |x, y| x + y)
    }

    /// a - b
    pub fn sub(a: &Value, b: &Value) -> OpResult<Value> {
        integral("sub", a, b, i64::checked_sub, |x, y| x - y)
    }

    /// a * b
    pub fn mul(a: &Value, b: &Value) -> OpResult<Value> {
        integral("mul", a, b, i64::checked_mul, |x, y| x * y)
    }

    /// IEEE division: always a float, zero divisors yield infinities or NaN
    pub fn div(a: &Value, b: &Value) -> OpResult<Value> {
        let (x, y) = operands("div", a, b)?;
        Ok(Value::Float(x.as_f64() / y.as_f64()))
    }

    /// Float division that rejects a zero divisor
    pub fn checked_div(a: &Value, b: &Value) -> OpResult<Value> {
        let (x, y) = operands("checked_div", a, b)?;
        if y.as_f64() == 0.0 {
            return Err(OpError::DivisionByZero {
                op: "checked_div".to_string(),
            });
        }
        Ok(Value::Float(x.as_f64() / y.as_f64()))
    }

    /// Truncating integer quotient for two integers, checked float division otherwise
    pub fn quot(a: &Value, b: &Value) -> OpResult<Value> {
        let (x, y) = operands("quot", a, b)?;
        match (x, y) {
            (Number::Int(l), Number::Int(r)) => {
                int_divisor("quot", y)?;
                Ok(l.checked_div(r)
                    .map(Value::Int)
                    .unwrap_or(Value::Float(l as f64 / r as f64)))
            }
            _ => Self::checked_div(a, b),
        }
    }

    /// Floored division
    pub fn floor_div(a: &Value, b: &Value) -> OpResult<Value> {
        let (x, y) = operands("floor_div", a, b)?;
        match (x, y) {
            (Number::Int(l), Number::Int(r)) => {
                int_divisor("floor_div", y)?;
                if l == i64::MIN && r == -1 {
                    return Ok(Value::Float(-(l as f64)));
                }
                Ok(Value::Int(Integer::div_floor(&l, &r)))
            }
            _ => {
                if y.as_f64() == 0.0 {
                    return Err(OpError::DivisionByZero {
                        op: "floor_div".to_string(),
                    });
                }
                Ok(Value::Float((x.as_f64() / y.as_f64()).floor()))
            }
        }
    }

    /// Floored modulo: the result takes the sign of the divisor
    pub fn modulo(a: &Value, b: &Value) -> OpResult<Value> {
        let (x, y) = operands("mod", a, b)?;
        match (x, y) {
            (Number::Int(l), Number::Int(r)) => {
                int_divisor("mod", y)?;
                if r == -1 {
                    return Ok(Value::Int(0));
                }
                Ok(Value::Int(Integer::mod_floor(&l, &r)))
            }
            _ => {
                let (l, r) = (x.as_f64(), y.as_f64());
                Ok(Value::Float(l - (l / r).floor() * r))
            }
        }
    }

    /// Truncated remainder: the result takes the sign of the dividend
    pub fn rem(a: &Value, b: &Value) -> OpResult<Value> {
        let (x, y) = operands("rem", a, b)?;
        match (x, y) {
            (Number::Int(l), Number::Int(r)) => {
                int_divisor("rem", y)?;
                Ok(Value::Int(l.checked_rem(r).unwrap_or(0)))
            }
            _ => Ok(Value::Float(x.as_f64() % y.as_f64())),
        }
    }

    /// a ** b; stays integral for a non-negative integer exponent
    pub fn pow(a: &Value, b: &Value) -> OpResult<Value> {
        let (x, y) = operands("pow", a, b)?;
        if let (Number::Int(base), Number::Int(exp)) = (x, y) {
            if let Some(n) = exp.to_u32().and_then(|e| base.checked_pow(e)) {
                return Ok(Value::Int(n));
            }
        }
        Ok(Value::Float(x.as_f64().powf(y.as_f64())))
    }

    /// -a
    pub fn neg(a: &Value) -> OpResult<Value> {
        match Number::from_value(a) {
            Some(Number::Int(n)) => Ok(n
                .checked_neg()
                .map(Value::Int)
                .unwrap_or(Value::Float(-(n as f64)))),
            Some(Number::Float(f)) => Ok(Value::Float(-f)),
            None => Err(OpError::type_mismatch("neg", &[a])),
        }
    }

    /// |a|
    pub fn abs(a: &Value) -> OpResult<Value> {
        match Number::from_value(a) {
            Some(Number::Int(n)) => Ok(n
                .checked_abs()
                .map(Value::Int)
                .unwrap_or(Value::Float((n as f64).abs()))),
            Some(Number::Float(f)) => Ok(Value::Float(f.abs())),
            None => Err(OpError::type_mismatch("abs", &[a])),
        }
    }

    /// Round toward negative infinity
    pub fn floor(a: &Value) -> OpResult<Value> {
        Self::rounding("floor", a, f64::floor)
    }

    /// Round toward positive infinity
    pub fn ceil(a: &Value) -> OpResult<Value> {
        Self::rounding("ceil", a, f64::ceil)
    }

    /// Square root, always a float
    pub fn sqrt(a: &Value) -> OpResult<Value> {
        match Number::from_value(a) {
            Some(n) => Ok(Value::Float(n.as_f64().sqrt())),
            None => Err(OpError::type_mismatch("sqrt", &[a])),
        }
    }

    /// Largest of the arguments
    pub fn max(args: &[Value]) -> OpResult<Value> {
        Self::extreme("max", args, |candidate, best| candidate > best)
    }

    /// Smallest of the arguments
    pub fn min(args: &[Value]) -> OpResult<Value> {
        Self::extreme("min", args, |candidate, best| candidate < best)
    }

    fn rounding(op: &str, a: &Value, f: fn(f64) -> f64) -> OpResult<Value> {
        match Number::from_value(a) {
            Some(Number::Int(n)) => Ok(Value::Int(n)),
            Some(Number::Float(x)) => {
                let rounded = f(x);
                Ok(rounded
                    .to_i64()
                    .map(Value::Int)
                    .unwrap_or(Value::Float(rounded)))
            }
            None => Err(OpError::type_mismatch(op, &[a])),
        }
    }

    fn extreme(op: &str, args: &[Value], better: fn(f64, f64) -> bool) -> OpResult<Value> {
        let mut best: Option<(f64, &Value)> = None;
        for arg in args {
            let n = Number::from_value(arg).ok_or_else(|| OpError::type_mismatch(op, &[arg]))?;
            let x = n.as_f64();
            match best {
                Some((b, _)) if !better(x, b) => {}
                _ => best = Some((x, arg)),
            }
        }
        best.map(|(_, v)| v.clone())
            .ok_or_else(|| OpError::invalid(op, "expects at least one argument"))
    }
}
