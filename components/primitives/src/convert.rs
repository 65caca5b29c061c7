//! Type coercion and introspection.

use core_types::Value;
use num_traits::ToPrimitive;

use crate::error::{OpError, OpResult};

/// Conversion operations
pub struct Convert;

impl Convert {
    /// Parse a whole string as a number.
    ///
    /// Surrounding whitespace is ignored. Returns `None` if any other
    /// character is left over.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use primitives::Convert;
    ///
    /// assert_eq!(Convert::parse_number(" 42 "), Some(Value::Int(42)));
    /// assert_eq!(Convert::parse_number("2.5"), Some(Value::Float(2.5)));
    /// assert_eq!(Convert::parse_number("42abc"), None);
    /// ```
    pub fn parse_number(s: &str) -> Option<Value> {
        let t = s.trim();
        if t.is_empty() {
            return None;
        }
        if let Ok(n) = t.parse::<i64>() {
            return Some(Value::Int(n));
        }
        // Rust accepts "inf"/"nan" spellings that no profile treats as numeric
        if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
            return None;
        }
        t.parse::<f64>().ok().map(Value::Float)
    }

    /// Parse the longest numeric prefix of a string, defaulting to 0.
    ///
    /// `"42abc"` → 42, `"3.5kg"` → 3.5, `"abc"` → 0.
    pub fn leading_number(s: &str) -> Value {
        let t = s.trim_start();
        let bytes = t.as_bytes();
        let mut end = 0;
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        let int_end = end;
        if end < bytes.len() && bytes[end] == b'.' {
            let mut frac = end + 1;
            while frac < bytes.len() && bytes[frac].is_ascii_digit() {
                frac += 1;
            }
            if frac > end + 1 {
                end = frac;
            }
        }
        if int_end == digits_start && end == int_end {
            return Value::Int(0);
        }
        let prefix = &t[..end];
        if end == int_end {
            if let Ok(n) = prefix.parse::<i64>() {
                return Value::Int(n);
            }
        }
        prefix
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or(Value::Int(0))
    }

    /// Convert to an integer, truncating floats toward zero
    pub fn to_int(v: &Value) -> OpResult<Value> {
        match v {
            Value::Int(n) => Ok(Value::Int(*n)),
            Value::Float(f) => f
                .trunc()
                .to_i64()
                .map(Value::Int)
                .ok_or_else(|| OpError::invalid("to_int", format!("{} has no integer value", v))),
            Value::Boolean(b) => Ok(Value::Int(i64::from(*b))),
            Value::Absent | Value::Null => Ok(Value::Int(0)),
            Value::String(s) => match Self::parse_number(s) {
                Some(n) => Self::to_int(&n),
                None => Err(OpError::invalid(
                    "to_int",
                    format!("invalid literal {:?}", s),
                )),
            },
            _ => Err(OpError::type_mismatch("to_int", &[v])),
        }
    }

    /// Convert to a float
    pub fn to_float(v: &Value) -> OpResult<Value> {
        match v {
            Value::Int(n) => Ok(Value::Float(*n as f64)),
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Boolean(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Absent | Value::Null => Ok(Value::Float(0.0)),
            Value::String(s) => Self::parse_number(s)
                .and_then(|n| n.as_f64())
                .map(Value::Float)
                .ok_or_else(|| OpError::invalid("to_float", format!("invalid literal {:?}", s))),
            _ => Err(OpError::type_mismatch("to_float", &[v])),
        }
    }

    /// Profile-neutral string form
    pub fn to_string(v: &Value) -> Value {
        match v {
            Value::String(_) => v.clone(),
            other => Value::String(other.to_string()),
        }
    }

    /// Profile-neutral truthiness: nothing, false, zero, NaN and "" are falsy.
    ///
    /// Profile overlays apply their own falsy sets; this is the fallback used
    /// when a raw boolean is requested without a profile.
    pub fn to_bool(v: &Value) -> bool {
        match v {
            Value::Absent | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Type name: null, boolean, int, float, string, sequence, mapping or function
    pub fn type_of(v: &Value) -> Value {
        let name = match v {
            Value::Absent => "null",
            other => other.type_name(),
        };
        Value::from(name)
    }
}
