//! String operations.

use core_types::{SequenceRef, Value};
use regex::Regex;

use crate::error::{OpError, OpResult};

/// Longest string, in bytes, that [`StringOps::repeat`] will build
pub const MAX_STRING_LEN: usize = 1 << 28;

fn text<'a>(op: &str, v: &'a Value) -> OpResult<&'a str> {
    v.as_str().ok_or_else(|| OpError::type_mismatch(op, &[v]))
}

/// String operations
pub struct StringOps;

impl StringOps {
    /// Uppercase copy
    pub fn upper(s: &Value) -> OpResult<Value> {
        Ok(Value::from(text("upper", s)?.to_uppercase()))
    }

    /// Lowercase copy
    pub fn lower(s: &Value) -> OpResult<Value> {
        Ok(Value::from(text("lower", s)?.to_lowercase()))
    }

    /// Copy without surrounding whitespace
    pub fn trim(s: &Value) -> OpResult<Value> {
        Ok(Value::from(text("trim", s)?.trim()))
    }

    /// Split on a separator into a new sequence.
    ///
    /// An empty separator splits into characters; a missing one splits on
    /// runs of whitespace.
    pub fn split(s: &Value, sep: Option<&Value>) -> OpResult<Value> {
        let s = text("split", s)?;
        let parts: Vec<Value> = match sep {
            None | Some(Value::Absent) | Some(Value::Null) => {
                s.split_whitespace().map(Value::from).collect()
            }
            Some(sep) => {
                let sep = text("split", sep)?;
                if sep.is_empty() {
                    s.chars().map(|c| Value::from(c.to_string())).collect()
                } else {
                    s.split(sep).map(Value::from).collect()
                }
            }
        };
        Ok(Value::sequence(parts))
    }

    /// Join the display forms of a sequence's elements
    pub fn join(seq: &Value, sep: Option<&Value>) -> OpResult<Value> {
        let items = seq
            .as_sequence()
            .ok_or_else(|| OpError::type_mismatch("join", &[seq]))?;
        let sep = match sep {
            None | Some(Value::Absent) => "",
            Some(v) => text("join", v)?,
        };
        let joined = items
            .to_vec()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(sep);
        Ok(Value::from(joined))
    }

    /// Replace every occurrence
    pub fn replace(s: &Value, from: &Value, to: &Value) -> OpResult<Value> {
        let (s, from, to) = (text("replace", s)?, text("replace", from)?, text("replace", to)?);
        Ok(Value::from(s.replace(from, to)))
    }

    /// Replace the first occurrence
    pub fn replace_first(s: &Value, from: &Value, to: &Value) -> OpResult<Value> {
        let (s, from, to) = (
            text("replace_first", s)?,
            text("replace_first", from)?,
            text("replace_first", to)?,
        );
        Ok(Value::from(s.replacen(from, to, 1)))
    }

    /// Whether `s` starts with `prefix`
    pub fn starts_with(s: &Value, prefix: &Value) -> OpResult<Value> {
        Ok(Value::Boolean(
            text("starts_with", s)?.starts_with(text("starts_with", prefix)?),
        ))
    }

    /// Whether `s` ends with `suffix`
    pub fn ends_with(s: &Value, suffix: &Value) -> OpResult<Value> {
        Ok(Value::Boolean(
            text("ends_with", s)?.ends_with(text("ends_with", suffix)?),
        ))
    }

    /// `s` repeated `n` times
    pub fn repeat(s: &Value, n: &Value) -> OpResult<Value> {
        let s = text("repeat", s)?;
        let count = n
            .as_i64()
            .ok_or_else(|| OpError::type_mismatch("repeat", &[n]))?;
        let count = usize::try_from(count)
            .map_err(|_| OpError::invalid("repeat", "negative repeat count"))?;
        match s.len().checked_mul(count) {
            Some(total) if total <= MAX_STRING_LEN => Ok(Value::from(s.repeat(count))),
            _ => Err(OpError::invalid("repeat", "result too long")),
        }
    }

    /// 0-based character index of `needle`, or -1
    pub fn find(s: &Value, needle: &Value) -> OpResult<Value> {
        let (s, needle) = (text("find", s)?, text("find", needle)?);
        Ok(Value::Int(match s.find(needle) {
            Some(byte) => s[..byte].chars().count() as i64,
            None => -1,
        }))
    }

    /// Every match of a regular expression, as a sequence of strings
    pub fn str_match(s: &Value, pattern: &Value) -> OpResult<Value> {
        let (s, pattern) = (text("str_match", s)?, text("str_match", pattern)?);
        let re = Regex::new(pattern)
            .map_err(|e| OpError::invalid("str_match", format!("invalid regex: {}", e)))?;
        let matches = re
            .find_iter(s)
            .map(|m| Value::from(m.as_str()))
            .collect::<Vec<_>>();
        Ok(Value::Sequence(SequenceRef::from_vec(matches)))
    }

    /// Concatenate the display forms of two scalars, or two sequences into a new one
    pub fn concat(a: &Value, b: &Value) -> OpResult<Value> {
        match (a, b) {
            (Value::Sequence(x), Value::Sequence(y)) => {
                let mut items = x.to_vec();
                items.extend(y.to_vec());
                Ok(Value::sequence(items))
            }
            _ if a.is_referent() || b.is_referent() => {
                Err(OpError::type_mismatch("concat", &[a, b]))
            }
            _ => Ok(Value::from(format!("{}{}", a, b))),
        }
    }

    /// Character count
    pub fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    /// Character at a 0-based position
    pub fn char_at(s: &str, index: usize) -> Option<Value> {
        s.chars().nth(index).map(|c| Value::from(c.to_string()))
    }
}
