//! Polyglot value representation.
//!
//! This module provides the `Value` enum shared by every language profile.
//! Scalars are stored inline; sequences and mappings are reference handles
//! with shared-mutation semantics.

use num_traits::ToPrimitive;
use std::fmt;

use crate::{Callable, Key, MappingRef, SequenceRef};

/// Nesting depth after which `Display` stops descending into referents
const DISPLAY_DEPTH: usize = 8;

/// Represents any runtime value.
///
/// `Absent` is the distinguished "nothing stored here" marker and is never
/// equal to a stored `Null`.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let absent = Value::Absent;
/// let null = Value::Null;
/// let number = Value::Int(42);
///
/// assert_ne!(absent, null);
/// assert_eq!(number.type_name(), "int");
/// assert_eq!(Value::from("hi").to_string(), "hi");
/// ```
#[derive(Clone)]
pub enum Value {
    /// Nothing stored (distinct from `Null`)
    Absent,
    /// Stored null / nil / None
    Null,
    /// Boolean
    Boolean(bool),
    /// Integer number
    Int(i64),
    /// IEEE 754 double-precision number
    Float(f64),
    /// String
    String(String),
    /// Ordered sequence (reference semantics)
    Sequence(SequenceRef),
    /// String/number keyed mapping (reference semantics)
    Mapping(MappingRef),
    /// Callable
    Function(Callable),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "Absent"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Sequence(s) => f.debug_tuple("Sequence").field(s).finish(),
            Value::Mapping(m) => f.debug_tuple("Mapping").field(m).finish(),
            Value::Function(c) => f.debug_tuple("Function").field(c).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a.ptr_eq(b),
            (Value::Mapping(a), Value::Mapping(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.same(b),
            _ => false,
        }
    }
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a sequence value holding `elements`
    pub fn sequence(elements: Vec<Value>) -> Self {
        Value::Sequence(SequenceRef::from_vec(elements))
    }

    /// Create an empty mapping value
    pub fn mapping() -> Self {
        Value::Mapping(MappingRef::new())
    }

    /// Whether this is the `Absent` marker
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Whether this is `Null` or `Absent`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Absent | Value::Null)
    }

    /// Whether this value points at a referent that can carry a metatable
    pub fn is_referent(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Whether this is an `Int` or `Float`
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view (`Int` widened to `f64`)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view; integral floats convert, fractional ones do not
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) if f.fract() == 0.0 => f.to_i64(),
            _ => None,
        }
    }

    /// String view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Mapping view
    pub fn as_mapping(&self) -> Option<&MappingRef> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Sequence view
    pub fn as_sequence(&self) -> Option<&SequenceRef> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Callable view
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Function(c) => Some(c),
            _ => None,
        }
    }

    /// The metatable attached to this value's referent, if any.
    ///
    /// Scalars never carry a metatable.
    pub fn metatable(&self) -> Option<MappingRef> {
        match self {
            Value::Mapping(m) => m.metatable(),
            Value::Sequence(s) => s.metatable(),
            _ => None,
        }
    }

    /// Identity for referents and callables, value equality for scalars
    pub fn same(&self, other: &Value) -> bool {
        self == other
    }

    /// Profile-neutral type name used in diagnostics and introspection
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Function(_) => "function",
        }
    }

    fn write_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Value::String(s) if depth > 0 => write!(f, "{:?}", s),
            Value::Sequence(seq) => {
                if depth >= DISPLAY_DEPTH {
                    return write!(f, "[...]");
                }
                write!(f, "[")?;
                for (i, item) in seq.to_vec().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.write_nested(f, depth + 1)?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                if depth >= DISPLAY_DEPTH {
                    return write!(f, "{{...}}");
                }
                write!(f, "{{")?;
                for (i, (k, v)) in map.entries().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match k {
                        Key::Str(s) => write!(f, "{:?}: ", s)?,
                        Key::Int(n) => write!(f, "{}: ", n)?,
                    }
                    v.write_nested(f, depth + 1)?;
                }
                write!(f, "}}")
            }
            other => write!(f, "{}", other),
        }
    }
}

/// Profile-neutral string conversion.
///
/// - absent → "" (nothing to show)
/// - null → "null"
/// - integral floats print without a fractional part
/// - sequences and mappings print their contents, strings quoted inside
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(_) | Value::Mapping(_) => self.write_nested(f, 0),
            Value::Function(c) => write!(f, "<function {}>", c.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::sequence(elements)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Function(c)
    }
}
