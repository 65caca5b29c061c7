//! Declarative language profiles.
//!
//! A profile is data, not code: it names the index base, the falsy value
//! classes, the coercion rule for mixed operands, how null and booleans
//! print, which primitive each arithmetic operator maps to, and the tables
//! of builtins and methods that route profile-specific names onto primitive
//! operations. The six bundled profiles ship as JSON documents compiled
//! into the crate; further profiles can be registered at runtime from the
//! same format.

use std::collections::BTreeMap;

use core_types::{Traversal, Value};
use primitives::PrimitiveOp;
use serde::{Deserialize, Serialize};

use crate::ast::Literal;
use crate::config::ConfigError;
use crate::dispatch::Operator;

/// A class of values a profile treats as false.
///
/// `Absent` is falsy under every profile regardless of the listed classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalsyClass {
    /// Null
    Null,
    /// Boolean false
    False,
    /// Integer or float zero
    Zero,
    /// NaN
    Nan,
    /// `""`
    EmptyString,
    /// `"0"`
    ZeroString,
    /// Sequence with no elements
    EmptySequence,
    /// Mapping with no own entries
    EmptyMapping,
}

impl FalsyClass {
    /// Whether `value` belongs to this class
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (FalsyClass::Null, Value::Null | Value::Absent) => true,
            (FalsyClass::False, Value::Boolean(false)) => true,
            (FalsyClass::Zero, Value::Int(0)) => true,
            (FalsyClass::Zero, Value::Float(f)) => *f == 0.0,
            (FalsyClass::Nan, Value::Float(f)) => f.is_nan(),
            (FalsyClass::EmptyString, Value::String(s)) => s.is_empty(),
            (FalsyClass::ZeroString, Value::String(s)) => s == "0",
            (FalsyClass::EmptySequence, Value::Sequence(seq)) => seq.is_empty(),
            (FalsyClass::EmptyMapping, Value::Mapping(map)) => map.is_empty(),
            _ => false,
        }
    }
}

/// How operands of mismatched types are brought together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionRule {
    /// `+` concatenates when either side is a string; otherwise operands
    /// become numbers (booleans 0/1, null 0, blank strings 0, other
    /// non-numeric strings NaN)
    ConcatIfString,
    /// Strings that parse as numbers take part in arithmetic; nothing else
    /// is converted
    NumericStrings,
    /// Strings contribute their leading number; null and booleans convert
    Juggle,
    /// Operands must share a kind; `+` joins two strings or two sequences
    /// and `*` repeats a string
    SameKind,
    /// Only numbers (and booleans as 0/1) take part in arithmetic
    NumericOnly,
}

/// How null and booleans print under a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayText {
    /// Printed form of null
    #[serde(rename = "null")]
    pub null_text: String,
    /// Printed form of true
    #[serde(rename = "true")]
    pub true_text: String,
    /// Printed form of false
    #[serde(rename = "false")]
    pub false_text: String,
}

impl Default for DisplayText {
    fn default() -> Self {
        Self {
            null_text: "null".to_string(),
            true_text: "true".to_string(),
            false_text: "false".to_string(),
        }
    }
}

/// Whether a method-table entry is called or read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// `receiver.name` yields a bound callable
    #[default]
    Method,
    /// `receiver.name` runs the operation immediately
    Property,
}

/// What a binding hands back to its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Returns {
    /// The primitive's result
    #[default]
    Result,
    /// The receiver (or first argument), for chaining
    Receiver,
    /// Null
    Nothing,
}

/// Routes a profile-specific name onto a primitive operation.
///
/// Arguments are assembled as `receiver, args...`, permuted by `order`,
/// extended with `extra`. When the first assembled argument is a sequence
/// or string, the positions listed in `index_args` are translated from the
/// profile's index convention to zero-based slots. With `index_result`, a
/// non-negative integer result is translated back, and a negative one
/// becomes null.
///
/// # Examples
///
/// ```
/// use interpreter::Binding;
///
/// let explode: Binding = serde_json::from_str(r#"{"op": "split", "order": [1, 0]}"#).unwrap();
/// assert_eq!(explode.order, Some(vec![1, 0]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    /// Primitive operation to call
    pub op: PrimitiveOp,
    /// Method or property
    #[serde(default)]
    pub kind: BindingKind,
    /// Argument permutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,
    /// Constant arguments appended after the caller's
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Literal>,
    /// Positions holding indices in the profile's convention
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_args: Vec<usize>,
    /// Whether the result is an index to translate back
    #[serde(default)]
    pub index_result: bool,
    /// Result shaping
    #[serde(default)]
    pub returns: Returns,
}

impl Binding {
    /// A plain binding to `op`
    pub fn to(op: PrimitiveOp) -> Self {
        Self {
            op,
            kind: BindingKind::Method,
            order: None,
            extra: Vec::new(),
            index_args: Vec::new(),
            index_result: false,
            returns: Returns::Result,
        }
    }
}

/// Element-wise walk named in a profile document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraverseKind {
    /// `array_map`, `map`
    Map,
    /// `array_filter`, `filter`
    Filter,
}

impl From<TraverseKind> for Traversal {
    fn from(kind: TraverseKind) -> Self {
        match kind {
            TraverseKind::Map => Traversal::Map,
            TraverseKind::Filter => Traversal::Filter,
        }
    }
}

/// A builtin that walks a container and calls a user callback per element.
///
/// Evaluated by the runtime rather than a primitive; `filter` keeps elements
/// by the calling profile's truthiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Traverse {
    /// What to do with each element
    pub traverse: TraverseKind,
    /// Argument position of the callback (0 or 1); the container is the other
    #[serde(default)]
    pub callback: usize,
}

/// An entry in a profile's builtin namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Builtin {
    /// A function backed by a primitive operation
    Function(Binding),
    /// A map or filter over a container
    Traverse(Traverse),
    /// A nested namespace, materialized as a mapping (`Math`, `table`)
    Namespace(BTreeMap<String, Builtin>),
    /// A constant (`undefined`, `INT_MAX`)
    Constant(Literal),
}

/// A complete language profile.
///
/// # Examples
///
/// ```
/// use core_types::Value;
/// use interpreter::ProfileSpec;
///
/// let lua = ProfileSpec::load_bundled("lua").unwrap();
/// assert_eq!(lua.index_base, 1);
/// assert!(lua.is_falsy(&Value::Null));
/// assert!(!lua.is_falsy(&Value::Int(0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSpec {
    /// Profile name, also the store scope it reads and writes
    pub name: String,
    /// Index of the first sequence element (0 or 1)
    #[serde(default)]
    pub index_base: i64,
    /// Whether negative indices count from the end
    #[serde(default)]
    pub negative_indices: bool,
    /// Falsy value classes
    pub falsy: Vec<FalsyClass>,
    /// Mixed-operand coercion
    pub coercion: CoercionRule,
    /// Whether `==` converts between numbers, numeric strings and booleans
    #[serde(default)]
    pub loose_equality: bool,
    /// Printed forms
    #[serde(default)]
    pub display: DisplayText,
    /// Operator name → primitive overrides (`"div": "checked_div"`)
    #[serde(default)]
    pub operators: BTreeMap<String, PrimitiveOp>,
    /// Method table consulted for member access
    #[serde(default)]
    pub methods: BTreeMap<String, Binding>,
    /// Names resolvable in the profile's scope without being stored
    #[serde(default)]
    pub builtins: BTreeMap<String, Builtin>,
}

impl ProfileSpec {
    /// Names of the profiles compiled into the crate
    pub const BUNDLED: &'static [&'static str] = &["js", "lua", "ruby", "php", "py", "c"];

    /// JSON source of a bundled profile
    pub fn bundled_source(name: &str) -> Option<&'static str> {
        Some(match name {
            "js" => include_str!("profiles/js.json"),
            "lua" => include_str!("profiles/lua.json"),
            "ruby" => include_str!("profiles/ruby.json"),
            "php" => include_str!("profiles/php.json"),
            "py" => include_str!("profiles/py.json"),
            "c" => include_str!("profiles/c.json"),
            _ => return None,
        })
    }

    /// Parse and validate a bundled profile
    pub fn load_bundled(name: &str) -> Result<Self, ConfigError> {
        let source = Self::bundled_source(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
        Self::from_json(source)
    }

    /// Parse and validate a profile document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let spec: ProfileSpec = serde_json::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check the parts serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidProfile {
            name: self.name.clone(),
            message,
        };
        if self.name.is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if !(0..=1).contains(&self.index_base) {
            return Err(invalid(format!("index_base must be 0 or 1, got {}", self.index_base)));
        }
        for key in self.operators.keys() {
            match Operator::from_name(key) {
                Some(op) if !op.is_comparison() && op != Operator::Call => {}
                _ => return Err(invalid(format!("'{}' is not an overridable operator", key))),
            }
        }
        for (name, binding) in &self.methods {
            check_binding(name, binding).map_err(invalid)?;
        }
        check_builtins(&self.builtins).map_err(invalid)
    }

    /// Whether `value` is false under this profile
    pub fn is_falsy(&self, value: &Value) -> bool {
        value.is_absent() || self.falsy.iter().any(|class| class.matches(value))
    }

    /// Primitive an operator maps to, honoring profile overrides
    pub fn primitive_for(&self, op: Operator) -> Option<PrimitiveOp> {
        if let Some(prim) = self.operators.get(op.name()) {
            return Some(*prim);
        }
        Some(match op {
            Operator::Add => PrimitiveOp::Add,
            Operator::Sub => PrimitiveOp::Sub,
            Operator::Mul => PrimitiveOp::Mul,
            Operator::Div => PrimitiveOp::Div,
            Operator::IDiv => PrimitiveOp::FloorDiv,
            Operator::Mod => PrimitiveOp::Mod,
            Operator::Pow => PrimitiveOp::Pow,
            Operator::Neg => PrimitiveOp::Neg,
            Operator::Concat => PrimitiveOp::Concat,
            Operator::Length => PrimitiveOp::Len,
            Operator::BitAnd => PrimitiveOp::BitAnd,
            Operator::BitOr => PrimitiveOp::BitOr,
            Operator::BitXor => PrimitiveOp::BitXor,
            Operator::BitNot => PrimitiveOp::BitNot,
            Operator::Shl => PrimitiveOp::Shl,
            Operator::Shr => PrimitiveOp::Shr,
            _ => return None,
        })
    }
}

fn check_binding(name: &str, binding: &Binding) -> Result<(), String> {
    let (min, _) = binding.op.arity();
    if let Some(order) = &binding.order {
        if order.is_empty() {
            return Err(format!("'{}': order must not be empty", name));
        }
        if order.len() + binding.extra.len() < min {
            return Err(format!(
                "'{}': '{}' needs {} argument(s) but the order supplies {}",
                name,
                binding.op,
                min,
                order.len() + binding.extra.len()
            ));
        }
    }
    Ok(())
}

fn check_builtins(builtins: &BTreeMap<String, Builtin>) -> Result<(), String> {
    for (name, builtin) in builtins {
        match builtin {
            Builtin::Function(binding) => check_binding(name, binding)?,
            Builtin::Traverse(traverse) if traverse.callback > 1 => {
                return Err(format!("'{}': callback position must be 0 or 1", name));
            }
            Builtin::Namespace(members) => check_builtins(members)?,
            Builtin::Traverse(_) | Builtin::Constant(_) => {}
        }
    }
    Ok(())
}
