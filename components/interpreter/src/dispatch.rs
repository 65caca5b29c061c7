//! Metamethod dispatch.
//!
//! Before any profile's default semantics run, the dispatcher asks the
//! operands whether their referents carry a metatable entry for the
//! operator. Entries are looked up under the canonical operator name first
//! (`"add"`, `"index-get"`) and then under the Lua-style alias (`"__add"`,
//! `"__index"`), so a table attached from one profile is honored by all of
//! them.
//!
//! Only the metatable's own entries count; metatables are not searched
//! through prototypes.

use std::fmt;

use core_types::{Key, Value};

/// Operators that can be overridden through a metatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// Integer (floor) division
    IDiv,
    /// `%`
    Mod,
    /// Exponentiation
    Pow,
    /// Unary minus
    Neg,
    /// `==`
    Eq,
    /// `!=`, derived from `Eq`; a `ne` metatable entry is never consulted
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`, derived from `Lt` with swapped operands; `gt` entries are ignored
    Gt,
    /// `>=`, derived from `Le` with swapped operands; `ge` entries are ignored
    Ge,
    /// String concatenation
    Concat,
    /// Length
    Length,
    /// Invocation of a non-function
    Call,
    /// Indexed or member read
    IndexGet,
    /// Indexed or member write
    IndexSet,
    /// Bitwise and
    BitAnd,
    /// Bitwise or
    BitOr,
    /// Bitwise xor
    BitXor,
    /// Bitwise not
    BitNot,
    /// Left shift
    Shl,
    /// Right shift
    Shr,
}

impl Operator {
    /// Every operator
    pub const ALL: &'static [Operator] = &[
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::IDiv,
        Operator::Mod,
        Operator::Pow,
        Operator::Neg,
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::Concat,
        Operator::Length,
        Operator::Call,
        Operator::IndexGet,
        Operator::IndexSet,
        Operator::BitAnd,
        Operator::BitOr,
        Operator::BitXor,
        Operator::BitNot,
        Operator::Shl,
        Operator::Shr,
    ];

    /// Canonical metatable key
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
            Operator::IDiv => "idiv",
            Operator::Mod => "mod",
            Operator::Pow => "pow",
            Operator::Neg => "neg",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Concat => "concat",
            Operator::Length => "len",
            Operator::Call => "call",
            Operator::IndexGet => "index-get",
            Operator::IndexSet => "index-set",
            Operator::BitAnd => "band",
            Operator::BitOr => "bor",
            Operator::BitXor => "bxor",
            Operator::BitNot => "bnot",
            Operator::Shl => "shl",
            Operator::Shr => "shr",
        }
    }

    /// Lua-style alias, if the operator has one
    pub fn alias(self) -> Option<&'static str> {
        Some(match self {
            Operator::Add => "__add",
            Operator::Sub => "__sub",
            Operator::Mul => "__mul",
            Operator::Div => "__div",
            Operator::IDiv => "__idiv",
            Operator::Mod => "__mod",
            Operator::Pow => "__pow",
            Operator::Neg => "__unm",
            Operator::Eq => "__eq",
            Operator::Lt => "__lt",
            Operator::Le => "__le",
            Operator::Concat => "__concat",
            Operator::Length => "__len",
            Operator::Call => "__call",
            Operator::IndexGet => "__index",
            Operator::IndexSet => "__newindex",
            Operator::BitAnd => "__band",
            Operator::BitOr => "__bor",
            Operator::BitXor => "__bxor",
            Operator::BitNot => "__bnot",
            Operator::Shl => "__shl",
            Operator::Shr => "__shr",
            Operator::Ne | Operator::Gt | Operator::Ge => return None,
        })
    }

    /// Parse a canonical name or alias
    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name || op.alias() == Some(name))
    }

    /// Whether the operator takes a single operand
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Neg | Operator::Length | Operator::BitNot)
    }

    /// Whether the operator is rewritten in terms of another before dispatch
    pub fn is_derived(self) -> bool {
        matches!(self, Operator::Ne | Operator::Gt | Operator::Ge)
    }

    /// Whether the result is a truth value
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which operand supplied the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left operand (or the sole receiver)
    Left,
    /// Right operand
    Right,
}

/// A metatable handler selected for an operation, with its arguments in the
/// order the handler receives them.
#[derive(Debug, Clone)]
pub struct Override {
    /// Handler value: a callable, or for index operators possibly a table
    pub handler: Value,
    /// Arguments for a callable handler
    pub args: Vec<Value>,
    /// Operand the handler came from
    pub side: Side,
}

/// Stateless metatable lookup
pub struct Dispatcher;

impl Dispatcher {
    /// The metatable entry for `op` on `value`, if any.
    ///
    /// Derived comparisons never have an entry of their own; `a > b` reaches
    /// the `lt` handler of whichever operand supplies it.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{Callable, Key, MappingRef, Value};
    /// use interpreter::{Dispatcher, Operator};
    ///
    /// let meta = MappingRef::new();
    /// meta.set(Key::from("__add"), Value::Function(Callable::native("add", |_| Ok(Value::Int(0)))));
    /// let obj = Value::mapping();
    /// obj.as_mapping().unwrap().set_metatable(Some(meta));
    ///
    /// assert!(Dispatcher::metamethod(&obj, Operator::Add).is_some());
    /// assert!(Dispatcher::metamethod(&obj, Operator::Sub).is_none());
    /// assert!(Dispatcher::metamethod(&Value::Int(1), Operator::Add).is_none());
    /// ```
    pub fn metamethod(value: &Value, op: Operator) -> Option<Value> {
        if op.is_derived() {
            return None;
        }
        let meta = value.metatable()?;
        meta.get_own(&Key::from(op.name()))
            .or_else(|| op.alias().and_then(|alias| meta.get_own(&Key::from(alias))))
            .filter(|handler| !handler.is_nullish())
    }

    /// Handler for a binary operator: the left operand's metatable wins,
    /// then the right operand's, called as `(right, left)`.
    pub fn find_binary(op: Operator, left: &Value, right: &Value) -> Option<Override> {
        if let Some(handler) = Self::metamethod(left, op) {
            return Some(Override {
                handler,
                args: vec![left.clone(), right.clone()],
                side: Side::Left,
            });
        }
        Self::metamethod(right, op).map(|handler| Override {
            handler,
            args: vec![right.clone(), left.clone()],
            side: Side::Right,
        })
    }

    /// Handler for a unary operator, consulted on the receiver only
    pub fn find_unary(op: Operator, receiver: &Value) -> Option<Override> {
        Self::metamethod(receiver, op).map(|handler| Override {
            handler,
            args: vec![receiver.clone()],
            side: Side::Left,
        })
    }
}
