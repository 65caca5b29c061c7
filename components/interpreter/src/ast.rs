//! Profile-neutral logic blocks.
//!
//! A [`Logic`] is a small abstract-syntax tree that carries no meaning of its
//! own: every operator, truthiness test, lookup and call it contains is
//! resolved through whichever profile the block is executed under.

use std::collections::HashMap;

use core_types::{LogicId, Value};
use serde::{Deserialize, Serialize};

use crate::dispatch::Operator;

/// A constant embedded in a logic block or a profile document.
///
/// Deserializes from bare JSON scalars: `null`, `true`, `3`, `2.5`, `"s"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Null / nil / None
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    Str(String),
}

impl Literal {
    /// Materialize as a runtime value
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Boolean(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(f) => Value::Float(*f),
            Literal::Str(s) => Value::String(s.clone()),
        }
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Literal::Float(f)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant
    Lit(Literal),
    /// Identifier, resolved through locals, then the scope chain
    Ident(String),
    /// Binary operator (dispatch, then the overlay)
    Binary(Operator, Box<Expr>, Box<Expr>),
    /// Unary operator (`Neg`, `Length`, `BitNot`)
    Unary(Operator, Box<Expr>),
    /// Logical negation under the profile's truthiness
    Not(Box<Expr>),
    /// Short-circuit and, yielding the deciding operand
    And(Box<Expr>, Box<Expr>),
    /// Short-circuit or, yielding the deciding operand
    Or(Box<Expr>, Box<Expr>),
    /// `container[key]`
    Index(Box<Expr>, Box<Expr>),
    /// `receiver.name`
    Member(Box<Expr>, String),
    /// `callee(args...)`
    Call(Box<Expr>, Vec<Expr>),
    /// `receiver.name(args...)`
    MethodCall(Box<Expr>, String, Vec<Expr>),
    /// Sequence literal
    Sequence(Vec<Expr>),
    /// Mapping literal
    Mapping(Vec<(Expr, Expr)>),
    /// Reference to a registered logic block; the resulting callable is bound
    /// to the profile that evaluates this expression
    Logic(LogicId),
}

impl Expr {
    /// Literal shorthand
    pub fn lit(value: impl Into<Literal>) -> Self {
        Expr::Lit(value.into())
    }

    /// Null literal
    pub fn null() -> Self {
        Expr::Lit(Literal::Null)
    }

    /// Identifier shorthand
    pub fn ident(name: &str) -> Self {
        Expr::Ident(name.to_string())
    }

    /// Binary operator shorthand
    pub fn binary(op: Operator, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    /// Unary operator shorthand
    pub fn unary(op: Operator, operand: Expr) -> Self {
        Expr::Unary(op, Box::new(operand))
    }

    /// Index shorthand
    pub fn index(container: Expr, key: Expr) -> Self {
        Expr::Index(Box::new(container), Box::new(key))
    }

    /// Member shorthand
    pub fn member(receiver: Expr, name: &str) -> Self {
        Expr::Member(Box::new(receiver), name.to_string())
    }

    /// Call shorthand
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(callee), args)
    }

    /// Method call shorthand
    pub fn method(receiver: Expr, name: &str, args: Vec<Expr>) -> Self {
        Expr::MethodCall(Box::new(receiver), name.to_string(), args)
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Bind a frame-local name
    Let(String, Expr),
    /// Update a local if one exists, else write the store under the
    /// executing profile's scope
    Assign(String, Expr),
    /// `container[key] = value`
    IndexAssign(Expr, Expr, Expr),
    /// `receiver.name = value`
    MemberAssign(Expr, String, Expr),
    /// Remove a local, or the store entry under the executing scope
    Delete(String),
    /// Remove an own property from a mapping
    DeleteMember(Expr, String),
    /// Conditional under the profile's truthiness
    If(Expr, Vec<Stmt>, Vec<Stmt>),
    /// Leave the block with a value
    Return(Expr),
    /// Evaluate for effect
    Expr(Expr),
}

/// A registered, profile-agnostic block of logic.
///
/// `captured` is the outer environment consulted after the store's global
/// scope when an identifier is neither a parameter nor a local.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Logic {
    /// Name used in diagnostics
    pub name: String,
    /// Parameter names; calls must supply exactly this many arguments
    pub params: Vec<String>,
    /// Statements
    pub body: Vec<Stmt>,
    /// Outer environment
    pub captured: HashMap<String, Value>,
}

impl Logic {
    /// Start a block with the given name and parameters
    pub fn new(name: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Vec::new(),
            captured: HashMap::new(),
        }
    }

    /// Append a statement
    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }

    /// Append `return expr`
    pub fn returns(self, expr: Expr) -> Self {
        self.stmt(Stmt::Return(expr))
    }

    /// Add a captured outer binding
    pub fn capture(mut self, name: &str, value: Value) -> Self {
        self.captured.insert(name.to_string(), value);
        self
    }
}
