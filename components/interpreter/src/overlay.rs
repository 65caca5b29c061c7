//! Semantic overlays.
//!
//! An [`Overlay`] is a [`ProfileSpec`] made executable. It answers the
//! questions whose answers differ between languages: is this value true,
//! what does `+` mean for these two operands, where does index 1 point,
//! what does `.length` do. It does not consult metatables; the runtime asks
//! the dispatcher first and only falls back here.
//!
//! Overlays never copy values. A sequence read through the Lua overlay and
//! the Ruby overlay is the same referent seen through two conventions.

use std::collections::HashMap;
use std::rc::Rc;

use core_types::{Callable, Key, MappingRef, RuntimeError, RuntimeResult, Value, MAX_SEQUENCE_LEN};
use primitives::{Comparison, Convert, OpError, PrimitiveOp, StringOps};

use crate::ast::Literal;
use crate::config::ConfigError;
use crate::dispatch::Operator;
use crate::profile::{Binding, BindingKind, Builtin, CoercionRule, DisplayText, ProfileSpec, Returns};

/// Attach scope and operator to a primitive failure
pub(crate) fn lift(scope: &str, operator: &str, err: OpError) -> RuntimeError {
    match err {
        OpError::TypeMismatch { operands, .. } => RuntimeError::TypeMismatch {
            scope: scope.to_string(),
            operator: operator.to_string(),
            operands,
        },
        OpError::InvalidMetatableTarget { type_name, .. } => RuntimeError::InvalidMetatableTarget {
            scope: scope.to_string(),
            operator: operator.to_string(),
            type_name,
        },
        other => RuntimeError::Primitive {
            scope: scope.to_string(),
            operator: operator.to_string(),
            message: other.to_string(),
        },
    }
}

/// The slice of a profile that bound methods and builtins need at call time.
///
/// Cloned into each native closure so that callables never hold the overlay
/// itself.
#[derive(Debug, Clone)]
pub struct BindingContext {
    scope: Rc<str>,
    index_base: i64,
    negative_indices: bool,
    display: DisplayText,
}

impl BindingContext {
    fn new(spec: &ProfileSpec) -> Self {
        Self {
            scope: Rc::from(spec.name.as_str()),
            index_base: spec.index_base,
            negative_indices: spec.negative_indices,
            display: spec.display.clone(),
        }
    }

    /// Profile scope name
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Translate a profile index into a zero-based slot.
    ///
    /// Returns `None` when the index points before the first element.
    pub fn to_slot(&self, index: i64, len: usize) -> Option<usize> {
        if index < 0 {
            if !self.negative_indices {
                return None;
            }
            let from_end = len as i64 + index;
            return usize::try_from(from_end).ok();
        }
        usize::try_from(index - self.index_base).ok()
    }

    /// Printed form of a value under the profile
    pub fn stringify(&self, value: &Value) -> String {
        match value {
            Value::Absent | Value::Null => self.display.null_text.clone(),
            Value::Boolean(true) => self.display.true_text.clone(),
            Value::Boolean(false) => self.display.false_text.clone(),
            other => other.to_string(),
        }
    }

    /// Run a binding with an optional receiver
    pub fn invoke(
        &self,
        name: &str,
        binding: &Binding,
        receiver: Option<&Value>,
        args: &[Value],
    ) -> RuntimeResult<Value> {
        let supplied: Vec<Value> = receiver.into_iter().chain(args.iter()).cloned().collect();
        let mut call: Vec<Value> = match &binding.order {
            Some(order) => order.iter().filter_map(|&i| supplied.get(i).cloned()).collect(),
            None => supplied.clone(),
        };
        call.extend(binding.extra.iter().map(Literal::to_value));

        let len = match call.first() {
            Some(Value::Sequence(seq)) => Some(seq.len()),
            Some(Value::String(s)) => Some(StringOps::char_len(s)),
            _ => None,
        };
        if let Some(len) = len {
            for &pos in &binding.index_args {
                if let Some(arg) = call.get_mut(pos) {
                    if let Some(index) = arg.as_i64() {
                        // -1 never names a slot, so reads miss and writes fail
                        *arg = self.to_slot(index, len).map(Value::from).unwrap_or(Value::Int(-1));
                    }
                }
            }
        }

        let result = match (binding.op, call.as_slice()) {
            (PrimitiveOp::ToString, [single]) => Ok(Value::String(self.stringify(single))),
            (op, _) => op.apply(&call),
        }
        .map_err(|err| lift(&self.scope, name, err))?;

        Ok(match binding.returns {
            Returns::Result if binding.index_result => match result.as_i64() {
                Some(slot) if slot >= 0 => Value::Int(slot + self.index_base),
                Some(_) => Value::Null,
                None => result,
            },
            Returns::Result => result,
            Returns::Receiver => supplied.into_iter().next().unwrap_or(Value::Null),
            Returns::Nothing => Value::Null,
        })
    }
}

/// A value tagged with the profile that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Wrapped {
    value: Value,
    profile: Rc<str>,
}

impl Wrapped {
    /// Tag `value` with `profile`
    pub fn new(value: Value, profile: &str) -> Self {
        Self {
            value,
            profile: Rc::from(profile),
        }
    }

    /// The wrapped value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The producing profile
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Unwrap
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Executable form of a profile
#[derive(Debug)]
pub struct Overlay {
    spec: ProfileSpec,
    ctx: BindingContext,
    builtins: HashMap<String, Value>,
}

impl Overlay {
    /// Validate `spec` and materialize its builtins.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use interpreter::{Operator, Overlay, ProfileSpec};
    ///
    /// let js = Overlay::new(ProfileSpec::load_bundled("js").unwrap()).unwrap();
    /// let sum = js.binary(Operator::Add, &Value::from("1"), &Value::Int(1)).unwrap();
    /// assert_eq!(sum, Value::from("11"));
    /// ```
    pub fn new(spec: ProfileSpec) -> Result<Self, ConfigError> {
        spec.validate()?;
        let ctx = BindingContext::new(&spec);
        let builtins = spec
            .builtins
            .iter()
            .map(|(name, builtin)| (name.clone(), materialize(&ctx, name, builtin)))
            .collect();
        Ok(Self {
            spec,
            ctx,
            builtins,
        })
    }

    /// Profile name
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Underlying profile document
    pub fn spec(&self) -> &ProfileSpec {
        &self.spec
    }

    /// A builtin by name
    pub fn builtin(&self, name: &str) -> Option<Value> {
        self.builtins.get(name).cloned()
    }

    /// Sorted builtin names
    pub fn builtin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builtins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Truthiness; never fails
    pub fn truthy(&self, value: &Value) -> bool {
        !self.spec.is_falsy(value)
    }

    /// Printed form under this profile
    pub fn stringify(&self, value: &Value) -> String {
        self.ctx.stringify(value)
    }

    /// Translate a profile index into a zero-based slot
    pub fn to_slot(&self, index: i64, len: usize) -> Option<usize> {
        self.ctx.to_slot(index, len)
    }

    fn mismatch(&self, op: Operator, operands: &[&Value]) -> RuntimeError {
        RuntimeError::type_mismatch(self.name(), op.name(), operands)
    }

    fn apply(&self, op: Operator, args: &[Value]) -> RuntimeResult<Value> {
        let operands: Vec<&Value> = args.iter().collect();
        let prim = self
            .spec
            .primitive_for(op)
            .ok_or_else(|| self.mismatch(op, &operands))?;
        prim.apply(args).map_err(|err| lift(self.name(), op.name(), err))
    }

    /// Numeric form of an operand under the coercion rule
    fn promote(&self, value: &Value) -> Option<Value> {
        use CoercionRule::*;
        match (self.spec.coercion, value) {
            (_, Value::Int(_) | Value::Float(_)) => Some(value.clone()),
            (NumericStrings, Value::Boolean(_)) => None,
            (_, Value::Boolean(b)) => Some(Value::Int(*b as i64)),
            (ConcatIfString | Juggle, Value::Null | Value::Absent) => Some(Value::Int(0)),
            (ConcatIfString, Value::String(s)) if s.trim().is_empty() => Some(Value::Int(0)),
            (ConcatIfString, Value::String(s)) => {
                Some(Convert::parse_number(s).unwrap_or(Value::Float(f64::NAN)))
            }
            (NumericStrings, Value::String(s)) => Convert::parse_number(s),
            (Juggle, Value::String(s)) => Some(Convert::leading_number(s)),
            _ => None,
        }
    }

    /// Default semantics of a binary operator
    pub fn binary(&self, op: Operator, a: &Value, b: &Value) -> RuntimeResult<Value> {
        match op {
            Operator::Eq => Ok(Value::Boolean(self.equals(a, b))),
            Operator::Ne => Ok(Value::Boolean(!self.equals(a, b))),
            Operator::Lt | Operator::Le => self.ordering(op, a, b),
            Operator::Gt => self.ordering(Operator::Lt, b, a),
            Operator::Ge => self.ordering(Operator::Le, b, a),
            Operator::Concat => self.concat(a, b),
            Operator::Add
            | Operator::Sub
            | Operator::Mul
            | Operator::Div
            | Operator::IDiv
            | Operator::Mod
            | Operator::Pow => self.arithmetic(op, a, b),
            Operator::BitAnd | Operator::BitOr | Operator::BitXor | Operator::Shl | Operator::Shr => {
                self.numeric(op, a, b)
            }
            _ => Err(self.mismatch(op, &[a, b])),
        }
    }

    /// Default semantics of a unary operator
    pub fn unary(&self, op: Operator, a: &Value) -> RuntimeResult<Value> {
        match op {
            Operator::Length => self.apply(op, std::slice::from_ref(a)),
            Operator::Neg | Operator::BitNot => {
                let x = self.promote(a).ok_or_else(|| self.mismatch(op, &[a]))?;
                self.apply(op, &[x])
            }
            _ => Err(self.mismatch(op, &[a])),
        }
    }

    fn arithmetic(&self, op: Operator, a: &Value, b: &Value) -> RuntimeResult<Value> {
        match (self.spec.coercion, op, a, b) {
            (CoercionRule::ConcatIfString, Operator::Add, Value::String(_), _)
            | (CoercionRule::ConcatIfString, Operator::Add, _, Value::String(_)) => {
                return Ok(Value::String(format!("{}{}", self.stringify(a), self.stringify(b))));
            }
            (CoercionRule::SameKind, Operator::Add, Value::String(_), Value::String(_))
            | (CoercionRule::SameKind, Operator::Add, Value::Sequence(_), Value::Sequence(_)) => {
                return StringOps::concat(a, b).map_err(|err| lift(self.name(), op.name(), err));
            }
            (CoercionRule::SameKind, Operator::Mul, Value::String(_), n)
            | (CoercionRule::SameKind, Operator::Mul, n, Value::String(_))
                if n.as_i64().is_some() =>
            {
                let (s, n) = if a.as_str().is_some() { (a, b) } else { (b, a) };
                return StringOps::repeat(s, n).map_err(|err| lift(self.name(), op.name(), err));
            }
            _ => {}
        }
        self.numeric(op, a, b)
    }

    fn numeric(&self, op: Operator, a: &Value, b: &Value) -> RuntimeResult<Value> {
        match (self.promote(a), self.promote(b)) {
            (Some(x), Some(y)) => self.apply(op, &[x, y]),
            _ => Err(self.mismatch(op, &[a, b])),
        }
    }

    fn concat(&self, a: &Value, b: &Value) -> RuntimeResult<Value> {
        match (a, b) {
            (Value::Sequence(_), Value::Sequence(_)) => self.apply(Operator::Concat, &[a.clone(), b.clone()]),
            _ if a.is_referent() || b.is_referent() => Err(self.mismatch(Operator::Concat, &[a, b])),
            _ => Ok(Value::String(format!("{}{}", self.stringify(a), self.stringify(b)))),
        }
    }

    fn ordering(&self, op: Operator, a: &Value, b: &Value) -> RuntimeResult<Value> {
        let prim = if op == Operator::Lt {
            PrimitiveOp::Lt
        } else {
            PrimitiveOp::Le
        };
        let both_strings = a.as_str().is_some() && b.as_str().is_some();
        let (x, y) = if both_strings || (a.is_number() && b.is_number()) {
            (a.clone(), b.clone())
        } else {
            match (self.compare_operand(a), self.compare_operand(b)) {
                (Some(x), Some(y)) => (x, y),
                _ => return Err(self.mismatch(op, &[a, b])),
            }
        };
        prim.apply(&[x, y]).map_err(|err| lift(self.name(), op.name(), err))
    }

    fn compare_operand(&self, value: &Value) -> Option<Value> {
        match self.spec.coercion {
            CoercionRule::ConcatIfString | CoercionRule::Juggle => self.promote(value),
            _ if value.is_number() => Some(value.clone()),
            _ => None,
        }
    }

    /// Equality under the profile
    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        Comparison::eq(a, b) || (self.spec.loose_equality && self.loose_equals(a, b))
    }

    fn loose_equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Boolean(x), other) | (other, Value::Boolean(x))
                if !matches!(other, Value::Boolean(_)) =>
            {
                self.equals(&Value::Int(*x as i64), other)
            }
            (Value::String(_), n) | (n, Value::String(_)) if n.is_number() => {
                let s = if a.is_number() { b } else { a };
                self.promote(s).map_or(false, |parsed| Comparison::eq(&parsed, n))
            }
            _ => false,
        }
    }

    /// Default indexed read: sequences and strings by the profile's index
    /// convention, mappings by key through the prototype chain.
    ///
    /// A miss yields `Absent`; indexing a non-container is a type mismatch.
    pub fn index_get(&self, container: &Value, key: &Value, max_depth: usize) -> RuntimeResult<Value> {
        match container {
            Value::Sequence(seq) => Ok(key
                .as_i64()
                .and_then(|i| self.to_slot(i, seq.len()))
                .and_then(|slot| seq.get(slot))
                .unwrap_or(Value::Absent)),
            Value::String(s) => Ok(key
                .as_i64()
                .and_then(|i| self.to_slot(i, StringOps::char_len(s)))
                .and_then(|slot| StringOps::char_at(s, slot))
                .unwrap_or(Value::Absent)),
            Value::Mapping(map) => Ok(Key::from_value(key)
                .and_then(|k| map.lookup(&k, max_depth))
                .unwrap_or(Value::Absent)),
            other => Err(self.mismatch(Operator::IndexGet, &[other, key])),
        }
    }

    /// Default indexed write; sequences grow (padding with null) up to
    /// [`MAX_SEQUENCE_LEN`] slots
    pub fn index_set(&self, container: &Value, key: &Value, value: Value) -> RuntimeResult<()> {
        match container {
            Value::Sequence(seq) => {
                let written = key
                    .as_i64()
                    .and_then(|i| self.to_slot(i, seq.len()))
                    .is_some_and(|slot| seq.set(slot, value));
                if written {
                    Ok(())
                } else {
                    Err(RuntimeError::Primitive {
                        scope: self.name().to_string(),
                        operator: Operator::IndexSet.name().to_string(),
                        message: format!("{} is not a valid index", key),
                    })
                }
            }
            Value::Mapping(map) => {
                let k = Key::from_value(key)
                    .ok_or_else(|| self.mismatch(Operator::IndexSet, &[container, key]))?;
                map.set(k, value);
                Ok(())
            }
            other => Err(self.mismatch(Operator::IndexSet, &[other, key])),
        }
    }

    /// Default member read: the method table first, then the mapping's own
    /// properties and prototype chain.
    pub fn member_get(&self, receiver: &Value, name: &str, max_depth: usize) -> RuntimeResult<Value> {
        if let Some(binding) = self.spec.methods.get(name) {
            return match binding.kind {
                BindingKind::Property => self.ctx.invoke(name, binding, Some(receiver), &[]),
                BindingKind::Method => Ok(self.bind_method(name, binding, receiver)),
            };
        }
        if let Value::Mapping(map) = receiver {
            if let Some(found) = map.lookup(&Key::from(name), max_depth) {
                return Ok(found);
            }
        }
        Err(RuntimeError::PropertyNotFound {
            scope: self.name().to_string(),
            name: name.to_string(),
        })
    }

    /// Default member write: an own property on a mapping
    pub fn member_set(&self, receiver: &Value, name: &str, value: Value) -> RuntimeResult<()> {
        match receiver {
            Value::Mapping(map) => {
                map.set(Key::from(name), value);
                Ok(())
            }
            other => Err(self.mismatch(Operator::IndexSet, &[other, &Value::from(name)])),
        }
    }

    /// Whether the method table routes `name`
    pub fn has_method(&self, name: &str) -> bool {
        self.spec.methods.contains_key(name)
    }

    fn bind_method(&self, name: &str, binding: &Binding, receiver: &Value) -> Value {
        let ctx = self.ctx.clone();
        let binding = binding.clone();
        let receiver = receiver.clone();
        let method = name.to_string();
        Value::Function(Callable::native(name, move |args| {
            ctx.invoke(&method, &binding, Some(&receiver), args)
        }))
    }
}

fn materialize(ctx: &BindingContext, name: &str, builtin: &Builtin) -> Value {
    match builtin {
        Builtin::Constant(literal) => literal.to_value(),
        Builtin::Function(binding) => {
            let ctx = ctx.clone();
            let binding = binding.clone();
            let fname = name.to_string();
            Value::Function(Callable::native(name, move |args| {
                ctx.invoke(&fname, &binding, None, args)
            }))
        }
        Builtin::Traverse(traverse) => Value::Function(Callable::Traverse {
            name: Rc::from(name),
            kind: traverse.traverse.into(),
            callback: traverse.callback,
        }),
        Builtin::Namespace(members) => Value::Mapping(MappingRef::from_pairs(members.iter().map(
            |(member, builtin)| {
                let qualified = format!("{}.{}", name, member);
                (member.as_str(), materialize(ctx, &qualified, builtin))
            },
        ))),
    }
}
