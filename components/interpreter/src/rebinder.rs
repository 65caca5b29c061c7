//! Environment rebinding.
//!
//! Executes a registered [`Logic`] block under a chosen profile without
//! rewriting it. Parameters and `Let` bindings live in a per-call frame;
//! every other identifier goes through the scope resolver for the executing
//! profile on every access, so a name stored after the block was defined is
//! still found, and the same block run under `lua` and then `js` sees each
//! profile's own variables and semantics.
//!
//! Nothing survives a call except what the block writes to the store or into
//! referents it was handed.

use std::collections::HashMap;
use std::rc::Rc;

use core_types::{Callable, Key, LogicId, MappingRef, RuntimeError, RuntimeResult, Value};
use tracing::debug;

use crate::ast::{Expr, Logic, Stmt};
use crate::runtime::Runtime;

/// How a block finished
#[derive(Debug)]
enum Flow {
    Normal,
    Return(Value),
}

/// Per-invocation bindings
struct Frame {
    logic: Rc<Logic>,
    locals: HashMap<String, Value>,
}

impl Frame {
    fn new(logic: Rc<Logic>, args: &[Value]) -> Self {
        let locals = logic
            .params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();
        Self { logic, locals }
    }
}

impl Runtime {
    /// Run a logic block under `profile` and return its raw result.
    ///
    /// # Arguments
    ///
    /// * `profile` - Scope that free identifiers resolve through
    /// * `id` - Registered block
    /// * `args` - Positional arguments; must match the parameter count
    ///
    /// # Returns
    ///
    /// The value of the first `Return` reached, or null when the block ends
    /// without one.
    pub fn invoke_logic(&mut self, profile: &str, id: LogicId, args: &[Value]) -> RuntimeResult<Value> {
        let logic = self.logic(id)?;
        self.overlay(profile)?;
        if logic.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                scope: profile.to_string(),
                name: logic.name.clone(),
                expected: logic.params.len(),
                got: args.len(),
            });
        }
        debug!(profile, logic = %logic.name, args = args.len(), "rebinding");
        let mut frame = Frame::new(logic.clone(), args);
        let flow = self.guarded(profile, |rt| rt.exec_block(profile, &mut frame, &logic.body))?;
        Ok(match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Null,
        })
    }

    fn exec_block(&mut self, profile: &str, frame: &mut Frame, body: &[Stmt]) -> RuntimeResult<Flow> {
        for stmt in body {
            if let Flow::Return(value) = self.exec(profile, frame, stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, profile: &str, frame: &mut Frame, stmt: &Stmt) -> RuntimeResult<Flow> {
        match stmt {
            Stmt::Let(name, expr) => {
                let value = self.eval(profile, frame, expr)?;
                frame.locals.insert(name.clone(), value);
            }
            Stmt::Assign(name, expr) => {
                let value = self.eval(profile, frame, expr)?;
                match frame.locals.get_mut(name) {
                    Some(slot) => *slot = value,
                    None => self.set(profile, name, value),
                }
            }
            Stmt::IndexAssign(container, key, expr) => {
                let container = self.eval(profile, frame, container)?;
                let key = self.eval(profile, frame, key)?;
                let value = self.eval(profile, frame, expr)?;
                self.index_set(profile, &container, &key, value)?;
            }
            Stmt::MemberAssign(receiver, name, expr) => {
                let receiver = self.eval(profile, frame, receiver)?;
                let value = self.eval(profile, frame, expr)?;
                self.set_member(profile, &receiver, name, value)?;
            }
            Stmt::Delete(name) => {
                if frame.locals.remove(name).is_none() {
                    self.delete(profile, name);
                }
            }
            Stmt::DeleteMember(receiver, name) => {
                let receiver = self.eval(profile, frame, receiver)?;
                self.delete_member(&receiver, name);
            }
            Stmt::If(cond, then, otherwise) => {
                let cond = self.eval(profile, frame, cond)?;
                let branch = if self.truthy(profile, &cond)? { then } else { otherwise };
                return self.exec_block(profile, frame, branch);
            }
            Stmt::Return(expr) => return Ok(Flow::Return(self.eval(profile, frame, expr)?)),
            Stmt::Expr(expr) => {
                self.eval(profile, frame, expr)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn eval(&mut self, profile: &str, frame: &mut Frame, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Lit(literal) => Ok(literal.to_value()),
            Expr::Ident(name) => match frame.locals.get(name) {
                Some(value) => Ok(value.clone()),
                None => {
                    let logic = frame.logic.clone();
                    self.resolve_with(profile, name, &logic.captured)
                }
            },
            Expr::Binary(op, left, right) => {
                let left = self.eval(profile, frame, left)?;
                let right = self.eval(profile, frame, right)?;
                self.binary(profile, *op, &left, &right)
            }
            Expr::Unary(op, operand) => {
                let operand = self.eval(profile, frame, operand)?;
                self.unary(profile, *op, &operand)
            }
            Expr::Not(operand) => {
                let operand = self.eval(profile, frame, operand)?;
                Ok(Value::Boolean(!self.truthy(profile, &operand)?))
            }
            Expr::And(left, right) => {
                let left = self.eval(profile, frame, left)?;
                if self.truthy(profile, &left)? {
                    self.eval(profile, frame, right)
                } else {
                    Ok(left)
                }
            }
            Expr::Or(left, right) => {
                let left = self.eval(profile, frame, left)?;
                if self.truthy(profile, &left)? {
                    Ok(left)
                } else {
                    self.eval(profile, frame, right)
                }
            }
            Expr::Index(container, key) => {
                let container = self.eval(profile, frame, container)?;
                let key = self.eval(profile, frame, key)?;
                self.index_get(profile, &container, &key)
            }
            Expr::Member(receiver, name) => {
                let receiver = self.eval(profile, frame, receiver)?;
                self.get_member(profile, &receiver, name)
            }
            Expr::Call(callee, args) => {
                let callee = self.eval(profile, frame, callee)?;
                let args = self.eval_all(profile, frame, args)?;
                self.call(profile, &callee, &args)
            }
            Expr::MethodCall(receiver, name, args) => {
                let receiver = self.eval(profile, frame, receiver)?;
                let args = self.eval_all(profile, frame, args)?;
                self.invoke_method(profile, &receiver, name, &args)
            }
            Expr::Sequence(items) => Ok(Value::sequence(self.eval_all(profile, frame, items)?)),
            Expr::Mapping(pairs) => {
                let mapping = MappingRef::new();
                for (key, value) in pairs {
                    let key = self.eval(profile, frame, key)?;
                    let value = self.eval(profile, frame, value)?;
                    let key = Key::from_value(&key).ok_or_else(|| {
                        RuntimeError::type_mismatch(profile, "mapping-key", &[&key])
                    })?;
                    mapping.set(key, value);
                }
                Ok(Value::Mapping(mapping))
            }
            Expr::Logic(id) => {
                self.logic(*id)?;
                Ok(Value::Function(Callable::logic(*id, Some(profile))))
            }
        }
    }

    fn eval_all(&mut self, profile: &str, frame: &mut Frame, exprs: &[Expr]) -> RuntimeResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval(profile, frame, e)).collect()
    }
}
