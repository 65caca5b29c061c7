//! Callable values.

use std::fmt;
use std::rc::Rc;

use crate::{RuntimeResult, Value};

/// Signature of a native function body
pub type NativeFn = dyn Fn(&[Value]) -> RuntimeResult<Value>;

/// A host-provided function
pub struct NativeFunction {
    name: String,
    func: Box<NativeFn>,
}

impl NativeFunction {
    /// Function name, used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with raw arguments
    pub fn invoke(&self, args: &[Value]) -> RuntimeResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Handle to a logic block registered with a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicId(pub usize);

/// Element-wise walk over a container that calls back into user code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Replace each element with the callback's result
    Map,
    /// Keep the elements for which the callback's result is truthy
    Filter,
}

/// Anything that can be invoked.
///
/// Native functions run host code directly. Logic callables refer to an
/// abstract-syntax block owned by the runtime; `home` names the profile whose
/// scope the block's free identifiers resolve through, regardless of which
/// profile calls it. Traversals need the runtime too, since each element is
/// handed to another callable.
#[derive(Clone)]
pub enum Callable {
    /// Host function
    Native(Rc<NativeFunction>),
    /// Registered logic block
    Logic {
        /// Registry id
        id: LogicId,
        /// Profile the block is bound to, if any
        home: Option<Rc<str>>,
    },
    /// Runtime-evaluated map or filter
    Traverse {
        /// Builtin name, used in diagnostics
        name: Rc<str>,
        /// What to do with each element
        kind: Traversal,
        /// Argument position of the callback; the container is the other one
        callback: usize,
    },
}

impl Callable {
    /// Wrap a closure as a native callable
    pub fn native<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> RuntimeResult<Value> + 'static,
    {
        Callable::Native(Rc::new(NativeFunction {
            name: name.into(),
            func: Box::new(func),
        }))
    }

    /// Reference a registered logic block
    pub fn logic(id: LogicId, home: Option<&str>) -> Self {
        Callable::Logic {
            id,
            home: home.map(Rc::from),
        }
    }

    /// Display name
    pub fn name(&self) -> String {
        match self {
            Callable::Native(f) => f.name().to_string(),
            Callable::Logic { id, .. } => format!("logic#{}", id.0),
            Callable::Traverse { name, .. } => name.to_string(),
        }
    }

    /// Identity comparison
    pub fn same(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            (
                Callable::Logic { id: a, home: ha },
                Callable::Logic { id: b, home: hb },
            ) => a == b && ha == hb,
            (
                Callable::Traverse { name: na, kind: ka, callback: ca },
                Callable::Traverse { name: nb, kind: kb, callback: cb },
            ) => na == nb && ka == kb && ca == cb,
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(func) => f.debug_tuple("Native").field(&func.name()).finish(),
            Callable::Logic { id, home } => f
                .debug_struct("Logic")
                .field("id", &id.0)
                .field("home", home)
                .finish(),
            Callable::Traverse { name, kind, .. } => f
                .debug_struct("Traverse")
                .field("name", name)
                .field("kind", kind)
                .finish(),
        }
    }
}
