//! Ghost variable hooks.
//!
//! A ghost variable's read observes the current value, then stores whatever
//! the hook computes from it.

use std::fmt;
use std::rc::Rc;

use core_types::Value;

/// Signature of a ghost hook: current value in, next value out
pub type HookFn = dyn Fn(&Value) -> Value;

/// A named mutation hook run on every read of a ghost variable.
///
/// # Example
///
/// ```
/// use core_types::Value;
/// use value_store::GhostHook;
///
/// let hook = GhostHook::increment();
/// assert_eq!(hook.advance(&Value::Int(10)), Value::Int(11));
/// assert_eq!(hook.advance(&Value::Absent), Value::Int(0));
/// ```
#[derive(Clone)]
pub struct GhostHook {
    name: Rc<str>,
    func: Rc<HookFn>,
}

impl GhostHook {
    /// Wrap a closure as a hook
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        GhostHook {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    /// Numeric increment.
    ///
    /// Ints and floats advance by one. Nothing (absent or null) starts the
    /// count at zero. Anything else is left unchanged.
    pub fn increment() -> Self {
        GhostHook::new("increment", |current| match current {
            Value::Int(n) => n
                .checked_add(1)
                .map(Value::Int)
                .unwrap_or(Value::Float(*n as f64 + 1.0)),
            Value::Float(f) => Value::Float(f + 1.0),
            Value::Absent | Value::Null => Value::Int(0),
            other => other.clone(),
        })
    }

    /// Hook name, for diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compute the value stored after a read of `current`
    pub fn advance(&self, current: &Value) -> Value {
        (self.func)(current)
    }
}

impl fmt::Debug for GhostHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostHook").field("name", &self.name).finish()
    }
}
