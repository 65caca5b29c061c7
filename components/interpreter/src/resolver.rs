//! Scope resolution.
//!
//! An identifier read under profile scope `S` is looked up, in order:
//!
//! 1. in the store under `S` (through the ghost hook when the cell is flagged)
//! 2. among the builtins of the overlay registered as `S`
//! 3. in the store's global scope
//! 4. in the outer environment supplied by the caller
//!
//! and fails with [`RuntimeError::NameNotFound`] only after all of them
//! miss. A stored null is a hit; only an absent cell falls through.

use std::collections::HashMap;
use std::rc::Rc;

use core_types::{RuntimeError, RuntimeResult, Value};
use tracing::trace;
use value_store::{Store, GLOBAL_SCOPE};

use crate::overlay::Overlay;

/// Resolves identifiers within a scope
pub trait Resolver {
    /// Find the value bound to `name` as seen from `scope`
    fn resolve(&mut self, scope: &str, name: &str) -> RuntimeResult<Value>;
}

/// Outermost bindings consulted after the global scope
pub trait Environment {
    /// The binding for `name`, if any
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl Environment for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Environment for () {
    fn lookup(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// The standard resolution chain over a store and a set of overlays.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use core_types::Value;
/// use interpreter::{ChainResolver, Resolver};
/// use value_store::Store;
///
/// let mut store = Store::new();
/// store.set("global", "key", Value::from("G"));
/// let overlays = HashMap::new();
/// let mut resolver = ChainResolver::new(&mut store, &overlays, &());
///
/// assert_eq!(resolver.resolve("a", "key").unwrap(), Value::from("G"));
/// assert!(resolver.resolve("a", "nope").is_err());
/// ```
pub struct ChainResolver<'a> {
    store: &'a mut Store,
    overlays: &'a HashMap<String, Rc<Overlay>>,
    outer: &'a dyn Environment,
}

impl<'a> ChainResolver<'a> {
    /// Build a resolver over borrowed runtime state
    pub fn new(
        store: &'a mut Store,
        overlays: &'a HashMap<String, Rc<Overlay>>,
        outer: &'a dyn Environment,
    ) -> Self {
        Self {
            store,
            overlays,
            outer,
        }
    }
}

impl Resolver for ChainResolver<'_> {
    fn resolve(&mut self, scope: &str, name: &str) -> RuntimeResult<Value> {
        if self.store.contains(scope, name) {
            trace!(scope, name, step = "scope", "resolved");
            return Ok(self.store.get(scope, name));
        }
        if let Some(value) = self.overlays.get(scope).and_then(|o| o.builtin(name)) {
            trace!(scope, name, step = "builtin", "resolved");
            return Ok(value);
        }
        if scope != GLOBAL_SCOPE && self.store.contains(GLOBAL_SCOPE, name) {
            trace!(scope, name, step = "global", "resolved");
            return Ok(self.store.get(GLOBAL_SCOPE, name));
        }
        if let Some(value) = self.outer.lookup(name) {
            trace!(scope, name, step = "outer", "resolved");
            return Ok(value);
        }
        trace!(scope, name, "unresolved");
        Err(RuntimeError::NameNotFound {
            scope: scope.to_string(),
            name: name.to_string(),
        })
    }
}
