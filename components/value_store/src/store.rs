//! The partitioned value store.

use std::collections::HashMap;

use core_types::Value;
use tracing::trace;

use crate::ghost::GhostHook;
use crate::scope::{Cell, Scope};

/// Name of the scope visible beneath every profile scope
pub const GLOBAL_SCOPE: &str = "global";

/// Partitioned key/value memory.
///
/// Each (scope, name) pair addresses exactly one cell. Reads of unknown
/// scopes or names return [`Value::Absent`], never a stored null.
///
/// # Example
///
/// ```
/// use core_types::Value;
/// use value_store::{GhostHook, Store};
///
/// let mut store = Store::new();
/// store.set("lua", "x", Value::Int(1));
/// assert_eq!(store.get("lua", "x"), Value::Int(1));
/// assert_eq!(store.get("lua", "missing"), Value::Absent);
///
/// store.set_ghost("lua", "ctr", Value::Int(10), GhostHook::increment());
/// assert_eq!(store.get("lua", "ctr"), Value::Int(10));
/// assert_eq!(store.get("lua", "ctr"), Value::Int(11));
/// ```
#[derive(Debug)]
pub struct Store {
    scopes: HashMap<String, Scope>,
}

impl Store {
    /// Create a store holding only the empty `global` scope
    pub fn new() -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(GLOBAL_SCOPE.to_string(), Scope::new());
        Store { scopes }
    }

    fn scope_mut(&mut self, scope: &str) -> &mut Scope {
        self.scopes.entry(scope.to_string()).or_default()
    }

    /// Read a variable.
    ///
    /// A ghost-flagged variable returns the value observed before its hook
    /// runs, and stores the hook's result for the next read.
    pub fn get(&mut self, scope: &str, name: &str) -> Value {
        match self.scopes.get_mut(scope).and_then(|s| s.cell_mut(name)) {
            Some(cell) => {
                let ghost = cell.ghost.is_some();
                let observed = cell.read();
                trace!(scope, name, ghost, value = %observed, "store get");
                observed
            }
            None => {
                trace!(scope, name, "store get: absent");
                Value::Absent
            }
        }
    }

    /// Read a variable without running any ghost hook
    pub fn peek(&self, scope: &str, name: &str) -> Value {
        self.scopes
            .get(scope)
            .and_then(|s| s.cell(name))
            .map(|c| c.value.clone())
            .unwrap_or(Value::Absent)
    }

    /// Write a variable, creating the scope and variable as needed.
    ///
    /// Overwriting a ghost variable keeps its hook.
    pub fn set(&mut self, scope: &str, name: &str, value: Value) {
        trace!(scope, name, value = %value, "store set");
        self.scope_mut(scope).write(name, value);
    }

    /// Remove a variable and its ghost flag, returning whether it existed
    pub fn delete(&mut self, scope: &str, name: &str) -> bool {
        let removed = self
            .scopes
            .get_mut(scope)
            .and_then(|s| s.remove(name))
            .is_some();
        trace!(scope, name, removed, "store delete");
        removed
    }

    /// Create (or replace) a ghost variable with an initial value
    pub fn set_ghost(&mut self, scope: &str, name: &str, initial: Value, hook: GhostHook) {
        trace!(scope, name, hook = hook.name(), "store set ghost");
        self.scope_mut(scope).insert(
            name,
            Cell {
                value: initial,
                ghost: Some(hook),
            },
        );
    }

    /// Flag an existing variable as ghost, returning whether it existed
    pub fn mark_ghost(&mut self, scope: &str, name: &str, hook: GhostHook) -> bool {
        match self.scopes.get_mut(scope).and_then(|s| s.cell_mut(name)) {
            Some(cell) => {
                trace!(scope, name, hook = hook.name(), "store mark ghost");
                cell.ghost = Some(hook);
                true
            }
            None => false,
        }
    }

    /// Clear a ghost flag, keeping the value
    pub fn unmark_ghost(&mut self, scope: &str, name: &str) -> bool {
        match self.scopes.get_mut(scope).and_then(|s| s.cell_mut(name)) {
            Some(cell) => cell.ghost.take().is_some(),
            None => false,
        }
    }

    /// Whether the variable is ghost-flagged
    pub fn is_ghost(&self, scope: &str, name: &str) -> bool {
        self.scopes
            .get(scope)
            .and_then(|s| s.cell(name))
            .map_or(false, |c| c.ghost.is_some())
    }

    /// Whether the variable exists (a stored null counts)
    pub fn contains(&self, scope: &str, name: &str) -> bool {
        self.scopes
            .get(scope)
            .map_or(false, |s| s.cell(name).is_some())
    }

    /// Whether the scope exists
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Variable names in a scope, sorted
    pub fn names(&self, scope: &str) -> Vec<String> {
        self.scopes.get(scope).map(Scope::names).unwrap_or_default()
    }

    /// Every scope name, sorted
    pub fn scope_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scopes.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
