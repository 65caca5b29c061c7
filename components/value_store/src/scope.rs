//! Scopes and their variable cells.

use std::collections::HashMap;

use core_types::Value;

use crate::ghost::GhostHook;

/// One storage cell: the stored value and an optional ghost hook
#[derive(Debug, Clone)]
pub struct Cell {
    /// Current value
    pub value: Value,
    /// Hook run on every read, if the variable is ghost-flagged
    pub ghost: Option<GhostHook>,
}

impl Cell {
    /// A plain (non-ghost) cell
    pub fn new(value: Value) -> Self {
        Cell { value, ghost: None }
    }

    /// Read through the ghost path if flagged.
    ///
    /// Returns the value observed before the hook ran.
    pub fn read(&mut self) -> Value {
        let observed = self.value.clone();
        if let Some(hook) = &self.ghost {
            self.value = hook.advance(&observed);
        }
        observed
    }
}

/// A named partition of variables
#[derive(Debug, Default)]
pub struct Scope {
    vars: HashMap<String, Cell>,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell for `name`
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.vars.get(name)
    }

    /// Mutable cell for `name`
    pub fn cell_mut(&mut self, name: &str) -> Option<&mut Cell> {
        self.vars.get_mut(name)
    }

    /// Write `value`, creating the variable if needed; an existing ghost flag is kept
    pub fn write(&mut self, name: &str, value: Value) {
        match self.vars.get_mut(name) {
            Some(cell) => cell.value = value,
            None => {
                self.vars.insert(name.to_string(), Cell::new(value));
            }
        }
    }

    /// Insert a cell wholesale
    pub fn insert(&mut self, name: &str, cell: Cell) {
        self.vars.insert(name.to_string(), cell);
    }

    /// Remove the variable along with any ghost flag
    pub fn remove(&mut self, name: &str) -> Option<Cell> {
        self.vars.remove(name)
    }

    /// Variable names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vars.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the scope holds no variables
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
