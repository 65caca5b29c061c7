//! Referents: the shared, mutable containers values point at.
//!
//! A [`MappingRef`] or [`SequenceRef`] is a cheap handle. Cloning the handle
//! (and therefore cloning a [`Value`] that holds one) never copies the
//! underlying data, so a mutation made through one profile overlay is visible
//! through every other overlay holding the same referent.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{RuntimeError, RuntimeResult, Value};

/// Exclusive upper bound on the slot a sequence write may address
pub const MAX_SEQUENCE_LEN: usize = 1 << 24;

/// Key of a mapping entry.
///
/// Mappings are keyed by strings or integers. Integral floats are normalized
/// to integer keys so `t[1]` and `t[1.0]` address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Integer key
    Int(i64),
    /// String key
    Str(String),
}

impl Key {
    /// Convert a value into a key, if it has a key shape.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Int(n) => Some(Key::Int(*n)),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(Key::Int(*f as i64)),
            Value::String(s) => Some(Key::Str(s.clone())),
            _ => None,
        }
    }

    /// Convert the key back into a value.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(n) => Value::Int(*n),
            Key::Str(s) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Internal mapping data
#[derive(Debug, Default)]
pub struct MappingData {
    /// Entries by key
    entries: HashMap<Key, Value>,
    /// Insertion order of keys
    order: Vec<Key>,
    /// Optional prototype for property fallback
    prototype: Option<MappingRef>,
    /// Optional operator-override table
    metatable: Option<MappingRef>,
}

/// Shared handle to a string/number keyed mapping.
///
/// # Examples
///
/// ```
/// use core_types::{Key, MappingRef, Value};
///
/// let parent = MappingRef::new();
/// parent.set(Key::from("species"), Value::from("cat"));
///
/// let child = MappingRef::new();
/// child.set_prototype(Some(parent.clone())).unwrap();
///
/// assert_eq!(child.get_own(&Key::from("species")), None);
/// assert_eq!(child.lookup(&Key::from("species"), 8), Some(Value::from("cat")));
/// ```
#[derive(Clone, Default)]
pub struct MappingRef(Rc<RefCell<MappingData>>);

impl MappingRef {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping from key/value pairs, keeping their order
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<Key>,
    {
        let mapping = Self::new();
        for (k, v) in pairs {
            mapping.set(k.into(), v);
        }
        mapping
    }

    /// Read an own entry, ignoring the prototype chain
    pub fn get_own(&self, key: &Key) -> Option<Value> {
        self.0.borrow().entries.get(key).cloned()
    }

    /// Insert or overwrite an entry
    pub fn set(&self, key: Key, value: Value) {
        let mut data = self.0.borrow_mut();
        if !data.entries.contains_key(&key) {
            data.order.push(key.clone());
        }
        data.entries.insert(key, value);
    }

    /// Remove an own entry, returning its value
    pub fn remove(&self, key: &Key) -> Option<Value> {
        let mut data = self.0.borrow_mut();
        let removed = data.entries.remove(key);
        if removed.is_some() {
            data.order.retain(|k| k != key);
        }
        removed
    }

    /// Whether the mapping has an own entry for `key`
    pub fn contains_key(&self, key: &Key) -> bool {
        self.0.borrow().entries.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<Key> {
        self.0.borrow().order.clone()
    }

    /// Values in key insertion order
    pub fn values(&self) -> Vec<Value> {
        let data = self.0.borrow();
        data.order
            .iter()
            .filter_map(|k| data.entries.get(k).cloned())
            .collect()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> Vec<(Key, Value)> {
        let data = self.0.borrow();
        data.order
            .iter()
            .filter_map(|k| data.entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// Number of own entries
    pub fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }

    /// Whether the mapping has no own entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every own entry (prototype and metatable are kept)
    pub fn clear(&self) {
        let mut data = self.0.borrow_mut();
        data.entries.clear();
        data.order.clear();
    }

    /// The prototype link, if any
    pub fn prototype(&self) -> Option<MappingRef> {
        self.0.borrow().prototype.clone()
    }

    /// Link (or unlink) the prototype.
    ///
    /// Fails with [`RuntimeError::PrototypeCycle`] if `self` is reachable from
    /// the new prototype.
    pub fn set_prototype(&self, prototype: Option<MappingRef>) -> RuntimeResult<()> {
        let mut cursor = prototype.clone();
        while let Some(candidate) = cursor {
            if candidate.ptr_eq(self) {
                return Err(RuntimeError::PrototypeCycle);
            }
            cursor = candidate.prototype();
        }
        self.0.borrow_mut().prototype = prototype;
        Ok(())
    }

    /// Look up `key` on the mapping, then along its prototype chain.
    ///
    /// At most `max_depth` prototypes are visited.
    pub fn lookup(&self, key: &Key, max_depth: usize) -> Option<Value> {
        if let Some(v) = self.get_own(key) {
            return Some(v);
        }
        let mut cursor = self.prototype();
        let mut depth = 0;
        while let Some(proto) = cursor {
            if depth >= max_depth {
                return None;
            }
            if let Some(v) = proto.get_own(key) {
                return Some(v);
            }
            cursor = proto.prototype();
            depth += 1;
        }
        None
    }

    /// The attached metatable, if any
    pub fn metatable(&self) -> Option<MappingRef> {
        self.0.borrow().metatable.clone()
    }

    /// Attach or detach a metatable
    pub fn set_metatable(&self, metatable: Option<MappingRef>) {
        self.0.borrow_mut().metatable = metatable;
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &MappingRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of the referent for its lifetime
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for MappingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Entries are not printed: a mapping may contain itself.
        f.debug_struct("MappingRef")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("len", &self.len())
            .finish()
    }
}

/// Internal sequence data
#[derive(Debug, Default)]
pub struct SequenceData {
    /// Elements in order
    elements: Vec<Value>,
    /// Optional operator-override table
    metatable: Option<MappingRef>,
}

/// Shared handle to an ordered sequence.
///
/// Slots are addressed 0-based here; profile overlays translate their own
/// index base before reaching the referent.
#[derive(Clone, Default)]
pub struct SequenceRef(Rc<RefCell<SequenceData>>);

impl SequenceRef {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence holding `elements`
    pub fn from_vec(elements: Vec<Value>) -> Self {
        SequenceRef(Rc::new(RefCell::new(SequenceData {
            elements,
            metatable: None,
        })))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.borrow().elements.len()
    }

    /// Whether the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at a 0-based slot
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().elements.get(index).cloned()
    }

    /// Write a 0-based slot.
    ///
    /// Writing past the end pads the gap with `Null`. A slot at or beyond
    /// [`MAX_SEQUENCE_LEN`] is refused: the sequence is left unchanged and
    /// `false` is returned.
    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut data = self.0.borrow_mut();
        if index < data.elements.len() {
            data.elements[index] = value;
        } else if index < MAX_SEQUENCE_LEN {
            data.elements.resize(index, Value::Null);
            data.elements.push(value);
        } else {
            return false;
        }
        true
    }

    /// Append an element, returning the new length
    pub fn push(&self, value: Value) -> usize {
        let mut data = self.0.borrow_mut();
        data.elements.push(value);
        data.elements.len()
    }

    /// Remove and return the last element
    pub fn pop(&self) -> Option<Value> {
        self.0.borrow_mut().elements.pop()
    }

    /// Insert at a 0-based slot, clamped to the length
    pub fn insert(&self, index: usize, value: Value) {
        let mut data = self.0.borrow_mut();
        let index = index.min(data.elements.len());
        data.elements.insert(index, value);
    }

    /// Remove the element at a 0-based slot
    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut data = self.0.borrow_mut();
        if index < data.elements.len() {
            Some(data.elements.remove(index))
        } else {
            None
        }
    }

    /// Reverse in place
    pub fn reverse(&self) {
        self.0.borrow_mut().elements.reverse();
    }

    /// Remove every element
    pub fn clear(&self) {
        self.0.borrow_mut().elements.clear();
    }

    /// Snapshot of the elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().elements.clone()
    }

    /// The attached metatable, if any
    pub fn metatable(&self) -> Option<MappingRef> {
        self.0.borrow().metatable.clone()
    }

    /// Attach or detach a metatable
    pub fn set_metatable(&self, metatable: Option<MappingRef>) {
        self.0.borrow_mut().metatable = metatable;
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &SequenceRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of the referent for its lifetime
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for SequenceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceRef")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("len", &self.len())
            .finish()
    }
}
