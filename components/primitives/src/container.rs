//! Container operations on sequences, mappings and strings.
//!
//! Indices here are raw 0-based slots. Profile overlays translate their own
//! index base before calling in.

use core_types::{Key, MappingRef, SequenceRef, Value};

use crate::compare::Comparison;
use crate::error::{OpError, OpResult};
use crate::string::StringOps;

fn sequence<'a>(op: &str, v: &'a Value) -> OpResult<&'a SequenceRef> {
    v.as_sequence().ok_or_else(|| OpError::type_mismatch(op, &[v]))
}

fn key(op: &str, container: &Value, k: &Value) -> OpResult<Key> {
    Key::from_value(k).ok_or_else(|| OpError::type_mismatch(op, &[container, k]))
}

fn slot(v: &Value) -> Option<usize> {
    v.as_i64().and_then(|n| usize::try_from(n).ok())
}

/// Resolve a possibly negative bound against `len`, clamped into range
fn bound(v: Option<&Value>, len: usize, default: usize) -> OpResult<usize> {
    match v {
        None | Some(Value::Absent) | Some(Value::Null) => Ok(default),
        Some(v) => {
            let n = v
                .as_i64()
                .ok_or_else(|| OpError::type_mismatch("slice", &[v]))?;
            let len = len as i64;
            let resolved = if n < 0 { len + n } else { n };
            Ok(resolved.clamp(0, len) as usize)
        }
    }
}

/// Container operations
pub struct ContainerOps;

impl ContainerOps {
    /// Raw read: a sequence slot, a string character, or an own mapping entry.
    ///
    /// Missing entries read as `Absent`; the prototype chain and metatables
    /// are not consulted.
    pub fn get(container: &Value, k: &Value) -> OpResult<Value> {
        match container {
            Value::Sequence(seq) => Ok(slot(k).and_then(|i| seq.get(i)).unwrap_or(Value::Absent)),
            Value::String(s) => Ok(slot(k)
                .and_then(|i| StringOps::char_at(s, i))
                .unwrap_or(Value::Absent)),
            Value::Mapping(map) => Ok(map
                .get_own(&key("get", container, k)?)
                .unwrap_or(Value::Absent)),
            _ => Err(OpError::type_mismatch("get", &[container, k])),
        }
    }

    /// Raw write, returning the written value.
    ///
    /// Sequence writes past the end pad with `Null`. Strings are immutable.
    pub fn set(container: &Value, k: &Value, value: Value) -> OpResult<Value> {
        match container {
            Value::Sequence(seq) => {
                let i = slot(k).ok_or_else(|| {
                    OpError::invalid("set", format!("{} is not a valid slot", k))
                })?;
                if !seq.set(i, value.clone()) {
                    return Err(OpError::invalid("set", format!("slot {} is out of range", i)));
                }
                Ok(value)
            }
            Value::Mapping(map) => {
                map.set(key("set", container, k)?, value.clone());
                Ok(value)
            }
            _ => Err(OpError::type_mismatch("set", &[container, k])),
        }
    }

    /// Append every item, returning the new length
    pub fn append(seq: &Value, items: &[Value]) -> OpResult<Value> {
        let s = sequence("append", seq)?;
        let mut len = s.len();
        for item in items {
            len = s.push(item.clone());
        }
        Ok(Value::from(len))
    }

    /// Remove and return the last element (`Null` when empty)
    pub fn pop(seq: &Value) -> OpResult<Value> {
        Ok(sequence("pop", seq)?.pop().unwrap_or(Value::Null))
    }

    /// Remove and return the first element (`Null` when empty)
    pub fn shift(seq: &Value) -> OpResult<Value> {
        Ok(sequence("shift", seq)?.remove(0).unwrap_or(Value::Null))
    }

    /// Insert at a slot (clamped), returning the new length
    pub fn insert(seq: &Value, index: &Value, item: Value) -> OpResult<Value> {
        let s = sequence("insert", seq)?;
        let i = index
            .as_i64()
            .ok_or_else(|| OpError::type_mismatch("insert", &[seq, index]))?;
        s.insert(usize::try_from(i).unwrap_or(0), item);
        Ok(Value::from(s.len()))
    }

    /// Remove a sequence slot or mapping entry, returning it (`Null` if missing)
    pub fn remove(container: &Value, k: &Value) -> OpResult<Value> {
        match container {
            Value::Sequence(seq) => Ok(slot(k).and_then(|i| seq.remove(i)).unwrap_or(Value::Null)),
            Value::Mapping(map) => Ok(map
                .remove(&key("remove", container, k)?)
                .unwrap_or(Value::Null)),
            _ => Err(OpError::type_mismatch("remove", &[container, k])),
        }
    }

    /// Reverse a sequence in place (returning it) or a string into a copy
    pub fn reverse(v: &Value) -> OpResult<Value> {
        match v {
            Value::Sequence(seq) => {
                seq.reverse();
                Ok(v.clone())
            }
            Value::String(s) => Ok(Value::from(s.chars().rev().collect::<String>())),
            _ => Err(OpError::type_mismatch("reverse", &[v])),
        }
    }

    /// Membership: substring, element, or mapping key
    pub fn contains(container: &Value, item: &Value) -> OpResult<Value> {
        let found = match container {
            Value::String(s) => match item {
                Value::String(needle) => s.contains(needle.as_str()),
                _ => return Err(OpError::type_mismatch("contains", &[container, item])),
            },
            Value::Sequence(seq) => seq.to_vec().iter().any(|v| Comparison::eq(v, item)),
            Value::Mapping(map) => Key::from_value(item)
                .map(|k| map.contains_key(&k))
                .unwrap_or(false),
            _ => return Err(OpError::type_mismatch("contains", &[container, item])),
        };
        Ok(Value::Boolean(found))
    }

    /// Position of the first equal element, or -1
    pub fn index_of(seq: &Value, item: &Value) -> OpResult<Value> {
        let s = sequence("index_of", seq)?;
        Ok(Value::Int(
            s.to_vec()
                .iter()
                .position(|v| Comparison::eq(v, item))
                .map(|i| i as i64)
                .unwrap_or(-1),
        ))
    }

    /// Mapping keys in insertion order, or sequence slots
    pub fn keys(v: &Value) -> OpResult<Value> {
        match v {
            Value::Mapping(map) => Ok(Value::sequence(
                map.keys().iter().map(Key::to_value).collect(),
            )),
            Value::Sequence(seq) => Ok(Value::sequence((0..seq.len()).map(Value::from).collect())),
            _ => Err(OpError::type_mismatch("keys", &[v])),
        }
    }

    /// Mapping values in key order, or a copy of a sequence
    pub fn values(v: &Value) -> OpResult<Value> {
        match v {
            Value::Mapping(map) => Ok(Value::sequence(map.values())),
            Value::Sequence(seq) => Ok(Value::sequence(seq.to_vec())),
            _ => Err(OpError::type_mismatch("values", &[v])),
        }
    }

    /// Element, entry or character count
    pub fn len(v: &Value) -> OpResult<Value> {
        match v {
            Value::String(s) => Ok(Value::from(StringOps::char_len(s))),
            Value::Sequence(seq) => Ok(Value::from(seq.len())),
            Value::Mapping(map) => Ok(Value::from(map.len())),
            _ => Err(OpError::type_mismatch("len", &[v])),
        }
    }

    /// Remove every element or entry
    pub fn clear(v: &Value) -> OpResult<Value> {
        match v {
            Value::Sequence(seq) => seq.clear(),
            Value::Mapping(map) => map.clear(),
            _ => return Err(OpError::type_mismatch("clear", &[v])),
        }
        Ok(v.clone())
    }

    /// Half-open slice `[start, end)` of a sequence or string.
    ///
    /// Negative bounds count from the end; bounds are clamped.
    pub fn slice(v: &Value, start: Option<&Value>, end: Option<&Value>) -> OpResult<Value> {
        match v {
            Value::Sequence(seq) => {
                let items = seq.to_vec();
                let from = bound(start, items.len(), 0)?;
                let to = bound(end, items.len(), items.len())?;
                Ok(Value::sequence(if from < to {
                    items[from..to].to_vec()
                } else {
                    Vec::new()
                }))
            }
            Value::String(s) => {
                let len = StringOps::char_len(s);
                let from = bound(start, len, 0)?;
                let to = bound(end, len, len)?;
                Ok(Value::from(
                    s.chars()
                        .skip(from)
                        .take(to.saturating_sub(from))
                        .collect::<String>(),
                ))
            }
            _ => Err(OpError::type_mismatch("slice", &[v])),
        }
    }

    /// New sequence holding the arguments
    pub fn new_sequence(args: &[Value]) -> Value {
        Value::sequence(args.to_vec())
    }

    /// New mapping from alternating key/value arguments
    pub fn new_mapping(args: &[Value]) -> OpResult<Value> {
        if args.len() % 2 != 0 {
            return Err(OpError::invalid(
                "new_mapping",
                "expects alternating keys and values",
            ));
        }
        let map = MappingRef::new();
        for pair in args.chunks(2) {
            let k = Key::from_value(&pair[0])
                .ok_or_else(|| OpError::type_mismatch("new_mapping", &[&pair[0]]))?;
            map.set(k, pair[1].clone());
        }
        Ok(Value::Mapping(map))
    }

    /// New empty mapping whose prototype is `proto` (`Null` for none)
    pub fn create(proto: &Value) -> OpResult<Value> {
        let map = MappingRef::new();
        match proto {
            Value::Mapping(p) => {
                // A fresh mapping cannot be on p's chain.
                map.set_prototype(Some(p.clone()))
                    .map_err(|e| OpError::invalid("create", e.to_string()))?;
            }
            Value::Null | Value::Absent => {}
            _ => return Err(OpError::type_mismatch("create", &[proto])),
        }
        Ok(Value::Mapping(map))
    }

    /// Prototype of a mapping (`Null` for none)
    pub fn get_prototype(v: &Value) -> OpResult<Value> {
        match v {
            Value::Mapping(m) => Ok(m.prototype().map(Value::Mapping).unwrap_or(Value::Null)),
            _ => Err(OpError::type_mismatch("get_prototype", &[v])),
        }
    }
}
