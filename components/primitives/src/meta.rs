//! Raw metatable attachment.
//!
//! Only referents carry a metatable; scalars are rejected with
//! [`OpError::InvalidMetatableTarget`].

use core_types::Value;

use crate::error::{OpError, OpResult};

/// Metatable operations
pub struct MetaOps;

impl MetaOps {
    /// Attach `table` (a mapping) to `target`, or detach with `Null`.
    ///
    /// Returns the target, so calls can be chained the way Lua's
    /// `setmetatable` is.
    pub fn set_metatable(target: &Value, table: &Value) -> OpResult<Value> {
        let table = match table {
            Value::Mapping(m) => Some(m.clone()),
            Value::Null | Value::Absent => None,
            other => return Err(OpError::type_mismatch("set_metatable", &[target, other])),
        };
        match target {
            Value::Mapping(m) => m.set_metatable(table),
            Value::Sequence(s) => s.set_metatable(table),
            other => {
                return Err(OpError::InvalidMetatableTarget {
                    op: "set_metatable".to_string(),
                    type_name: other.type_name().to_string(),
                })
            }
        }
        Ok(target.clone())
    }

    /// The metatable of `target`, or `Null`
    pub fn get_metatable(target: &Value) -> OpResult<Value> {
        if !target.is_referent() {
            return Err(OpError::InvalidMetatableTarget {
                op: "get_metatable".to_string(),
                type_name: target.type_name().to_string(),
            });
        }
        Ok(target.metatable().map(Value::Mapping).unwrap_or(Value::Null))
    }
}
