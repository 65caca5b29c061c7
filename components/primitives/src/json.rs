//! JSON encoding and decoding of runtime values

use core_types::{Key, MappingRef, Value};

use crate::error::{OpError, OpResult};

/// Deepest nesting `encode` will follow; a self-containing referent hits this
const MAX_DEPTH: usize = 64;

/// JSON operations
pub struct JsonOps;

impl JsonOps {
    /// Encode a value as a JSON string
    pub fn encode(value: &Value) -> OpResult<Value> {
        let json = Self::to_json(value, 0)?;
        serde_json::to_string(&json)
            .map(Value::from)
            .map_err(|e| OpError::invalid("json_encode", e.to_string()))
    }

    /// Decode a JSON string into fresh referents
    pub fn decode(text: &Value) -> OpResult<Value> {
        let s = text
            .as_str()
            .ok_or_else(|| OpError::type_mismatch("json_decode", &[text]))?;
        let json: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| OpError::invalid("json_decode", format!("JSON parse error: {}", e)))?;
        Ok(Self::from_json(&json))
    }

    fn to_json(value: &Value, depth: usize) -> OpResult<serde_json::Value> {
        if depth > MAX_DEPTH {
            return Err(OpError::invalid("json_encode", "value nests too deeply"));
        }
        Ok(match value {
            Value::Absent | Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(seq) => serde_json::Value::Array(
                seq.to_vec()
                    .iter()
                    .map(|v| Self::to_json(v, depth + 1))
                    .collect::<OpResult<Vec<_>>>()?,
            ),
            Value::Mapping(map) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in map.entries() {
                    obj.insert(k.to_string(), Self::to_json(&v, depth + 1)?);
                }
                serde_json::Value::Object(obj)
            }
            Value::Function(_) => {
                return Err(OpError::type_mismatch("json_encode", &[value]));
            }
        })
    }

    fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::from(s.as_str()),
            serde_json::Value::Array(items) => {
                Value::sequence(items.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(obj) => {
                let map = MappingRef::new();
                for (k, v) in obj {
                    map.set(Key::from(k.as_str()), Self::from_json(v));
                }
                Value::Mapping(map)
            }
        }
    }
}
