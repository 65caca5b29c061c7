//! Core value types and error handling for the polyglot runtime.
//!
//! This crate provides the foundational types shared by every language
//! profile: the tagged [`Value`] union, the reference-semantics referents
//! it points at, callables, and the runtime error taxonomy.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of every runtime value
//! - [`MappingRef`] / [`SequenceRef`] - Shared, mutable referents
//! - [`Key`] - Mapping key (string or integer)
//! - [`Callable`] - Native functions and registered logic blocks
//! - [`RuntimeError`] - Failures, always attributed to a profile scope
//!
//! # Examples
//!
//! ```
//! use core_types::{Key, MappingRef, Value};
//!
//! let obj = MappingRef::new();
//! obj.set(Key::from("name"), Value::from("Hippo"));
//!
//! // Copying a reference never copies the referent.
//! let alias = Value::Mapping(obj.clone());
//! if let Value::Mapping(m) = &alias {
//!     m.set(Key::from("status"), Value::from("Coding"));
//! }
//! assert_eq!(obj.get_own(&Key::from("status")), Some(Value::from("Coding")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod callable;
mod error;
mod object;
mod value;

pub use callable::{Callable, LogicId, NativeFn, NativeFunction, Traversal};
pub use error::{RuntimeError, RuntimeResult};
pub use object::{Key, MappingData, MappingRef, SequenceData, SequenceRef, MAX_SEQUENCE_LEN};
pub use value::Value;
