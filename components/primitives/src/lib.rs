//! Primitive operation library for the polyglot runtime
//!
//! Pure functions over raw, already-unwrapped [`Value`]s. Nothing here knows
//! about profiles, scopes or metatable dispatch; the semantic overlay decides
//! which primitive to call and wraps the result.
//!
//! - [`Arithmetic`] - add/sub/mul/div/mod/pow/neg and friends
//! - [`Comparison`] - eq/lt/le/gt/ge
//! - [`Bitwise`] - and/or/xor/not/shifts
//! - [`StringOps`] - upper/lower/split/join/replace/slice
//! - [`ContainerOps`] - get/set/append/pop/reverse/contains/keys/values/len
//! - [`Convert`] - to-int/to-float/to-string/to-bool and type introspection
//! - [`MetaOps`] - raw metatable attachment
//! - [`JsonOps`] - JSON encoding
//! - [`PrimitiveOp`] - the closed set of operation ids profiles bind to
//!
//! # Example
//!
//! ```
//! use core_types::Value;
//! use primitives::{ContainerOps, PrimitiveOp, StringOps};
//!
//! let words = StringOps::split(&Value::from("a b c"), None).unwrap();
//! assert_eq!(ContainerOps::len(&words).unwrap(), Value::Int(3));
//!
//! let joined = PrimitiveOp::Join.apply(&[words, Value::from("+")]).unwrap();
//! assert_eq!(joined, Value::from("a+b+c"));
//! ```
//!
//! [`Value`]: core_types::Value

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod arith;
pub mod bitwise;
pub mod compare;
pub mod container;
pub mod convert;
pub mod error;
pub mod json;
pub mod meta;
pub mod op;
pub mod string;

pub use arith::{Arithmetic, Number};
pub use bitwise::Bitwise;
pub use compare::Comparison;
pub use container::ContainerOps;
pub use convert::Convert;
pub use error::{OpError, OpResult};
pub use json::JsonOps;
pub use meta::MetaOps;
pub use op::PrimitiveOp;
pub use string::{StringOps, MAX_STRING_LEN};
