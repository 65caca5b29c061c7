//! Value Store - partitioned variable storage for the polyglot runtime
//!
//! This component provides:
//! - Named scopes, one per profile plus the reserved `global` scope
//! - Variables addressed by (scope, identifier)
//! - Ghost variables whose reads run a side-effecting hook
//!
//! The store is an owned value: whoever creates it decides its lifetime.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ghost;
pub mod scope;
pub mod store;

pub use ghost::{GhostHook, HookFn};
pub use scope::{Cell, Scope};
pub use store::{Store, GLOBAL_SCOPE};
