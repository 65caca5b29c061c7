//! Polyglot runtime: scope resolution, semantic overlays, metamethod
//! dispatch and environment rebinding.
//!
//! This crate turns the shared value model from `core_types` into something
//! several languages can operate on at once:
//! - Declarative profiles (`js`, `lua`, `ruby`, `php`, `py`, `c`) loaded from JSON
//! - A resolution chain from profile scope through builtins to `global`
//! - Metatable overrides that take precedence over every profile's defaults
//! - Logic blocks that run under whichever profile invokes them
//!
//! # Example
//!
//! ```
//! use core_types::Value;
//! use interpreter::Runtime;
//!
//! let mut rt = Runtime::new().unwrap();
//!
//! // Ruby pushes, Lua reads with its own index base
//! let items = Value::sequence(vec![]);
//! rt.invoke_method("ruby", &items, "push", &[Value::from("x")]).unwrap();
//! assert_eq!(rt.index_get("lua", &items, &Value::Int(1)).unwrap(), Value::from("x"));
//!
//! // Each profile has its own scope beneath a shared global one
//! rt.set_shared("key", Value::from("G"));
//! assert_eq!(rt.resolve("php", "key").unwrap(), Value::from("G"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ast;
pub mod config;
pub mod dispatch;
pub mod overlay;
pub mod profile;
mod rebinder;
pub mod resolver;
pub mod runtime;

// Re-export main types at crate root
pub use ast::{Expr, Literal, Logic, Stmt};
pub use config::{ConfigError, RuntimeConfig};
pub use dispatch::{Dispatcher, Operator, Override, Side};
pub use overlay::{BindingContext, Overlay, Wrapped};
pub use profile::{
    Binding, BindingKind, Builtin, CoercionRule, DisplayText, FalsyClass, ProfileSpec, Returns,
    Traverse, TraverseKind,
};
pub use resolver::{ChainResolver, Environment, Resolver};
pub use runtime::Runtime;
