//! Runtime error taxonomy.
//!
//! Every failure that can surface to a caller names the profile scope it
//! happened in, so an error is attributable to a specific semantic context
//! rather than to a generic runtime fault.

use thiserror::Error;

use crate::Value;

/// Errors raised by resolution, dispatch and overlay operations.
///
/// # Examples
///
/// ```
/// use core_types::RuntimeError;
///
/// let err = RuntimeError::NameNotFound {
///     scope: "lua".to_string(),
///     name: "missing".to_string(),
/// };
///
/// assert_eq!(err.scope(), Some("lua"));
/// assert_eq!(err.to_string(), "[lua] name 'missing' not found");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// The resolution chain was exhausted without finding the identifier
    #[error("[{scope}] name '{name}' not found")]
    NameNotFound {
        /// Profile scope the lookup started from
        scope: String,
        /// Identifier that failed to resolve
        name: String,
    },

    /// An operator has no coercion path for the operand types
    #[error("[{scope}] type mismatch in '{operator}': {operands}")]
    TypeMismatch {
        /// Profile scope whose coercion rules were applied
        scope: String,
        /// Operator name
        operator: String,
        /// Operand type names, e.g. `"string and int"`
        operands: String,
    },

    /// A metatable was attached to or read from a value that cannot carry one
    #[error("[{scope}] '{operator}': a {type_name} cannot carry a metatable")]
    InvalidMetatableTarget {
        /// Profile scope that attempted the operation
        scope: String,
        /// Operation that required a metatable
        operator: String,
        /// Type name of the offending value
        type_name: String,
    },

    /// Neither the method table nor the referent knows the member
    #[error("[{scope}] property or method '{name}' not found")]
    PropertyNotFound {
        /// Profile scope of the overlay
        scope: String,
        /// Member name
        name: String,
    },

    /// A call was attempted on a value that is not callable
    #[error("[{scope}] a {type_name} value is not callable")]
    NotCallable {
        /// Profile scope of the caller
        scope: String,
        /// Type name of the callee
        type_name: String,
    },

    /// Linking the prototype would make the chain cyclic
    #[error("prototype link would create a cycle")]
    PrototypeCycle,

    /// No profile is registered under the given name
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    /// No logic block is registered under the given id
    #[error("unknown logic block #{0}")]
    UnknownLogic(usize),

    /// A logic block was called with the wrong number of arguments
    #[error("[{scope}] '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Profile scope the logic executed under
        scope: String,
        /// Logic name
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Nested invocations exceeded the configured limit
    #[error("[{scope}] call depth limit of {limit} exceeded")]
    CallDepthExceeded {
        /// Profile scope of the invocation that crossed the limit
        scope: String,
        /// Configured limit
        limit: usize,
    },

    /// A primitive operation rejected its arguments
    #[error("[{scope}] '{operator}' failed: {message}")]
    Primitive {
        /// Profile scope of the overlay that issued the call
        scope: String,
        /// Primitive operation name
        operator: String,
        /// Description from the primitive library
        message: String,
    },
}

impl RuntimeError {
    /// Build a `TypeMismatch` from the offending operands.
    pub fn type_mismatch(scope: &str, operator: &str, operands: &[&Value]) -> Self {
        let operands = operands
            .iter()
            .map(|v| v.type_name())
            .collect::<Vec<_>>()
            .join(" and ");
        RuntimeError::TypeMismatch {
            scope: scope.to_string(),
            operator: operator.to_string(),
            operands,
        }
    }

    /// The profile scope this error is attributed to, if any.
    pub fn scope(&self) -> Option<&str> {
        match self {
            RuntimeError::NameNotFound { scope, .. }
            | RuntimeError::TypeMismatch { scope, .. }
            | RuntimeError::InvalidMetatableTarget { scope, .. }
            | RuntimeError::PropertyNotFound { scope, .. }
            | RuntimeError::NotCallable { scope, .. }
            | RuntimeError::ArityMismatch { scope, .. }
            | RuntimeError::CallDepthExceeded { scope, .. }
            | RuntimeError::Primitive { scope, .. } => Some(scope),
            RuntimeError::PrototypeCycle
            | RuntimeError::UnknownProfile(_)
            | RuntimeError::UnknownLogic(_) => None,
        }
    }
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
