//! Primitive operation errors.
//!
//! The primitive library has no notion of profiles or scopes; callers attach
//! that context when converting an [`OpError`] into a runtime error.

use core_types::Value;
use thiserror::Error;

/// Failure raised by a primitive operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpError {
    /// Operand types are not accepted by the operation
    #[error("'{op}' does not accept {operands}")]
    TypeMismatch {
        /// Operation name
        op: String,
        /// Operand type names joined with " and "
        operands: String,
    },

    /// An argument has the right type but an unusable value
    #[error("'{op}': {message}")]
    InvalidArgument {
        /// Operation name
        op: String,
        /// What was wrong
        message: String,
    },

    /// Integer division or modulo by zero
    #[error("'{op}': division by zero")]
    DivisionByZero {
        /// Operation name
        op: String,
    },

    /// A metatable was attached to a value that cannot carry one
    #[error("'{op}': a {type_name} cannot carry a metatable")]
    InvalidMetatableTarget {
        /// Operation name
        op: String,
        /// Type name of the offending value
        type_name: String,
    },
}

impl OpError {
    /// Build a `TypeMismatch` naming the operand types
    pub fn type_mismatch(op: &str, operands: &[&Value]) -> Self {
        OpError::TypeMismatch {
            op: op.to_string(),
            operands: operands
                .iter()
                .map(|v| v.type_name())
                .collect::<Vec<_>>()
                .join(" and "),
        }
    }

    /// Build an `InvalidArgument`
    pub fn invalid(op: &str, message: impl Into<String>) -> Self {
        OpError::InvalidArgument {
            op: op.to_string(),
            message: message.into(),
        }
    }

    /// Operation that failed
    pub fn op(&self) -> &str {
        match self {
            OpError::TypeMismatch { op, .. }
            | OpError::InvalidArgument { op, .. }
            | OpError::DivisionByZero { op }
            | OpError::InvalidMetatableTarget { op, .. } => op,
        }
    }
}

/// Result type for primitive operations
pub type OpResult<T> = Result<T, OpError>;
