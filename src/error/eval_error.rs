use thiserror::Error;

use crate::ast::Position;

/// Represents all errors that can occur while evaluating a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable was referenced before a value was assigned to it.
    #[error("Unassigned variable '{name}' used at position {position}.")]
    UnassignedVariable {
        /// The name of the variable.
        name:     String,
        /// Position of the reference.
        position: Position,
    },
    /// An exact strategy could not produce a value, for example when
    /// dividing by zero or when a floating point fallback returned NaN.
    #[error("Invalid arithmetic operation at position {position}.")]
    Arithmetic {
        /// Position of the node that failed.
        position: Position,
    },
    /// The active strategy has no native implementation of the operation and
    /// strict mode forbids falling back to floating point.
    #[error("The operation '{name}' at position {position} is not supported by this evaluator.")]
    Unsupported {
        /// Symbol of the unsupported operation.
        name:     String,
        /// Position of the operator or call.
        position: Position,
    },
    /// A boolean was demanded but the result was neither 0 nor 1.
    #[error("Cannot convert '{value}' to boolean.")]
    NotBoolean {
        /// The offending result.
        value: f64,
    },
    /// A user function was removed after the expression calling it was
    /// parsed.
    #[error("Unknown function '{name}' at position {position}.")]
    UnknownFunction {
        /// The name of the function.
        name:     String,
        /// Position of the call.
        position: Position,
    },
    /// A compiled function or built-in received the wrong number of values.
    #[error("Expected {expected} argument(s) but received {found}.")]
    ArgumentCount {
        /// Number of parameters declared.
        expected: usize,
        /// Number of values supplied.
        found:    usize,
    },
    /// A number literal does not fit the active strategy's numeric type.
    #[error("Invalid number '{text}' at position {position}.")]
    InvalidNumber {
        /// The literal text.
        text:     String,
        /// Position of the literal.
        position: Position,
    },
}
