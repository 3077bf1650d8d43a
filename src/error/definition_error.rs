use thiserror::Error;

use crate::error::Error as EngineError;

/// Represents all errors raised while managing variables and functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    /// The name does not match `^[a-zA-Z]+[0-9]*$` or is already taken by a
    /// built-in symbol, variable or function.
    #[error("Given name '{name}' is either invalid or already exists.")]
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// Tried to remove a variable that does not exist.
    #[error("No variable named '{name}' was found.")]
    UnknownVariable {
        /// The requested name.
        name: String,
    },
    /// Tried to remove a function that does not exist.
    #[error("No function named '{name}' was found.")]
    UnknownFunction {
        /// The requested name.
        name: String,
    },
    /// The body of an expression function failed to parse or compile.
    #[error("Expression of function {name} is not valid.")]
    InvalidFunction {
        /// The name of the function being defined.
        name:   String,
        /// Why the body was rejected.
        #[source]
        source: Box<EngineError>,
    },
}
