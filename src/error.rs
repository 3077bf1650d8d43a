use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur while tokenizing an expression and
/// building its tree. Every variant carries the character position the
/// problem was detected at.
pub mod parse_error;
/// Evaluation errors.
///
/// Contains all error types that can be raised while walking a parsed tree:
/// unassigned variables, exact arithmetic failures, operations a strategy
/// does not support in strict mode, and non-boolean results.
pub mod eval_error;
/// Definition errors.
///
/// Raised when variables or functions are declared, assigned or removed
/// with names that are invalid, already taken or unknown.
pub mod definition_error;

pub use definition_error::DefinitionError;
pub use eval_error::EvalError;
pub use parse_error::ParseError;

/// Any error the engine can report.
///
/// Lets callers combine parsing, evaluation and definition steps with `?`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The expression text was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The tree could not be evaluated.
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// A variable or function definition was rejected.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
