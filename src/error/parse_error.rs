use thiserror::Error;

use crate::ast::Position;

/// Message used when no more specific syntax diagnosis is available.
pub const DEFAULT_SYNTAX_MESSAGE: &str = "Invalid mathematical expression.";

/// Represents all errors that can occur during tokenizing or tree building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No number pattern or symbol matched at the cursor.
    #[error("Unexpected character '{character}' at position {position}.")]
    UnexpectedCharacter {
        /// The character that could not be read.
        character: char,
        /// Where the character was found.
        position:  Position,
    },
    /// The token sequence does not form an expression.
    #[error("{message} Error at position {position}.")]
    Syntax {
        /// Details about the problem.
        message:  String,
        /// Where the problem was detected.
        position: Position,
    },
    /// Opening and closing brackets do not pair up.
    #[error("{message} Error at position {position}.")]
    Bracket {
        /// Details about the problem.
        message:  String,
        /// Position of the offending bracket.
        position: Position,
    },
    /// A function was called with the wrong number of arguments.
    #[error("Function '{name}' cannot take {count} argument(s). Error at position {position}.")]
    ArgumentCount {
        /// Name of the function.
        name:     String,
        /// Number of arguments it was given.
        count:    usize,
        /// Position of the function name.
        position: Position,
    },
    /// Brackets or calls were nested deeper than the parser allows.
    #[error("Expression is nested deeper than {limit} levels. Error at position {position}.")]
    NestingTooDeep {
        /// The configured maximum depth.
        limit:    usize,
        /// Where the limit was exceeded.
        position: Position,
    },
}

impl ParseError {
    /// Creates a syntax error with the default message.
    #[must_use]
    pub fn syntax(position: Position) -> Self {
        Self::syntax_with(DEFAULT_SYNTAX_MESSAGE, position)
    }

    /// Creates a syntax error with a specific message.
    #[must_use]
    pub fn syntax_with(message: impl Into<String>, position: Position) -> Self {
        Self::Syntax { message: message.into(),
                       position }
    }

    /// Creates a bracket error.
    #[must_use]
    pub fn bracket(message: impl Into<String>, position: Position) -> Self {
        Self::Bracket { message: message.into(),
                        position }
    }

    /// Returns the character position the error refers to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnexpectedCharacter { position, .. }
            | Self::Syntax { position, .. }
            | Self::Bracket { position, .. }
            | Self::ArgumentCount { position, .. }
            | Self::NestingTooDeep { position, .. } => *position,
        }
    }
}
