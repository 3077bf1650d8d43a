//! # exprcalc
//!
//! exprcalc is an embeddable mathematical expression engine written in Rust.
//! It parses expressions with variables, built-in and user-defined functions,
//! then evaluates them in floating point, fixed precision decimal or
//! arbitrary-precision decimal arithmetic, or renders them as text and MathML.
//!
//! # Example
//! ```
//! use exprcalc::Parser;
//!
//! let mut parser = Parser::new();
//! parser.set_variable("r", 2).unwrap();
//! let area = parser.parse("pi*r^2").unwrap();
//! assert!((area.evaluate().unwrap() - 12.566_370_614_359_172).abs() < 1e-12);
//! assert_eq!(area.expression().unwrap(), "pi*r^2");
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed expressions.
///
/// This module declares the operators, constants and functions the engine
/// knows, and the `Node` tree the parser builds from them.
///
/// # Responsibilities
/// - Describes operator precedence, associativity and function arity.
/// - Attaches source positions to every node for error reporting.
pub mod ast;
/// Provides unified error types for parsing, evaluation and definitions.
///
/// # Responsibilities
/// - Defines error enums for every failure mode.
/// - Carries the character position of parse errors.
/// - Integrates with the standard error traits.
pub mod error;
/// Orchestrates tokenizing, parsing and evaluation.
///
/// # Responsibilities
/// - Coordinates the symbol table, lexer, parser and evaluators.
/// - Provides the entry points for parsing and evaluating expressions.
pub mod interpreter;
/// Arbitrary-precision decimal numbers.
///
/// # Responsibilities
/// - Exact addition, subtraction and multiplication of any size.
/// - Division to a configurable number of significant digits.
/// - Conversion to and from the other numeric types.
pub mod numeric;
/// General utilities for numeric conversion and helpers.
///
/// # Responsibilities
/// - Safely convert between `i64` and `f64`.
/// - Provide boolean encoding and integer helpers used by several
///   evaluators.
pub mod util;

pub use ast::Arity;
pub use error::{DefinitionError, Error, EvalError, ParseError};
pub use interpreter::{
    evaluator::{
        compile::CompiledFunction,
        core::{EvalResult, EvaluationOptions, Evaluator},
    },
    format::SeparatorStyle,
    session::{Parser, ParserResult},
    value::Value,
};
pub use numeric::big_decimal::BigDecimal;
pub use rust_decimal::Decimal;
