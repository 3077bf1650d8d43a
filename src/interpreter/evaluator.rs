/// The evaluation strategy trait and its options.
///
/// Defines the [`core::Evaluator`] trait every strategy implements, the
/// result alias shared by all of them and [`core::EvaluationOptions`].
pub mod core;

/// Floating point evaluation.
///
/// IEEE double arithmetic with epsilon-tolerant comparisons. Division by
/// zero yields NaN instead of an error.
pub mod double;

/// Fixed precision decimal evaluation.
///
/// # Responsibilities
/// - Exact arithmetic, comparisons and bitwise operations on `Decimal`.
/// - Falls back to floating point for transcendental functions unless strict
///   mode is on.
/// - Reports division by zero and NaN fallbacks as arithmetic errors.
pub mod decimal;

/// Arbitrary-precision decimal evaluation.
///
/// Same fallback policy as [`decimal`], over
/// [`BigDecimal`](crate::numeric::big_decimal::BigDecimal).
pub mod big_decimal;

/// Boolean evaluation on top of floating point.
pub mod boolean;

/// Infix and postfix text rendering.
pub mod text;

/// MathML rendering.
pub mod mathml;

/// Compilation into native closures.
///
/// # Responsibilities
/// - Turns a tree into a closure over declared parameters, resolving every
///   other variable once at compile time.
/// - Backs user-defined functions and the bodies of `sum` and `prod`.
pub mod compile;
