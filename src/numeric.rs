/// Arbitrary-precision decimal arithmetic.
///
/// Provides [`BigDecimal`](big_decimal::BigDecimal), a `mantissa × 10^exponent`
/// number over an unbounded integer. Addition, subtraction and multiplication
/// are exact; division keeps a process-wide number of significant digits.
///
/// # Responsibilities
/// - Parses and formats decimal text with either separator style.
/// - Implements exact arithmetic and precision-bounded division.
/// - Converts to and from `f64`, `i64` and fixed precision decimals.
pub mod big_decimal;
