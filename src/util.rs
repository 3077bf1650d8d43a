/// Numeric helpers shared by the evaluation strategies.
///
/// This module holds the small conversions every strategy agrees on: how a
/// number is read as a boolean, how operands of bitwise operators are
/// truncated to integers, and how factorial and sign behave on doubles.
pub mod num;
