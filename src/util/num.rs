use crate::ast::BinaryOperator;

/// Largest argument whose factorial is finite as an `f64`.
pub const MAX_FACTORIAL_ARGUMENT: f64 = 170.0;

/// Interprets a number as a truth value. Everything but zero is `true`.
///
/// # Example
/// ```
/// use exprcalc::util::num::to_bool;
///
/// assert!(to_bool(2.5));
/// assert!(!to_bool(0.0));
/// ```
#[must_use]
pub fn to_bool(value: f64) -> bool {
    value != 0.0
}

/// Encodes a truth value as `1.0` or `0.0`.
#[must_use]
pub const fn from_bool(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Truncates a double toward zero into an `i64`.
///
/// Out of range values saturate and NaN becomes zero.
///
/// # Example
/// ```
/// use exprcalc::util::num::truncate_to_i64;
///
/// assert_eq!(truncate_to_i64(-7.9), -7);
/// assert_eq!(truncate_to_i64(f64::NAN), 0);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn truncate_to_i64(value: f64) -> i64 {
    value as i64
}

/// Converts an integer to a double, rounding when it has more than 53
/// significant bits.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Applies a bitwise or shift operator to two integers.
///
/// Shift counts wrap the way hardware shifts do: `<<` and `>>` use the low
/// six bits of the count, `>>>` works on the low 32 bits of the left operand
/// and uses the low five bits of the count.
///
/// # Returns
/// `None` if `op` is not one of `&`, `|`, `^|`, `<<`, `>>` or `>>>`.
///
/// # Example
/// ```
/// use exprcalc::{ast::BinaryOperator, util::num::bitwise};
///
/// assert_eq!(bitwise(BinaryOperator::BitXor, 6, 11), Some(13));
/// assert_eq!(bitwise(BinaryOperator::Shr, -24, 2), Some(-6));
/// assert_eq!(bitwise(BinaryOperator::Add, 1, 2), None);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub const fn bitwise(op: BinaryOperator, left: i64, right: i64) -> Option<i64> {
    let count = right as u32;
    let value = match op {
        BinaryOperator::BitAnd => left & right,
        BinaryOperator::BitOr => left | right,
        BinaryOperator::BitXor => left ^ right,
        BinaryOperator::Shl => left.wrapping_shl(count),
        BinaryOperator::Shr => left.wrapping_shr(count),
        BinaryOperator::UShr => (left as u32).wrapping_shr(count) as i64,
        _ => return None,
    };
    Some(value)
}

/// Returns -1, 0 or 1 according to the sign of `value`; NaN stays NaN.
///
/// # Example
/// ```
/// use exprcalc::util::num::sign;
///
/// assert_eq!(sign(-5.0), -1.0);
/// assert_eq!(sign(0.0), 0.0);
/// ```
#[must_use]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        value
    }
}

/// Computes `value!` for non-negative integers.
///
/// # Returns
/// NaN for negative or fractional input, infinity past
/// [`MAX_FACTORIAL_ARGUMENT`].
///
/// # Example
/// ```
/// use exprcalc::util::num::factorial;
///
/// assert_eq!(factorial(5.0), 120.0);
/// assert!(factorial(2.5).is_nan());
/// assert!(factorial(-1.0).is_nan());
/// ```
#[must_use]
pub fn factorial(value: f64) -> f64 {
    if value < 0.0 || value.fract() != 0.0 || value.is_nan() {
        return f64::NAN;
    }
    if value > MAX_FACTORIAL_ARGUMENT {
        return f64::INFINITY;
    }

    let mut result = 1.0;
    let mut factor = 2.0;
    while factor <= value {
        result *= factor;
        factor += 1.0;
    }
    result
}
