use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Div, Mul, Neg, Rem, Sub},
    str::FromStr,
    sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use thiserror::Error;

/// Significant digits kept by division unless changed with [`set_precision`].
pub const DEFAULT_PRECISION: usize = 50;

/// Largest scale a [`Decimal`] can carry.
const MAX_DECIMAL_SCALE: u32 = 28;
/// Width of a [`Decimal`] mantissa.
const MAX_DECIMAL_BITS: u64 = 96;

/// Largest power of ten a normalized [`BigDecimal`] may carry, in either
/// direction. Aligning two values never needs more than twice this many
/// extra digits.
pub const MAX_EXPONENT: i32 = 100_000;

static PRECISION: AtomicUsize = AtomicUsize::new(DEFAULT_PRECISION);

/// Returns the number of significant digits division keeps.
#[must_use]
pub fn precision() -> usize {
    PRECISION.load(AtomicOrdering::Relaxed)
}

/// Sets the number of significant digits division keeps, process wide.
///
/// Values below one are treated as one.
pub fn set_precision(digits: usize) {
    PRECISION.store(digits.max(1), AtomicOrdering::Relaxed);
}

/// Raised when text cannot be read as a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{text}' is not a valid decimal number.")]
pub struct ParseBigDecimalError {
    /// The rejected text.
    pub text: String,
}

/// An arbitrary-precision decimal number, `mantissa × 10^exponent`.
///
/// Values are always normalized: the mantissa has no trailing zero digits,
/// and zero is stored as `0 × 10^0`. This makes the derived equality and
/// hashing agree with numeric equality.
///
/// Addition, subtraction and multiplication are exact. Division keeps
/// [`precision`] significant digits and truncates the rest. Exponents are
/// limited to [`MAX_EXPONENT`]; the `checked_*` methods report results beyond
/// it as `None`, while the operators panic like integer overflow.
///
/// # Example
/// ```
/// use exprcalc::BigDecimal;
///
/// let a: BigDecimal = "0.1".parse().unwrap();
/// let b: BigDecimal = "0.2".parse().unwrap();
/// assert_eq!((a + b).to_string(), "0.3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    mantissa: BigInt,
    exponent: i32,
}

fn ten_pow(power: u32) -> BigInt {
    BigInt::from(10u8).pow(power)
}

fn digit_count(value: &BigInt) -> usize {
    if value.is_zero() { 1 } else { value.magnitude().to_str_radix(10).len() }
}

fn in_range(value: Option<BigDecimal>) -> BigDecimal {
    match value {
        Some(value) => value,
        None => panic!("decimal exponent out of range"),
    }
}

impl BigDecimal {
    /// Creates `mantissa × 10^exponent`, normalizing trailing zeros away.
    ///
    /// # Panics
    /// Panics if the normalized exponent is beyond [`MAX_EXPONENT`].
    #[must_use]
    pub fn new(mantissa: impl Into<BigInt>, exponent: i32) -> Self {
        in_range(Self::checked_new(mantissa, i64::from(exponent)))
    }

    /// Creates `mantissa × 10^exponent`, normalizing trailing zeros away.
    ///
    /// # Returns
    /// `None` if the normalized exponent is beyond [`MAX_EXPONENT`].
    ///
    /// # Example
    /// ```
    /// use exprcalc::{BigDecimal, numeric::big_decimal::MAX_EXPONENT};
    ///
    /// let limit = i64::from(MAX_EXPONENT);
    /// assert!(BigDecimal::checked_new(1, limit).is_some());
    /// assert!(BigDecimal::checked_new(10, limit).is_none());
    /// assert_eq!(BigDecimal::checked_new(0, i64::MAX), Some(BigDecimal::zero()));
    /// ```
    #[must_use]
    pub fn checked_new(mantissa: impl Into<BigInt>, exponent: i64) -> Option<Self> {
        let mut mantissa = mantissa.into();
        if mantissa.is_zero() {
            return Some(Self::zero());
        }
        let mut exponent = exponent;
        let ten = BigInt::from(10u8);
        loop {
            let (quotient, remainder) = mantissa.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            mantissa = quotient;
            exponent = exponent.checked_add(1)?;
        }
        let exponent = i32::try_from(exponent).ok()?;
        if exponent.unsigned_abs() > MAX_EXPONENT.unsigned_abs() {
            return None;
        }
        Some(Self { mantissa, exponent })
    }

    /// Returns `0`.
    #[must_use]
    pub fn zero() -> Self {
        Self { mantissa: BigInt::zero(),
               exponent: 0 }
    }

    /// Returns `1`.
    #[must_use]
    pub fn one() -> Self {
        Self::from(1)
    }

    /// The unscaled digits.
    #[must_use]
    pub const fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// The power of ten the mantissa is scaled by.
    #[must_use]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Returns `true` for zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Returns `true` for values below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Returns `true` if the value has no fractional part.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.exponent >= 0
    }

    /// Returns the number of digits in the mantissa.
    #[must_use]
    pub fn digits(&self) -> usize {
        digit_count(&self.mantissa)
    }

    /// Drops mantissa digits beyond `precision`, rounding toward zero.
    ///
    /// # Example
    /// ```
    /// use exprcalc::BigDecimal;
    ///
    /// let value: BigDecimal = "-123.456".parse().unwrap();
    /// assert_eq!(value.truncate(4).to_string(), "-123.4");
    /// ```
    #[must_use]
    pub fn truncate(&self, precision: usize) -> Self {
        let digits = self.digits();
        if digits <= precision {
            return self.clone();
        }
        let Ok(shift) = u32::try_from(digits - precision) else {
            return Self::zero();
        };
        let exponent = i64::from(self.exponent) + i64::from(shift);
        Self::checked_new(&self.mantissa / ten_pow(shift), exponent).unwrap_or_else(|| self.clone())
    }

    /// Returns the largest integer not greater than the value.
    ///
    /// # Example
    /// ```
    /// use exprcalc::BigDecimal;
    ///
    /// let value: BigDecimal = "-2.5".parse().unwrap();
    /// assert_eq!(value.floor(), BigDecimal::from(-3));
    /// ```
    #[must_use]
    pub fn floor(&self) -> Self {
        if self.is_integer() {
            return self.clone();
        }
        let divisor = ten_pow(self.exponent.unsigned_abs());
        Self::new(self.mantissa.div_floor(&divisor), 0)
    }

    /// Divides, keeping at least [`precision`] significant digits.
    ///
    /// The dividend is scaled so the integer quotient carries enough digits,
    /// then excess digits are truncated.
    ///
    /// # Returns
    /// `None` if `divisor` is zero or the quotient is out of range.
    #[must_use]
    pub fn checked_div(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        let limit = precision();
        let gap = i64::try_from(self.digits()).ok()? - i64::try_from(divisor.digits()).ok()?;
        let change = (i64::try_from(limit).ok()? - gap).max(0);
        let scaled = &self.mantissa * ten_pow(u32::try_from(change).ok()?);
        let exponent = i64::from(self.exponent) - i64::from(divisor.exponent) - change;
        let quotient = Self::checked_new(scaled / &divisor.mantissa, exponent)?;
        Some(quotient.truncate(limit))
    }

    /// Computes `self - divisor * floor(self / divisor)`.
    ///
    /// # Returns
    /// `None` if `divisor` is zero or an intermediate result is out of range.
    #[must_use]
    pub fn checked_rem(&self, divisor: &Self) -> Option<Self> {
        let quotient = self.checked_div(divisor)?.floor();
        self.checked_sub(&divisor.checked_mul(&quotient)?)
    }

    /// Adds exactly.
    ///
    /// # Returns
    /// `None` if the sum is out of range.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let (left, right, exponent) = self.aligned(other);
        Self::checked_new(left + right, i64::from(exponent))
    }

    /// Subtracts exactly.
    ///
    /// # Returns
    /// `None` if the difference is out of range.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let (left, right, exponent) = self.aligned(other);
        Self::checked_new(left - right, i64::from(exponent))
    }

    /// Multiplies exactly.
    ///
    /// # Returns
    /// `None` if the product is out of range.
    ///
    /// # Example
    /// ```
    /// use exprcalc::BigDecimal;
    ///
    /// let big = BigDecimal::new(1, 60_000);
    /// assert_eq!(big.checked_mul(&BigDecimal::new(5, -60_000)), Some(BigDecimal::from(5)));
    /// assert_eq!(big.checked_mul(&big), None);
    /// ```
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        Self::checked_new(&self.mantissa * &other.mantissa,
                          i64::from(self.exponent) + i64::from(other.exponent))
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self { mantissa: self.mantissa.abs(),
               exponent: self.exponent }
    }

    /// Returns both mantissas scaled to the smaller of the two exponents.
    fn aligned(&self, other: &Self) -> (BigInt, BigInt, i32) {
        let shift = self.exponent.abs_diff(other.exponent);
        match self.exponent.cmp(&other.exponent) {
            Ordering::Greater => {
                (&self.mantissa * ten_pow(shift), other.mantissa.clone(), other.exponent)
            },
            Ordering::Less => {
                (self.mantissa.clone(), &other.mantissa * ten_pow(shift), self.exponent)
            },
            Ordering::Equal => (self.mantissa.clone(), other.mantissa.clone(), self.exponent),
        }
    }

    /// Reads a number written with `separator` as the decimal point.
    ///
    /// Accepts an optional sign, grouping whitespace and an `E` exponent
    /// suffix. The value is exact: no digits are dropped. Values whose
    /// exponent is beyond [`MAX_EXPONENT`] are rejected.
    ///
    /// # Example
    /// ```
    /// use exprcalc::BigDecimal;
    ///
    /// let value = BigDecimal::parse("1 234,5", ',').unwrap();
    /// assert_eq!(value.to_string(), "1234.5");
    ///
    /// let value = BigDecimal::parse("2.5E3", '.').unwrap();
    /// assert_eq!(value, BigDecimal::from(2500));
    /// ```
    pub fn parse(text: &str, separator: char) -> Result<Self, ParseBigDecimalError> {
        let invalid = || ParseBigDecimalError { text: text.to_string() };
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        let (number, exponent) = match cleaned.split_once(['E', 'e']) {
            Some((number, exponent)) => (number, exponent.parse::<i32>().map_err(|_| invalid())?),
            None => (cleaned.as_str(), 0),
        };
        let (negative, unsigned) = match number.as_bytes().first() {
            Some(b'-') => (true, &number[1..]),
            Some(b'+') => (false, &number[1..]),
            _ => (false, number),
        };
        let (integral, fractional) = unsigned.split_once(separator).unwrap_or((unsigned, ""));
        let digits = format!("{integral}{fractional}");
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mantissa = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let scale = i64::try_from(fractional.len()).map_err(|_| invalid())?;
        let exponent = i64::from(exponent) - scale;
        Self::checked_new(if negative { -mantissa } else { mantissa }, exponent).ok_or_else(invalid)
    }

    /// Converts a double using its shortest round-trip decimal form, so
    /// `0.1` becomes exactly `0.1`.
    ///
    /// # Returns
    /// `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::parse(&format!("{value:e}"), '.').ok()
    }

    /// Converts to the nearest double.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        format!("{}E{}", self.mantissa, self.exponent).parse()
                                                     .unwrap_or(f64::NAN)
    }

    /// Truncates toward zero into an `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        if self.exponent > 18 {
            return None;
        }
        if self.exponent < 0 && self.exponent.unsigned_abs() as usize >= self.digits() {
            return Some(0);
        }
        let power = ten_pow(self.exponent.unsigned_abs());
        if self.exponent >= 0 {
            (&self.mantissa * power).to_i64()
        } else {
            (&self.mantissa / power).to_i64()
        }
    }

    /// Converts to a fixed precision decimal, truncating fractional digits
    /// beyond its 28 digit scale.
    ///
    /// # Returns
    /// `None` if the integral part does not fit.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        if self.exponent > 29 {
            return None;
        }
        let mut mantissa = self.mantissa.clone();
        if self.exponent > 0 {
            mantissa *= ten_pow(self.exponent.unsigned_abs());
        }
        let mut scale = if self.exponent < 0 { self.exponent.unsigned_abs() } else { 0 };
        if scale > MAX_DECIMAL_SCALE {
            mantissa /= ten_pow(scale - MAX_DECIMAL_SCALE);
            scale = MAX_DECIMAL_SCALE;
        }
        let ten = BigInt::from(10u8);
        while mantissa.bits() > MAX_DECIMAL_BITS {
            if scale == 0 {
                return None;
            }
            mantissa /= &ten;
            scale -= 1;
        }
        Decimal::try_from_i128_with_scale(mantissa.to_i128()?, scale).ok()
    }

    /// Renders the value with `separator` as the decimal point.
    ///
    /// Positive exponents use scientific notation (`12E3`); everything else
    /// is written out positionally, padding with zeros below one.
    ///
    /// # Example
    /// ```
    /// use exprcalc::BigDecimal;
    ///
    /// assert_eq!(BigDecimal::new(-5, -3).to_string_with(','), "-0,005");
    /// assert_eq!(BigDecimal::new(12, 3).to_string_with('.'), "12E3");
    /// ```
    #[must_use]
    pub fn to_string_with(&self, separator: char) -> String {
        let digits = self.mantissa.magnitude().to_str_radix(10);
        let sign = if self.is_negative() { "-" } else { "" };
        match self.exponent.cmp(&0) {
            Ordering::Greater => format!("{sign}{digits}E{}", self.exponent),
            Ordering::Equal => format!("{sign}{digits}"),
            Ordering::Less => {
                let fraction = self.exponent.unsigned_abs() as usize;
                if fraction >= digits.len() {
                    let zeros = "0".repeat(fraction - digits.len());
                    format!("{sign}0{separator}{zeros}{digits}")
                } else {
                    let (integral, fractional) = digits.split_at(digits.len() - fraction);
                    format!("{sign}{integral}{separator}{fractional}")
                }
            },
        }
    }
}

impl Default for BigDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for BigDecimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::new(value, 0)
    }
}

impl From<i32> for BigDecimal {
    fn from(value: i32) -> Self {
        Self::new(value, 0)
    }
}

impl From<Decimal> for BigDecimal {
    #[allow(clippy::cast_possible_wrap)]
    fn from(value: Decimal) -> Self {
        Self::new(value.mantissa(), -(value.scale() as i32))
    }
}

impl FromStr for BigDecimal {
    type Err = ParseBigDecimalError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text, '.')
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with('.'))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left, right, _) = self.aligned(other);
        left.cmp(&right)
    }
}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for &BigDecimal {
    type Output = BigDecimal;

    /// # Panics
    /// Panics if the sum is out of range.
    fn add(self, rhs: Self) -> BigDecimal {
        in_range(self.checked_add(rhs))
    }
}

impl Sub for &BigDecimal {
    type Output = BigDecimal;

    /// # Panics
    /// Panics if the difference is out of range.
    fn sub(self, rhs: Self) -> BigDecimal {
        in_range(self.checked_sub(rhs))
    }
}

impl Mul for &BigDecimal {
    type Output = BigDecimal;

    /// # Panics
    /// Panics if the product is out of range.
    fn mul(self, rhs: Self) -> BigDecimal {
        in_range(self.checked_mul(rhs))
    }
}

impl Div for &BigDecimal {
    type Output = BigDecimal;

    /// # Panics
    /// Panics if `rhs` is zero, like integer division.
    fn div(self, rhs: Self) -> BigDecimal {
        match self.checked_div(rhs) {
            Some(quotient) => quotient,
            None if rhs.is_zero() => panic!("attempt to divide by zero"),
            None => panic!("decimal exponent out of range"),
        }
    }
}

impl Rem for &BigDecimal {
    type Output = BigDecimal;

    /// # Panics
    /// Panics if `rhs` is zero, like integer remainder, or if an intermediate
    /// result is out of range.
    fn rem(self, rhs: Self) -> BigDecimal {
        let quotient = (self / rhs).floor();
        self - &(rhs * &quotient)
    }
}

impl Neg for &BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> BigDecimal {
        BigDecimal { mantissa: -&self.mantissa,
                     exponent: self.exponent }
    }
}

impl Neg for BigDecimal {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

/// Forwards an operator implemented on references to owned operands.
macro_rules! forward_owned_binop {
    ($($imp:ident, $method:ident;)*) => {
        $(
            impl $imp for BigDecimal {
                type Output = Self;

                fn $method(self, rhs: Self) -> Self {
                    (&self).$method(&rhs)
                }
            }

            impl $imp<&BigDecimal> for BigDecimal {
                type Output = Self;

                fn $method(self, rhs: &Self) -> Self {
                    (&self).$method(rhs)
                }
            }
        )*
    };
}

forward_owned_binop! {
    Add, add;
    Sub, sub;
    Mul, mul;
    Div, div;
    Rem, rem;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    #[test]
    fn normalizes_trailing_zeros() {
        let value = BigDecimal::new(1200, -1);
        assert_eq!(value.mantissa(), &BigInt::from(12));
        assert_eq!(value.exponent(), 1);
        assert_eq!(BigDecimal::new(0, 7).exponent(), 0);
    }

    #[test]
    fn add_and_subtract_are_exact() {
        let sum = dec("0.1") + dec("0.2");
        assert_eq!(sum, dec("0.3"));
        assert_eq!(dec("123456789.987654321") - dec("0.000000001"), dec("123456789.98765432"));
    }

    #[test]
    fn multiply_sums_exponents() {
        assert_eq!(dec("1.5") * dec("0.02"), dec("0.03"));
        assert_eq!(dec("-4") * dec("2.5"), dec("-10"));
    }

    #[test]
    fn division_keeps_precision() {
        let third = dec("1") / dec("3");
        assert_eq!(third.digits(), precision());
        assert!(third.to_string().starts_with("0.3333333333"));
        assert_eq!(dec("10") / dec("4"), dec("2.5"));
    }

    #[test]
    fn division_by_zero_is_none_when_checked() {
        assert!(dec("1").checked_div(&BigDecimal::zero()).is_none());
    }

    #[test]
    #[should_panic(expected = "divide by zero")]
    fn division_by_zero_panics() {
        let _ = dec("1") / BigDecimal::zero();
    }

    #[test]
    fn remainder_follows_floor_division() {
        assert_eq!(dec("7") % dec("3"), dec("1"));
        assert_eq!(dec("-7") % dec("3"), dec("2"));
        assert_eq!(dec("5.5") % dec("2"), dec("1.5"));
    }

    #[test]
    fn compares_across_exponents() {
        assert!(dec("0.5") < dec("2"));
        assert!(dec("-10") < dec("-9.99"));
        assert_eq!(dec("1.50").cmp(&dec("1.5")), Ordering::Equal);
    }

    #[test]
    fn formats_like_the_input() {
        assert_eq!(dec("0.05").to_string(), "0.05");
        assert_eq!(dec("-0.05").to_string(), "-0.05");
        assert_eq!(dec("12.5").to_string(), "12.5");
        assert_eq!(dec("1200").to_string(), "12E2");
        assert_eq!(dec("1.25").to_string_with(','), "1,25");
    }

    #[test]
    fn rejects_garbage() {
        assert!(BigDecimal::parse("1.2.3", '.').is_err());
        assert!(BigDecimal::parse("", '.').is_err());
        assert!(BigDecimal::parse("abc", '.').is_err());
    }

    #[test]
    fn exponents_stay_in_range() {
        let limit = i64::from(MAX_EXPONENT);
        assert_eq!(BigDecimal::checked_new(1, limit + 1), None);
        assert_eq!(BigDecimal::checked_new(1, -limit - 1), None);
        assert_eq!(BigDecimal::checked_new(1000, limit - 3), Some(BigDecimal::new(1, MAX_EXPONENT)));
        assert_eq!(BigDecimal::checked_new(10, i64::MAX), None);

        let big = BigDecimal::new(1, 60_000);
        assert_eq!(big.checked_mul(&big), None);
        assert_eq!(big.checked_add(&big), Some(BigDecimal::new(2, 60_000)));
        assert!(big.checked_div(&BigDecimal::new(1, -60_000)).is_none());
        assert!(BigDecimal::new(1, -60_000).checked_sub(&big).is_some());
    }

    #[test]
    fn parse_rejects_oversized_exponents() {
        assert!(BigDecimal::parse("10E2147483647", '.').is_err());
        assert!(BigDecimal::parse("1E2000000000", '.').is_err());
        assert!(BigDecimal::parse("1E99999999999", '.').is_err());
        assert_eq!(BigDecimal::parse("0E2000000000", '.'), Ok(BigDecimal::zero()));
        assert_eq!(BigDecimal::parse("1000E99997", '.'), Ok(BigDecimal::new(1, MAX_EXPONENT)));
    }

    #[test]
    #[should_panic(expected = "decimal exponent out of range")]
    fn overflowing_product_panics() {
        let big = BigDecimal::new(1, 60_000);
        let _ = &big * &big;
    }

    #[test]
    fn large_exponents_convert_quickly() {
        assert_eq!(BigDecimal::new(1, MAX_EXPONENT).to_i64(), None);
        assert_eq!(BigDecimal::new(1, -MAX_EXPONENT).to_i64(), Some(0));
        assert_eq!(BigDecimal::new(-15, -1).to_i64(), Some(-1));
        assert_eq!(BigDecimal::new(1, MAX_EXPONENT).to_decimal(), None);
        assert_eq!(BigDecimal::new(1, 18).to_i64(), Some(1_000_000_000_000_000_000));
    }

    #[test]
    fn converts_to_and_from_native_types() {
        assert_eq!(BigDecimal::from_f64(0.1), Some(dec("0.1")));
        assert_eq!(BigDecimal::from_f64(f64::NAN), None);
        assert!((dec("2.75").to_f64() - 2.75).abs() < f64::EPSILON);
        assert_eq!(dec("-9.9").to_i64(), Some(-9));
        assert_eq!(dec("3.25").to_decimal(), Some(Decimal::new(325, 2)));
        assert_eq!(BigDecimal::from(Decimal::new(-125, 1)), dec("-12.5"));
    }
}
