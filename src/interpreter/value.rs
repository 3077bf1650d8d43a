use std::fmt;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::{numeric::big_decimal::BigDecimal, util::num::i64_to_f64};

/// A value bound to a variable.
///
/// Variables keep whatever representation they were assigned; each
/// evaluation strategy reads the value in its own numeric type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit integer.
    Integer(i64),
    /// A double precision floating point number.
    Real(f64),
    /// A boolean, read as 1 or 0.
    Bool(bool),
    /// A fixed precision decimal.
    Decimal(Decimal),
    /// An arbitrary-precision decimal.
    BigDecimal(BigDecimal),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Self::BigDecimal(v)
    }
}

impl Value {
    /// Reads the value as a double.
    ///
    /// # Example
    /// ```
    /// use exprcalc::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_real(), 1.0);
    /// assert_eq!(Value::Integer(-3).as_real(), -3.0);
    /// ```
    #[must_use]
    pub fn as_real(&self) -> f64 {
        match self {
            Self::Integer(v) => i64_to_f64(*v),
            Self::Real(v) => *v,
            Self::Bool(v) => f64::from(u8::from(*v)),
            Self::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
            Self::BigDecimal(v) => v.to_f64(),
        }
    }

    /// Reads the value as a fixed precision decimal.
    ///
    /// # Returns
    /// `None` if the value is not finite or does not fit.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(v) => Some(Decimal::from(*v)),
            Self::Real(v) => Decimal::from_f64(*v),
            Self::Bool(v) => Some(if *v { Decimal::ONE } else { Decimal::ZERO }),
            Self::Decimal(v) => Some(*v),
            Self::BigDecimal(v) => v.to_decimal(),
        }
    }

    /// Reads the value as an arbitrary-precision decimal.
    ///
    /// # Returns
    /// `None` for NaN and infinities.
    #[must_use]
    pub fn as_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Integer(v) => Some(BigDecimal::from(*v)),
            Self::Real(v) => BigDecimal::from_f64(*v),
            Self::Bool(v) => Some(BigDecimal::from(i64::from(*v))),
            Self::Decimal(v) => Some(BigDecimal::from(*v)),
            Self::BigDecimal(v) => Some(v.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::BigDecimal(v) => write!(f, "{v}"),
        }
    }
}
