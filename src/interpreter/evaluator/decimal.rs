use std::str::FromStr;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, Signed, ToPrimitive},
};
use tracing::debug;

use crate::{
    ast::{
        BinaryOperator, BuiltinFunction, Constant, Function, FunctionNode, IndexedNode,
        OperatorNode, Position,
    },
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{EvalResult, EvaluationOptions, Evaluator, assigned, condition_args},
            double::DoubleEvaluator,
        },
        symbols::Environment,
        value::Value,
    },
    util::num::bitwise,
};

/// Pi to the 28 decimal places a `Decimal` holds.
pub(crate) fn pi() -> Decimal {
    Decimal::from_i128_with_scale(31_415_926_535_897_932_384_626_433_833, 28)
}

/// Euler's number to the 28 decimal places a `Decimal` holds.
pub(crate) fn euler() -> Decimal {
    Decimal::from_i128_with_scale(27_182_818_284_590_452_353_602_874_713, 28)
}

const fn from_bool(value: bool) -> Decimal {
    if value { Decimal::ONE } else { Decimal::ZERO }
}

fn to_bool(value: Decimal) -> bool {
    !value.is_zero()
}

/// Parses a number literal written with `separator` as decimal point.
///
/// # Returns
/// `None` if the literal does not fit a `Decimal`.
///
/// # Example
/// ```
/// use exprcalc::{Decimal, interpreter::evaluator::decimal::parse_decimal};
///
/// assert_eq!(parse_decimal("1,25E2", ','), Some(Decimal::from(125)));
/// assert_eq!(parse_decimal(".5", '.'), Some(Decimal::new(5, 1)));
/// assert_eq!(parse_decimal("1E40", '.'), None);
/// ```
#[must_use]
pub fn parse_decimal(text: &str, separator: char) -> Option<Decimal> {
    let normalized: String = text.chars()
                                 .filter(|c| *c != ' ')
                                 .map(|c| if c == separator { '.' } else { c })
                                 .collect();
    let (mantissa, exponent) = match normalized.split_once('E') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().ok()?),
        None => (normalized.as_str(), 0),
    };
    let mut value = if mantissa.starts_with('.') {
        Decimal::from_str(&format!("0{mantissa}")).ok()?
    } else {
        Decimal::from_str(mantissa).ok()?
    };

    for _ in 0..exponent.unsigned_abs() {
        if value.is_zero() {
            break;
        }
        value = if exponent > 0 {
            value.checked_mul(Decimal::TEN)?
        } else {
            value.checked_div(Decimal::TEN)?
        };
    }
    Some(value)
}

/// Evaluates a tree to a fixed precision `Decimal`.
///
/// Arithmetic, comparisons, bitwise operators and the non-transcendental
/// functions run natively. Everything else is evaluated in floating point and
/// converted back, unless strict mode is on.
///
/// # Example
/// ```
/// use exprcalc::{Decimal, Parser};
///
/// let parser = Parser::new();
/// let sum = parser.parse("0.1 + 0.2").unwrap().evaluate_decimal().unwrap();
/// assert_eq!(sum, Decimal::new(3, 1));
/// ```
#[derive(Debug, Clone)]
pub struct DecimalEvaluator {
    environment: Environment,
    options:     EvaluationOptions,
    fallback:    DoubleEvaluator,
}

impl DecimalEvaluator {
    /// Evaluates an operation in floating point and converts the result.
    fn fall_back(&self,
                 name: &str,
                 position: Position,
                 eval: impl FnOnce(&DoubleEvaluator) -> EvalResult<f64>)
                 -> EvalResult<Decimal> {
        if self.options.strict_mode {
            return Err(EvalError::Unsupported { name: name.to_string(),
                                                position });
        }
        debug!(operation = name, position, "falling back to floating point");
        let value = eval(&self.fallback)?;
        Decimal::from_f64(value).ok_or(EvalError::Arithmetic { position })
    }

    fn to_integer(value: Decimal, position: Position) -> EvalResult<i64> {
        value.trunc().to_i64().ok_or(EvalError::Arithmetic { position })
    }

    /// Functions computed without leaving `Decimal`.
    const fn is_native(function: BuiltinFunction) -> bool {
        matches!(function,
                 BuiltinFunction::Negate
                 | BuiltinFunction::Rad
                 | BuiltinFunction::Deg
                 | BuiltinFunction::Ceil
                 | BuiltinFunction::Floor
                 | BuiltinFunction::Round
                 | BuiltinFunction::Sign
                 | BuiltinFunction::Trunc
                 | BuiltinFunction::Not
                 | BuiltinFunction::Min
                 | BuiltinFunction::Max
                 | BuiltinFunction::Avg
                 | BuiltinFunction::And
                 | BuiltinFunction::Or
                 | BuiltinFunction::Xor
                 | BuiltinFunction::Fact)
    }

    fn function(&self, function: BuiltinFunction, node: &FunctionNode) -> EvalResult<Decimal> {
        let position = node.position;
        if !Self::is_native(function) {
            return self.fall_back(function.symbol(), position, |d| d.eval_function(node));
        }
        let overflow = || EvalError::Arithmetic { position };
        let args = self.eval_all(&node.args)?;
        let x = args.first().copied().ok_or_else(overflow)?;
        let value = match function {
            BuiltinFunction::Negate => -x,
            BuiltinFunction::Rad => x.checked_mul(pi())
                                     .and_then(|v| v.checked_div(Decimal::from(180)))
                                     .ok_or_else(overflow)?,
            BuiltinFunction::Deg => x.checked_mul(Decimal::from(180))
                                     .and_then(|v| v.checked_div(pi()))
                                     .ok_or_else(overflow)?,
            BuiltinFunction::Ceil => x.ceil(),
            BuiltinFunction::Floor => x.floor(),
            BuiltinFunction::Round => x.round(),
            BuiltinFunction::Sign => x.signum(),
            BuiltinFunction::Trunc => x.trunc(),
            BuiltinFunction::Not => from_bool(!to_bool(x)),
            BuiltinFunction::Min => args.iter().copied().min().ok_or_else(overflow)?,
            BuiltinFunction::Max => args.iter().copied().max().ok_or_else(overflow)?,
            BuiltinFunction::Avg => {
                let count = Decimal::from(args.len());
                args.iter()
                    .try_fold(Decimal::ZERO, |sum, v| sum.checked_add(*v))
                    .and_then(|sum| sum.checked_div(count))
                    .ok_or_else(overflow)?
            },
            BuiltinFunction::And => from_bool(args.iter().all(|v| to_bool(*v))),
            BuiltinFunction::Or => from_bool(args.iter().any(|v| to_bool(*v))),
            BuiltinFunction::Xor => from_bool(args.iter().fold(false, |acc, v| acc ^ to_bool(*v))),
            BuiltinFunction::Fact => {
                if x.is_sign_negative() || !x.fract().is_zero() {
                    return Err(overflow());
                }
                let n = x.to_u64().ok_or_else(overflow)?;
                (2..=n).try_fold(Decimal::ONE, |acc, i| acc.checked_mul(Decimal::from(i)))
                       .ok_or_else(overflow)?
            },
            _ => {
                return Err(EvalError::Unsupported { name: function.symbol().to_string(),
                                                    position });
            },
        };
        Ok(value)
    }
}

impl Evaluator for DecimalEvaluator {
    type Output = Decimal;

    fn new(environment: Environment, options: EvaluationOptions) -> Self {
        Self { fallback: DoubleEvaluator::new(environment.clone(), options),
               environment,
               options }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<Decimal> {
        let position = node.position;
        let invalid = || EvalError::Arithmetic { position };
        if node.op == BinaryOperator::Pow {
            return self.fall_back(node.op.symbol(), position, |d| d.eval_operator(node));
        }

        let left = self.eval(&node.left)?;
        match node.op {
            BinaryOperator::And if !to_bool(left) => return Ok(Decimal::ZERO),
            BinaryOperator::Or if to_bool(left) => return Ok(Decimal::ONE),
            _ => {},
        }
        let right = self.eval(&node.right)?;

        let value = match node.op {
            BinaryOperator::Add => left.checked_add(right).ok_or_else(invalid)?,
            BinaryOperator::Sub => left.checked_sub(right).ok_or_else(invalid)?,
            BinaryOperator::Mul => left.checked_mul(right).ok_or_else(invalid)?,
            BinaryOperator::Div => left.checked_div(right).ok_or_else(invalid)?,
            BinaryOperator::Mod => left.checked_rem(right).ok_or_else(invalid)?,
            BinaryOperator::Equal => from_bool(left == right),
            BinaryOperator::NotEqual => from_bool(left != right),
            BinaryOperator::Less => from_bool(left < right),
            BinaryOperator::Greater => from_bool(left > right),
            BinaryOperator::LessEqual => from_bool(left <= right),
            BinaryOperator::GreaterEqual => from_bool(left >= right),
            BinaryOperator::And | BinaryOperator::Or => from_bool(to_bool(right)),
            op => {
                let result = bitwise(op,
                                     Self::to_integer(left, position)?,
                                     Self::to_integer(right, position)?).ok_or_else(invalid)?;
                Decimal::from(result)
            },
        };
        Ok(value)
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<Decimal> {
        match &node.function {
            Function::Builtin(BuiltinFunction::If) => {
                let (condition, then, otherwise) = condition_args(node)?;
                if to_bool(self.eval(condition)?) { self.eval(then) } else { self.eval(otherwise) }
            },
            Function::Builtin(function) => self.function(*function, node),
            Function::User(name) => self.fall_back(name, node.position, |d| d.eval_function(node)),
        }
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<Decimal> {
        self.fall_back(node.function.symbol(), node.position, |d| d.eval_indexed(node))
    }

    fn eval_number(&self, text: &str, position: Position) -> EvalResult<Decimal> {
        parse_decimal(text, '.').ok_or_else(|| EvalError::InvalidNumber { text: text.to_string(),
                                                                          position })
    }

    fn eval_variable(&self, name: &str, position: Position) -> EvalResult<Decimal> {
        assigned(&self.environment, name, position, Value::as_decimal)?
            .ok_or(EvalError::Arithmetic { position })
    }

    fn eval_constant(&self, constant: Constant, _position: Position) -> EvalResult<Decimal> {
        Ok(match constant {
            Constant::Pi => pi(),
            Constant::E => euler(),
            Constant::True => Decimal::ONE,
            Constant::False => Decimal::ZERO,
        })
    }
}
