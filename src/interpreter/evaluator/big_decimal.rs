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
            decimal::{euler, pi},
            double::DoubleEvaluator,
        },
        symbols::Environment,
        value::Value,
    },
    numeric::big_decimal::BigDecimal,
    util::num::bitwise,
};

/// Largest argument `fact` computes exactly.
pub const MAX_EXACT_FACTORIAL: i64 = 10_000;

fn from_bool(value: bool) -> BigDecimal {
    if value { BigDecimal::one() } else { BigDecimal::zero() }
}

fn to_bool(value: &BigDecimal) -> bool {
    !value.is_zero()
}

/// Evaluates a tree to an arbitrary-precision [`BigDecimal`].
///
/// Addition, subtraction and multiplication are exact; division keeps the
/// number of significant digits set by
/// [`set_precision`](crate::numeric::big_decimal::set_precision).
/// Results whose exponent leaves the supported range fail with
/// [`EvalError::Arithmetic`]. Operations without a native implementation fall
/// back to floating point unless strict mode is on.
///
/// # Example
/// ```
/// use exprcalc::{BigDecimal, Parser};
///
/// let parser = Parser::new();
/// let value = parser.parse("0.1 + 0.2").unwrap().evaluate_big_decimal().unwrap();
/// assert_eq!(value, "0.3".parse::<BigDecimal>().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct BigDecimalEvaluator {
    environment: Environment,
    options:     EvaluationOptions,
    fallback:    DoubleEvaluator,
}

impl BigDecimalEvaluator {
    /// Evaluates an operation in floating point and converts the result.
    fn fall_back(&self,
                 name: &str,
                 position: Position,
                 eval: impl FnOnce(&DoubleEvaluator) -> EvalResult<f64>)
                 -> EvalResult<BigDecimal> {
        if self.options.strict_mode {
            return Err(EvalError::Unsupported { name: name.to_string(),
                                                position });
        }
        debug!(operation = name, position, "falling back to floating point");
        let value = eval(&self.fallback)?;
        BigDecimal::from_f64(value).ok_or(EvalError::Arithmetic { position })
    }

    fn to_integer(value: &BigDecimal, position: Position) -> EvalResult<i64> {
        value.to_i64().ok_or(EvalError::Arithmetic { position })
    }

    fn factorial(value: &BigDecimal, position: Position) -> EvalResult<BigDecimal> {
        if value.is_negative() || !value.is_integer() {
            return Err(EvalError::Arithmetic { position });
        }
        let n = Self::to_integer(value, position)?;
        if n > MAX_EXACT_FACTORIAL {
            return Err(EvalError::Arithmetic { position });
        }
        Ok((2..=n).fold(BigDecimal::one(), |acc, i| acc * BigDecimal::from(i)))
    }

    fn unary(&self, function: BuiltinFunction, node: &FunctionNode) -> EvalResult<BigDecimal> {
        let position = node.position;
        let [arg] = node.args.as_slice() else {
            return Err(EvalError::ArgumentCount { expected: 1,
                                                  found:    node.args.len(), });
        };
        let x = self.eval(arg)?;
        let degrees = BigDecimal::from(180);
        let invalid = || EvalError::Arithmetic { position };
        Ok(match function {
            BuiltinFunction::Negate => -x,
            BuiltinFunction::Rad => x.checked_mul(&BigDecimal::from(pi()))
                                     .and_then(|x| x.checked_div(&degrees))
                                     .ok_or_else(invalid)?,
            BuiltinFunction::Deg => x.checked_mul(&degrees)
                                     .and_then(|x| x.checked_div(&BigDecimal::from(pi())))
                                     .ok_or_else(invalid)?,
            BuiltinFunction::Floor => x.floor(),
            BuiltinFunction::Not => from_bool(!to_bool(&x)),
            BuiltinFunction::Fact => Self::factorial(&x, position)?,
            _ => {
                return Err(EvalError::Unsupported { name: function.symbol().to_string(),
                                                    position })
            },
        })
    }
}

impl Evaluator for BigDecimalEvaluator {
    type Output = BigDecimal;

    fn new(environment: Environment, options: EvaluationOptions) -> Self {
        Self { fallback: DoubleEvaluator::new(environment.clone(), options),
               environment,
               options }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<BigDecimal> {
        let position = node.position;
        let invalid = || EvalError::Arithmetic { position };
        if matches!(node.op, BinaryOperator::Pow | BinaryOperator::UShr) {
            return self.fall_back(node.op.symbol(), position, |d| d.eval_operator(node));
        }

        let left = self.eval(&node.left)?;
        match node.op {
            BinaryOperator::And if !to_bool(&left) => return Ok(BigDecimal::zero()),
            BinaryOperator::Or if to_bool(&left) => return Ok(BigDecimal::one()),
            _ => {},
        }
        let right = self.eval(&node.right)?;

        Ok(match node.op {
            BinaryOperator::Add => left.checked_add(&right).ok_or_else(invalid)?,
            BinaryOperator::Sub => left.checked_sub(&right).ok_or_else(invalid)?,
            BinaryOperator::Mul => left.checked_mul(&right).ok_or_else(invalid)?,
            BinaryOperator::Div => left.checked_div(&right).ok_or_else(invalid)?,
            BinaryOperator::Mod => left.checked_rem(&right).ok_or_else(invalid)?,
            BinaryOperator::Equal => from_bool(left == right),
            BinaryOperator::NotEqual => from_bool(left != right),
            BinaryOperator::Less => from_bool(left < right),
            BinaryOperator::Greater => from_bool(left > right),
            BinaryOperator::LessEqual => from_bool(left <= right),
            BinaryOperator::GreaterEqual => from_bool(left >= right),
            BinaryOperator::And | BinaryOperator::Or => from_bool(to_bool(&right)),
            op => {
                let result = bitwise(op,
                                     Self::to_integer(&left, position)?,
                                     Self::to_integer(&right, position)?).ok_or_else(invalid)?;
                BigDecimal::from(result)
            },
        })
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<BigDecimal> {
        match &node.function {
            Function::Builtin(BuiltinFunction::If) => {
                let (condition, then, otherwise) = condition_args(node)?;
                if to_bool(&self.eval(condition)?) {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            },
            Function::Builtin(function @ (BuiltinFunction::Negate
                              | BuiltinFunction::Rad
                              | BuiltinFunction::Deg
                              | BuiltinFunction::Floor
                              | BuiltinFunction::Not
                              | BuiltinFunction::Fact)) => self.unary(*function, node),
            Function::Builtin(function) => {
                self.fall_back(function.symbol(), node.position, |d| d.eval_function(node))
            },
            Function::User(name) => self.fall_back(name, node.position, |d| d.eval_function(node)),
        }
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<BigDecimal> {
        self.fall_back(node.function.symbol(), node.position, |d| d.eval_indexed(node))
    }

    fn eval_number(&self, text: &str, position: Position) -> EvalResult<BigDecimal> {
        BigDecimal::parse(text, '.')
            .map_err(|_| EvalError::InvalidNumber { text: text.to_string(),
                                                    position })
    }

    fn eval_variable(&self, name: &str, position: Position) -> EvalResult<BigDecimal> {
        assigned(&self.environment, name, position, Value::as_big_decimal)?
            .ok_or(EvalError::Arithmetic { position })
    }

    fn eval_constant(&self, constant: Constant, _position: Position) -> EvalResult<BigDecimal> {
        Ok(match constant {
            Constant::Pi => BigDecimal::from(pi()),
            Constant::E => BigDecimal::from(euler()),
            Constant::True => BigDecimal::one(),
            Constant::False => BigDecimal::zero(),
        })
    }
}
