use std::f64::consts::PI;

use crate::{
    ast::{
        BinaryOperator, BuiltinFunction, Constant, Function, FunctionNode, IndexedFunction,
        IndexedNode, OperatorNode, Position,
    },
    error::EvalError,
    interpreter::{
        evaluator::{
            compile::CompilingEvaluator,
            core::{EvalResult, EvaluationOptions, Evaluator, assigned, check_arity, condition_args},
        },
        format::SeparatorStyle,
        symbols::Environment,
    },
    util::num::{bitwise, factorial, from_bool, i64_to_f64, sign, to_bool, truncate_to_i64},
};

/// Evaluates a tree to an `f64`.
///
/// NaN is a regular result here: dividing by zero, taking the factorial of
/// a fraction and similar operations produce it instead of failing.
///
/// # Example
/// ```
/// use exprcalc::{
///     EvaluationOptions, Evaluator, Parser, interpreter::evaluator::double::DoubleEvaluator,
/// };
///
/// let parser = Parser::new();
/// let tree = parser.parse("2^3^2").unwrap();
/// let evaluator = DoubleEvaluator::new(parser.environment(), EvaluationOptions::default());
/// assert_eq!(evaluator.eval(tree.tree()).unwrap(), 512.0);
/// ```
#[derive(Debug, Clone)]
pub struct DoubleEvaluator {
    environment: Environment,
    options:     EvaluationOptions,
}

impl Evaluator for DoubleEvaluator {
    type Output = f64;

    fn new(environment: Environment, options: EvaluationOptions) -> Self {
        Self { environment,
               options }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<f64> {
        let left = self.eval(&node.left)?;
        match node.op {
            BinaryOperator::And if !to_bool(left) => Ok(0.0),
            BinaryOperator::Or if to_bool(left) => Ok(1.0),
            op => Ok(binary(op, left, self.eval(&node.right)?, self.options.epsilon)),
        }
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<f64> {
        match &node.function {
            Function::Builtin(BuiltinFunction::If) => {
                let (condition, then, otherwise) = condition_args(node)?;
                if to_bool(self.eval(condition)?) { self.eval(then) } else { self.eval(otherwise) }
            },
            Function::Builtin(function) => Ok(builtin(*function, &self.eval_all(&node.args)?)),
            Function::User(name) => {
                let (arity, body) = self.environment.function(name).ok_or_else(|| {
                                        EvalError::UnknownFunction { name:     name.clone(),
                                                                     position: node.position, }
                                    })?;
                check_arity(arity, node.args.len())?;
                Ok(body(&self.eval_all(&node.args)?))
            },
        }
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<f64> {
        let start = self.eval(&node.start)?;
        let end = self.eval(&node.end)?;
        let body = CompilingEvaluator::new(self.environment.clone(), self.options)
            .with_parameters(vec![node.variable.clone()])
            .eval(&node.body)?;
        Ok(accumulate(node.function, start, end, |i| body(&[i])))
    }

    fn eval_number(&self, text: &str, position: Position) -> EvalResult<f64> {
        parse_literal(text, position)
    }

    fn eval_variable(&self, name: &str, position: Position) -> EvalResult<f64> {
        assigned(&self.environment, name, position, |value| value.as_real())
    }

    fn eval_constant(&self, constant: Constant, _position: Position) -> EvalResult<f64> {
        Ok(constant.value())
    }
}

/// Applies a binary operator to two doubles.
///
/// Comparisons treat values closer than `epsilon` as equal. Bitwise
/// operators truncate both operands to 64-bit integers.
///
/// # Example
/// ```
/// use exprcalc::{ast::BinaryOperator, interpreter::evaluator::double::binary};
///
/// assert!(binary(BinaryOperator::Div, 1.0, 0.0, 1e-15).is_nan());
/// assert_eq!(binary(BinaryOperator::Equal, 0.1 + 0.2, 0.3, 1e-15), 1.0);
/// assert_eq!(binary(BinaryOperator::BitAnd, 6.0, 11.0, 1e-15), 2.0);
/// ```
#[must_use]
pub fn binary(op: BinaryOperator, left: f64, right: f64, epsilon: f64) -> f64 {
    match op {
        BinaryOperator::Add => left + right,
        BinaryOperator::Sub => left - right,
        BinaryOperator::Mul => left * right,
        BinaryOperator::Div if right == 0.0 => f64::NAN,
        BinaryOperator::Div => left / right,
        BinaryOperator::Pow => left.powf(right),
        BinaryOperator::Mod => left % right,
        BinaryOperator::Equal => from_bool((left - right).abs() <= epsilon),
        BinaryOperator::NotEqual => from_bool((left - right).abs() > epsilon),
        BinaryOperator::Less => from_bool(left < right - epsilon),
        BinaryOperator::Greater => from_bool(left > right + epsilon),
        BinaryOperator::LessEqual => from_bool(left <= right + epsilon),
        BinaryOperator::GreaterEqual => from_bool(left >= right - epsilon),
        BinaryOperator::And => from_bool(to_bool(left) && to_bool(right)),
        BinaryOperator::Or => from_bool(to_bool(left) || to_bool(right)),
        BinaryOperator::BitAnd
        | BinaryOperator::BitOr
        | BinaryOperator::BitXor
        | BinaryOperator::Shl
        | BinaryOperator::Shr
        | BinaryOperator::UShr => {
            bitwise(op, truncate_to_i64(left), truncate_to_i64(right)).map_or(f64::NAN, i64_to_f64)
        },
    }
}

/// Applies a built-in function to already evaluated arguments.
///
/// `if` is handled here eagerly; evaluators that can skip the unused branch
/// do so before calling this.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn builtin(function: BuiltinFunction, args: &[f64]) -> f64 {
    let x = args.first().copied().unwrap_or(f64::NAN);
    match function {
        BuiltinFunction::Negate => -x,
        BuiltinFunction::Sqrt => x.sqrt(),
        BuiltinFunction::Cbrt => x.cbrt(),
        BuiltinFunction::Exp => x.exp(),
        BuiltinFunction::Sin => x.sin(),
        BuiltinFunction::Cos => x.cos(),
        BuiltinFunction::Tan => x.tan(),
        BuiltinFunction::Abs => x.abs(),
        BuiltinFunction::Lg => x.log10(),
        BuiltinFunction::Ln => x.ln(),
        BuiltinFunction::Asin => x.asin(),
        BuiltinFunction::Acos => x.acos(),
        BuiltinFunction::Atan => x.atan(),
        BuiltinFunction::Sinh => x.sinh(),
        BuiltinFunction::Cosh => x.cosh(),
        BuiltinFunction::Tanh => x.tanh(),
        BuiltinFunction::Rad => x * PI / 180.0,
        BuiltinFunction::Deg => x * 180.0 / PI,
        BuiltinFunction::Ceil => x.ceil(),
        BuiltinFunction::Floor => x.floor(),
        BuiltinFunction::Round => x.round_ties_even(),
        BuiltinFunction::Sign => sign(x),
        BuiltinFunction::Trunc => x.trunc(),
        BuiltinFunction::Not => from_bool(!to_bool(x)),
        BuiltinFunction::Fact => factorial(x),
        BuiltinFunction::Log => match args {
            [base, value] => value.log(*base),
            _ => f64::NAN,
        },
        BuiltinFunction::If => match args {
            [condition, then, otherwise] => if to_bool(*condition) { *then } else { *otherwise },
            _ => f64::NAN,
        },
        BuiltinFunction::Min => fold_nan(args, f64::min),
        BuiltinFunction::Max => fold_nan(args, f64::max),
        BuiltinFunction::Avg if args.is_empty() => f64::NAN,
        BuiltinFunction::Avg => args.iter().sum::<f64>() / args.len() as f64,
        BuiltinFunction::And => from_bool(args.iter().all(|v| to_bool(*v))),
        BuiltinFunction::Or => from_bool(args.iter().any(|v| to_bool(*v))),
        BuiltinFunction::Xor => from_bool(args.iter().fold(false, |acc, v| acc ^ to_bool(*v))),
    }
}

/// Folds with `f`, returning NaN if any argument is NaN.
fn fold_nan(args: &[f64], f: fn(f64, f64) -> f64) -> f64 {
    if args.is_empty() || args.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    args.iter().copied().reduce(f).unwrap_or(f64::NAN)
}

/// Sums or multiplies `term(i)` for `i = start, start + 1, ...` while
/// `i <= end`.
///
/// Stops early once the counter no longer changes when incremented.
pub(crate) fn accumulate(function: IndexedFunction,
                         start: f64,
                         end: f64,
                         mut term: impl FnMut(f64) -> f64)
                         -> f64 {
    let mut result = function.identity();
    let mut i = start;
    while i <= end {
        let value = term(i);
        result = match function {
            IndexedFunction::Sum => result + value,
            IndexedFunction::Prod => result * value,
        };
        let next = i + 1.0;
        if next == i {
            break;
        }
        i = next;
    }
    result
}

/// Reads a number literal as stored in the tree, with `.` as decimal point.
pub(crate) fn parse_literal(text: &str, position: Position) -> EvalResult<f64> {
    SeparatorStyle::Dot.parse_f64(text)
                       .ok_or_else(|| EvalError::InvalidNumber { text: text.to_string(),
                                                                 position })
}
