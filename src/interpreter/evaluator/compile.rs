use std::{fmt, rc::Rc};

use crate::{
    ast::{
        BinaryOperator, BuiltinFunction, Constant, Function, FunctionNode, IndexedNode,
        OperatorNode, Position,
    },
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{EvalResult, EvaluationOptions, Evaluator, assigned, check_arity, condition_args},
            double::{accumulate, binary, builtin, parse_literal},
        },
        symbols::{Environment, MathFn},
    },
    util::num::{from_bool, to_bool},
};

/// A compiled tree: a closure from parameter values to the result.
pub type Compiled = MathFn;

/// Compiles a tree into a closure over a list of named parameters.
///
/// Parameters are read from the argument slice by position. Every other
/// variable is looked up once, while compiling, and its value is baked into
/// the closure. Calling the closure never walks the tree again.
///
/// # Example
/// ```
/// use exprcalc::{
///     EvaluationOptions, Evaluator, Parser, interpreter::evaluator::compile::CompilingEvaluator,
/// };
///
/// let parser = Parser::with_variables(&["x"]).unwrap();
/// let tree = parser.parse("x^2 + 1").unwrap();
/// let square = CompilingEvaluator::new(parser.environment(), EvaluationOptions::default())
///     .with_parameters(vec!["x".to_string()])
///     .eval(tree.tree())
///     .unwrap();
/// assert_eq!(square(&[3.0]), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct CompilingEvaluator {
    environment: Environment,
    options:     EvaluationOptions,
    parameters:  Vec<String>,
}

impl CompilingEvaluator {
    /// Declares the parameters of the closure, in argument order.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    fn constant(value: f64) -> Compiled {
        Rc::new(move |_| value)
    }
}

impl Evaluator for CompilingEvaluator {
    type Output = Compiled;

    fn new(environment: Environment, options: EvaluationOptions) -> Self {
        Self { environment,
               options,
               parameters: Vec::new() }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<Compiled> {
        let left = self.eval(&node.left)?;
        let right = self.eval(&node.right)?;
        let epsilon = self.options.epsilon;
        Ok(match node.op {
            BinaryOperator::And => {
                Rc::new(move |args| from_bool(to_bool(left(args)) && to_bool(right(args))))
            },
            BinaryOperator::Or => {
                Rc::new(move |args| from_bool(to_bool(left(args)) || to_bool(right(args))))
            },
            op => Rc::new(move |args| binary(op, left(args), right(args), epsilon)),
        })
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<Compiled> {
        match &node.function {
            Function::Builtin(BuiltinFunction::If) => {
                let (condition, then, otherwise) = condition_args(node)?;
                let (condition, then, otherwise) =
                    (self.eval(condition)?, self.eval(then)?, self.eval(otherwise)?);
                Ok(Rc::new(move |args| {
                    if to_bool(condition(args)) { then(args) } else { otherwise(args) }
                }))
            },
            Function::Builtin(function) => {
                let function = *function;
                let operands = self.eval_all(&node.args)?;
                Ok(Rc::new(move |args| {
                    let values: Vec<f64> = operands.iter().map(|operand| operand(args)).collect();
                    builtin(function, &values)
                }))
            },
            Function::User(name) => {
                let (arity, body) = self.environment.function(name).ok_or_else(|| {
                                        EvalError::UnknownFunction { name:     name.clone(),
                                                                     position: node.position, }
                                    })?;
                check_arity(arity, node.args.len())?;
                let operands = self.eval_all(&node.args)?;
                Ok(Rc::new(move |args| {
                    let values: Vec<f64> = operands.iter().map(|operand| operand(args)).collect();
                    body(&values)
                }))
            },
        }
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<Compiled> {
        let start = self.eval(&node.start)?;
        let end = self.eval(&node.end)?;
        let mut parameters = self.parameters.clone();
        parameters.push(node.variable.clone());
        let body = self.clone().with_parameters(parameters).eval(&node.body)?;
        let function = node.function;
        Ok(Rc::new(move |args| {
            let mut frame = args.to_vec();
            frame.push(0.0);
            accumulate(function, start(args), end(args), |i| {
                if let Some(slot) = frame.last_mut() {
                    *slot = i;
                }
                body(&frame)
            })
        }))
    }

    fn eval_number(&self, text: &str, position: Position) -> EvalResult<Compiled> {
        Ok(Self::constant(parse_literal(text, position)?))
    }

    fn eval_variable(&self, name: &str, position: Position) -> EvalResult<Compiled> {
        if let Some(slot) = self.parameters.iter().rposition(|parameter| parameter == name) {
            return Ok(Rc::new(move |args| args.get(slot).copied().unwrap_or(f64::NAN)));
        }
        let value = assigned(&self.environment, name, position, |value| value.as_real())?;
        Ok(Self::constant(value))
    }

    fn eval_constant(&self, constant: Constant, _position: Position) -> EvalResult<Compiled> {
        Ok(Self::constant(constant.value()))
    }
}

/// A tree compiled into a callable over named parameters.
#[derive(Clone)]
pub struct CompiledFunction {
    parameters: Vec<String>,
    code:       Compiled,
}

impl CompiledFunction {
    pub(crate) fn new(parameters: Vec<String>, code: Compiled) -> Self {
        Self { parameters, code }
    }

    /// The parameter names, in argument order.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Calls the function.
    ///
    /// # Errors
    /// `ArgumentCount` if `args` does not have one value per parameter.
    ///
    /// # Example
    /// ```
    /// use exprcalc::Parser;
    ///
    /// let parser = Parser::with_variables(&["a", "b"]).unwrap();
    /// let add = parser.parse("a + b").unwrap().compile(&["a", "b"]).unwrap();
    /// assert_eq!(add.call(&[2.0, 3.0]).unwrap(), 5.0);
    /// assert!(add.call(&[2.0]).is_err());
    /// ```
    pub fn call(&self, args: &[f64]) -> EvalResult<f64> {
        if args.len() != self.parameters.len() {
            return Err(EvalError::ArgumentCount { expected: self.parameters.len(),
                                                  found:    args.len(), });
        }
        Ok((self.code)(args))
    }

    /// Returns the underlying closure, without argument checking.
    #[must_use]
    pub fn into_math_fn(self) -> MathFn {
        self.code
    }
}

impl fmt::Debug for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFunction")
         .field("parameters", &self.parameters)
         .finish_non_exhaustive()
    }
}
