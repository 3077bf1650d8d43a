use crate::{
    ast::{Constant, FunctionNode, IndexedNode, Node, OperatorNode, Position},
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{EvalResult, EvaluationOptions, Evaluator},
            double::DoubleEvaluator,
        },
        symbols::Environment,
    },
};

/// Evaluates a tree in floating point and reads the result as a boolean.
///
/// The result must lie within epsilon of 1 or 0.
#[derive(Debug, Clone)]
pub struct BooleanEvaluator {
    double:  DoubleEvaluator,
    epsilon: f64,
}

impl BooleanEvaluator {
    fn convert(&self, value: f64) -> EvalResult<bool> {
        if (value - 1.0).abs() <= self.epsilon {
            Ok(true)
        } else if value.abs() <= self.epsilon {
            Ok(false)
        } else {
            Err(EvalError::NotBoolean { value })
        }
    }
}

impl Evaluator for BooleanEvaluator {
    type Output = bool;

    fn new(environment: Environment, options: EvaluationOptions) -> Self {
        Self { double:  DoubleEvaluator::new(environment, options),
               epsilon: options.epsilon, }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<bool> {
        self.convert(self.double.eval_operator(node)?)
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<bool> {
        self.convert(self.double.eval_function(node)?)
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<bool> {
        self.convert(self.double.eval_indexed(node)?)
    }

    fn eval_number(&self, text: &str, position: Position) -> EvalResult<bool> {
        self.convert(self.double.eval_number(text, position)?)
    }

    fn eval_variable(&self, name: &str, position: Position) -> EvalResult<bool> {
        self.convert(self.double.eval_variable(name, position)?)
    }

    fn eval_constant(&self, constant: Constant, position: Position) -> EvalResult<bool> {
        self.convert(self.double.eval_constant(constant, position)?)
    }

    /// Evaluates the whole tree in floating point before converting, so only
    /// the final result has to be boolean.
    fn eval(&self, node: &Node) -> EvalResult<bool> {
        self.convert(self.double.eval(node)?)
    }
}
