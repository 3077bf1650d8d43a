use crate::{
    ast::{Arity, Constant, FunctionNode, IndexedNode, Node, OperatorNode, Position},
    error::EvalError,
    interpreter::{symbols::Environment, value::Value},
};

/// Result type used by the evaluators.
///
/// All evaluation functions return either a value of type `T` or an
/// `EvalError` describing the failure.
pub type EvalResult<T> = Result<T, EvalError>;

/// Default absolute tolerance for floating point comparisons.
pub const DEFAULT_EPSILON: f64 = 1e-15;

/// Settings that change how a tree is evaluated.
///
/// # Example
/// ```
/// use exprcalc::EvaluationOptions;
///
/// let options = EvaluationOptions::default().with_strict_mode(true).with_epsilon(1e-9);
/// assert!(options.strict_mode);
/// assert_eq!(options.epsilon, 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    /// Fail on operations a strategy cannot perform natively instead of
    /// falling back to floating point.
    pub strict_mode: bool,
    /// Absolute difference below which two doubles compare equal.
    pub epsilon:     f64,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self { strict_mode: false,
               epsilon:     DEFAULT_EPSILON, }
    }
}

impl EvaluationOptions {
    /// Sets strict mode.
    #[must_use]
    pub const fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    /// Sets the comparison tolerance.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// A strategy for walking a tree.
///
/// Each strategy implements one operation per node kind; [`Evaluator::eval`]
/// dispatches on the node and recurses through the operations. Strategies
/// read variables through the [`Environment`] at the time of the call, so a
/// tree can be evaluated again after variables change.
pub trait Evaluator: Sized {
    /// What evaluating a tree produces.
    type Output;

    /// Creates the strategy over a parser's environment.
    fn new(environment: Environment, options: EvaluationOptions) -> Self;

    /// Evaluates a binary operation or sign.
    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<Self::Output>;

    /// Evaluates a function call.
    fn eval_function(&self, node: &FunctionNode) -> EvalResult<Self::Output>;

    /// Evaluates a summation or product.
    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<Self::Output>;

    /// Evaluates a number literal.
    fn eval_number(&self, text: &str, position: Position) -> EvalResult<Self::Output>;

    /// Evaluates a variable reference.
    fn eval_variable(&self, name: &str, position: Position) -> EvalResult<Self::Output>;

    /// Evaluates a constant.
    fn eval_constant(&self, constant: Constant, position: Position) -> EvalResult<Self::Output>;

    /// Evaluates a tree.
    fn eval(&self, node: &Node) -> EvalResult<Self::Output> {
        match node {
            Node::Number { text, position } => self.eval_number(text, *position),
            Node::Variable { name, position } => self.eval_variable(name, *position),
            Node::Constant { constant, position } => self.eval_constant(*constant, *position),
            Node::Operator(node) => self.eval_operator(node),
            Node::Function(node) => self.eval_function(node),
            Node::Indexed(node) => self.eval_indexed(node),
        }
    }

    /// Evaluates several trees, stopping at the first error.
    fn eval_all(&self, nodes: &[Node]) -> EvalResult<Vec<Self::Output>> {
        nodes.iter().map(|node| self.eval(node)).collect()
    }
}

/// Reads the three arguments of `if`.
pub(crate) fn condition_args(node: &FunctionNode) -> EvalResult<(&Node, &Node, &Node)> {
    match node.args.as_slice() {
        [condition, then, otherwise] => Ok((condition, then, otherwise)),
        args => Err(EvalError::ArgumentCount { expected: 3,
                                               found:    args.len(), }),
    }
}

/// Looks up a variable, failing if it has no value.
pub(crate) fn assigned<T>(environment: &Environment,
                          name: &str,
                          position: Position,
                          read: impl FnOnce(&Value) -> T)
                          -> EvalResult<T> {
    environment.variable(name)
               .map(|value| read(&value))
               .ok_or_else(|| EvalError::UnassignedVariable { name: name.to_string(),
                                                              position })
}

/// Checks that a user function accepts the number of arguments it is called
/// with. The function may have been redefined since the call was parsed.
pub(crate) fn check_arity(arity: Arity, found: usize) -> EvalResult<()> {
    if arity.accepts(found) {
        return Ok(());
    }
    let expected = match arity {
        Arity::Exact(n) => n,
        Arity::Variadic => 1,
    };
    Err(EvalError::ArgumentCount { expected, found })
}
