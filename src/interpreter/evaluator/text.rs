use crate::{
    ast::{Constant, FunctionNode, IndexedNode, Node, OperatorNode, Position},
    interpreter::{
        evaluator::core::{EvalResult, EvaluationOptions, Evaluator},
        symbols::Environment,
    },
};

/// Returns `true` if `child`, as an operand of `parent`, must be bracketed
/// to keep its place in the tree.
///
/// A child binding less tightly than its parent is always bracketed. A child
/// of equal precedence is bracketed on the side the parent does not
/// associate to: the right side of `-`, the left side of `^`.
pub(crate) fn needs_brackets(parent: &OperatorNode, child: &Node, right: bool) -> bool {
    let (outer, inner) = (parent.precedence(), child.precedence());
    inner < outer || (inner == outer && right != parent.op.is_right_associative())
}

/// Renders a tree as an infix expression with the fewest brackets that
/// reproduce it.
///
/// Parsing the output again yields the same tree, so rendering is
/// idempotent.
///
/// # Example
/// ```
/// use exprcalc::Parser;
///
/// let parser = Parser::new();
/// assert_eq!(parser.parse("(1 + 2) * 3").unwrap().expression().unwrap(), "(1+2)*3");
/// assert_eq!(parser.parse("2pi").unwrap().expression().unwrap(), "2*pi");
/// ```
#[derive(Debug, Clone)]
pub struct InfixEvaluator {
    environment: Environment,
}

impl InfixEvaluator {
    fn operand(&self, parent: &OperatorNode, child: &Node, right: bool) -> EvalResult<String> {
        let text = self.eval(child)?;
        Ok(if needs_brackets(parent, child, right) { format!("({text})") } else { text })
    }

    fn call(&self, symbol: &str, args: &[String]) -> String {
        let separator = self.environment.style().argument_separator().to_string();
        format!("{symbol}({})", args.join(&separator))
    }
}

impl Evaluator for InfixEvaluator {
    type Output = String;

    fn new(environment: Environment, _options: EvaluationOptions) -> Self {
        Self { environment }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<String> {
        if node.sign {
            let operand = self.eval(&node.right)?;
            return Ok(match *node.right {
                Node::Operator(_) => format!("-({operand})"),
                _ => format!("-{operand}"),
            });
        }
        let left = self.operand(node, &node.left, false)?;
        let right = self.operand(node, &node.right, true)?;
        Ok(format!("{left}{}{right}", node.op.symbol()))
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<String> {
        Ok(self.call(node.function.symbol(), &self.eval_all(&node.args)?))
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<String> {
        let args = [node.variable.clone(),
                    self.eval(&node.start)?,
                    self.eval(&node.end)?,
                    self.eval(&node.body)?];
        Ok(self.call(node.function.symbol(), &args))
    }

    fn eval_number(&self, text: &str, _position: Position) -> EvalResult<String> {
        Ok(self.environment.style().localized_number(text))
    }

    fn eval_variable(&self, name: &str, _position: Position) -> EvalResult<String> {
        Ok(name.to_string())
    }

    fn eval_constant(&self, constant: Constant, _position: Position) -> EvalResult<String> {
        Ok(constant.symbol().to_string())
    }
}

/// Renders a tree in postfix notation, operands first, separated by spaces.
///
/// A sign is written as a subtraction from zero, so every operator in the
/// output takes exactly two operands.
///
/// # Example
/// ```
/// use exprcalc::Parser;
///
/// let parser = Parser::new();
/// assert_eq!(parser.parse("(1 + 2) * -3").unwrap().postfix_expression().unwrap(),
///            "1 2 + 0 3 - *");
/// ```
#[derive(Debug, Clone)]
pub struct PostfixEvaluator {
    environment: Environment,
}

impl PostfixEvaluator {
    fn call(symbol: &str, mut args: Vec<String>) -> String {
        args.push(symbol.to_string());
        args.join(" ")
    }
}

impl Evaluator for PostfixEvaluator {
    type Output = String;

    fn new(environment: Environment, _options: EvaluationOptions) -> Self {
        Self { environment }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<String> {
        Ok(format!("{} {} {}",
                   self.eval(&node.left)?,
                   self.eval(&node.right)?,
                   node.op.symbol()))
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<String> {
        Ok(Self::call(node.function.symbol(), self.eval_all(&node.args)?))
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<String> {
        let args = vec![node.variable.clone(),
                        self.eval(&node.start)?,
                        self.eval(&node.end)?,
                        self.eval(&node.body)?];
        Ok(Self::call(node.function.symbol(), args))
    }

    fn eval_number(&self, text: &str, _position: Position) -> EvalResult<String> {
        Ok(self.environment.style().localized_number(text))
    }

    fn eval_variable(&self, name: &str, _position: Position) -> EvalResult<String> {
        Ok(name.to_string())
    }

    fn eval_constant(&self, constant: Constant, _position: Position) -> EvalResult<String> {
        Ok(constant.symbol().to_string())
    }
}
