use crate::{
    ast::{
        BinaryOperator, BuiltinFunction, Constant, Function, FunctionNode, IndexedFunction,
        IndexedNode, Node, OperatorNode, Position,
    },
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{EvalResult, EvaluationOptions, Evaluator},
            text::needs_brackets,
        },
        symbols::Environment,
    },
};

/// Namespace of the `<math>` root element.
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Escapes the characters XML reserves.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn bracket(content: &str) -> String {
    format!("<mo>(</mo>{content}<mo>)</mo>")
}

/// Renders a tree as presentation MathML.
///
/// The output is a fragment; [`ParserResult::mathml`](crate::ParserResult::mathml)
/// wraps it in a `<math>` element.
#[derive(Debug, Clone)]
pub struct MathMlEvaluator {
    environment: Environment,
}

impl MathMlEvaluator {
    fn operand(&self, parent: &OperatorNode, child: &Node, right: bool) -> EvalResult<String> {
        let markup = self.eval(child)?;
        Ok(if needs_brackets(parent, child, right) { bracket(&markup) } else { markup })
    }

    /// Renders a function argument, bracketed unless it is atomic.
    fn argument(&self, node: &Node) -> EvalResult<String> {
        let markup = self.eval(node)?;
        Ok(if matches!(node, Node::Operator(_)) { bracket(&markup) } else { markup })
    }

    fn single<'a>(node: &'a FunctionNode) -> EvalResult<&'a Node> {
        match node.args.as_slice() {
            [arg] => Ok(arg),
            args => Err(EvalError::ArgumentCount { expected: 1,
                                                   found:    args.len(), }),
        }
    }

    fn generic_call(&self, symbol: &str, args: &[Node]) -> EvalResult<String> {
        let separator = escape(&self.environment.style().argument_separator().to_string());
        let mut markup = format!("<mi>{}</mi><mfenced separators=\"{separator}\">", escape(symbol));
        for arg in args {
            markup.push_str(&format!("<mrow>{}</mrow>", self.eval(arg)?));
        }
        markup.push_str("</mfenced>");
        Ok(markup)
    }
}

impl Evaluator for MathMlEvaluator {
    type Output = String;

    fn new(environment: Environment, _options: EvaluationOptions) -> Self {
        Self { environment }
    }

    fn eval_operator(&self, node: &OperatorNode) -> EvalResult<String> {
        if node.sign {
            return Ok(format!("<mo>-</mo>{}", self.argument(&node.right)?));
        }
        match node.op {
            BinaryOperator::Div => {
                return Ok(format!("<mfrac><mrow>{}</mrow><mrow>{}</mrow></mfrac>",
                                  self.eval(&node.left)?,
                                  self.eval(&node.right)?));
            },
            BinaryOperator::Pow => {
                return Ok(format!("<msup><mrow>{}</mrow><mrow>{}</mrow></msup>",
                                  self.operand(node, &node.left, false)?,
                                  self.eval(&node.right)?));
            },
            _ => {},
        }
        let symbol = match node.op {
            BinaryOperator::Mul => "&sdot;".to_string(),
            BinaryOperator::Mod => "mod".to_string(),
            BinaryOperator::LessEqual => "&le;".to_string(),
            BinaryOperator::GreaterEqual => "&ge;".to_string(),
            BinaryOperator::NotEqual => "&ne;".to_string(),
            BinaryOperator::And => "&and;".to_string(),
            BinaryOperator::Or => "&or;".to_string(),
            op => escape(op.symbol()),
        };
        Ok(format!("{}<mo>{symbol}</mo>{}",
                   self.operand(node, &node.left, false)?,
                   self.operand(node, &node.right, true)?))
    }

    fn eval_function(&self, node: &FunctionNode) -> EvalResult<String> {
        let Function::Builtin(function) = &node.function else {
            return self.generic_call(node.function.symbol(), &node.args);
        };
        match function {
            BuiltinFunction::Sqrt => {
                Ok(format!("<msqrt>{}</msqrt>", self.eval(Self::single(node)?)?))
            },
            BuiltinFunction::Cbrt => Ok(format!("<mroot><mrow>{}</mrow><mn>3</mn></mroot>",
                                                self.eval(Self::single(node)?)?)),
            BuiltinFunction::Abs => {
                Ok(format!("<mo>|</mo>{}<mo>|</mo>", self.eval(Self::single(node)?)?))
            },
            BuiltinFunction::Lg => Ok(format!("<msub><mi>log</mi><mn>10</mn></msub>{}",
                                              bracket(&self.eval(Self::single(node)?)?))),
            BuiltinFunction::Log => match node.args.as_slice() {
                [base, value] => Ok(format!("<msub><mi>log</mi>{}</msub>{}",
                                            self.argument(base)?,
                                            bracket(&self.eval(value)?))),
                args => Err(EvalError::ArgumentCount { expected: 2,
                                                       found:    args.len(), }),
            },
            BuiltinFunction::Not => {
                Ok(format!("<mo>&not;</mo>{}", self.argument(Self::single(node)?)?))
            },
            BuiltinFunction::Fact => {
                Ok(format!("{}<mo>!</mo>", self.argument(Self::single(node)?)?))
            },
            _ => self.generic_call(function.symbol(), &node.args),
        }
    }

    fn eval_indexed(&self, node: &IndexedNode) -> EvalResult<String> {
        let symbol = match node.function {
            IndexedFunction::Sum => "&sum;",
            IndexedFunction::Prod => "&prod;",
        };
        Ok(format!("<munderover><mo>{symbol}</mo><mrow><mi>{}</mi><mo>=</mo>{}</mrow>\
                    <mrow>{}</mrow></munderover><mrow>{}</mrow>",
                   node.variable,
                   self.eval(&node.start)?,
                   self.eval(&node.end)?,
                   self.argument(&node.body)?))
    }

    fn eval_number(&self, text: &str, _position: Position) -> EvalResult<String> {
        Ok(format!("<mn>{}</mn>", self.environment.style().localized_number(text)))
    }

    fn eval_variable(&self, name: &str, _position: Position) -> EvalResult<String> {
        Ok(format!("<mi>{name}</mi>"))
    }

    fn eval_constant(&self, constant: Constant, _position: Position) -> EvalResult<String> {
        let symbol = match constant {
            Constant::Pi => "&pi;",
            other => other.symbol(),
        };
        Ok(format!("<mi>{symbol}</mi>"))
    }
}
