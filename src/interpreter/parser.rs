use tracing::trace;

use crate::{
    ast::{
        Arity, BinaryOperator, Function, FunctionNode, IndexedFunction, IndexedNode, Node,
        OperatorNode, Position,
    },
    error::ParseError,
    interpreter::lexer::Token,
};

/// Result type used by the tokenizer and the tree builder.
pub type ParseResult<T> = Result<T, ParseError>;

const UNMATCHED_CLOSING: &str = "A closing bracket has no matching opening bracket.";
const UNMATCHED_OPENING: &str = "An opening bracket has no matching closing bracket.";

/// An entry of the operator stack.
#[derive(Debug)]
enum Pending {
    Operator {
        op:       BinaryOperator,
        position: Position,
    },
    Sign {
        position: Position,
    },
    Function {
        function: Function,
        arity:    Arity,
        position: Position,
    },
    Indexed {
        function: IndexedFunction,
        position: Position,
    },
    LeftBracket {
        position: Position,
    },
}

/// An entry of the output stack.
#[derive(Debug)]
enum Operand {
    Node(Node),
    Parameters {
        slots:    Vec<Vec<Token>>,
        position: Position,
    },
}

impl Operand {
    const fn position(&self) -> Position {
        match self {
            Self::Node(node) => node.position(),
            Self::Parameters { position, .. } => *position,
        }
    }
}

/// Builds a tree from a token sequence with the shunting-yard algorithm.
///
/// Values and parameter lists go to the output stack, everything else to the
/// operator stack. An incoming operator first reduces the operators that
/// bind at least as tightly (strictly tighter for `^`, the only
/// right-associative operator). Each parameter slot is built into its own
/// subtree recursively.
///
/// # Parameters
/// - `tokens`: Output of the tokenizer.
///
/// # Returns
/// The root of the tree.
///
/// # Errors
/// - `Bracket` when brackets do not pair up.
/// - `ArgumentCount` when a function receives the wrong number of arguments.
/// - `Syntax` for dangling operators, missing operands or an empty input.
pub fn build_tree(tokens: Vec<Token>) -> ParseResult<Node> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut output: Vec<Operand> = Vec::new();

    for token in tokens {
        match token {
            Token::Number { text, position } => {
                output.push(Operand::Node(Node::Number { text, position }));
            },
            Token::Variable { name, position } => {
                output.push(Operand::Node(Node::Variable { name, position }));
            },
            Token::Constant { constant, position } => {
                output.push(Operand::Node(Node::Constant { constant, position }));
            },
            Token::Parameters { slots, position } => {
                output.push(Operand::Parameters { slots, position });
            },
            Token::Function { function,
                              arity,
                              position, } => {
                pending.push(Pending::Function { function,
                                                 arity,
                                                 position });
            },
            Token::Indexed { function, position } => {
                pending.push(Pending::Indexed { function, position });
            },
            Token::Sign { position } => pending.push(Pending::Sign { position }),
            Token::LeftBracket { position } => pending.push(Pending::LeftBracket { position }),
            Token::Operator { op, position } => {
                while let Some(top) = pending.last()
                      && binds_before(top, op)
                {
                    let Some(top) = pending.pop() else { break };
                    reduce(&mut output, top)?;
                }
                pending.push(Pending::Operator { op, position });
            },
            Token::RightBracket { position } => loop {
                match pending.pop() {
                    None => return Err(ParseError::bracket(UNMATCHED_CLOSING, position)),
                    Some(Pending::LeftBracket { .. }) => break,
                    Some(top) => reduce(&mut output, top)?,
                }
            },
        }
    }

    while let Some(top) = pending.pop() {
        if let Pending::LeftBracket { position } = top {
            return Err(ParseError::bracket(UNMATCHED_OPENING, position));
        }
        reduce(&mut output, top)?;
    }

    match output.len() {
        0 => Err(ParseError::syntax(0)),
        1 => match output.pop() {
            Some(Operand::Node(node)) => Ok(node),
            Some(operand) => Err(ParseError::syntax(operand.position())),
            None => Err(ParseError::syntax(0)),
        },
        _ => {
            let position = output.last().map_or(0, Operand::position);
            Err(ParseError::syntax(position))
        },
    }
}

/// Returns `true` if `top` must be reduced before `incoming` is pushed.
fn binds_before(top: &Pending, incoming: BinaryOperator) -> bool {
    let top_precedence = match top {
        Pending::LeftBracket { .. } => return false,
        Pending::Operator { op, .. } => op.precedence(),
        Pending::Sign { .. } | Pending::Function { .. } | Pending::Indexed { .. } => u8::MAX,
    };
    incoming.precedence() < top_precedence
    || (!incoming.is_right_associative() && incoming.precedence() == top_precedence)
}

/// Pops the operands of `top` and pushes the node it forms.
fn reduce(output: &mut Vec<Operand>, top: Pending) -> ParseResult<()> {
    trace!(?top, depth = output.len(), "reducing");
    let node = match top {
        Pending::Sign { position } => {
            let operand = pop_node(output, position)?;
            Node::Operator(OperatorNode::sign(operand, position))
        },
        Pending::Operator { op, position } => {
            let right = pop_node(output, position)?;
            let left = pop_node(output, position)?;
            Node::Operator(OperatorNode::new(op, left, right, position))
        },
        Pending::Function { function,
                            arity,
                            position, } => {
            let slots = pop_parameters(output, function.symbol(), arity, position)?;
            let args = slots.into_iter().map(build_tree).collect::<ParseResult<Vec<_>>>()?;
            Node::Function(FunctionNode { function,
                                          args,
                                          position })
        },
        Pending::Indexed { function, position } => {
            let slots =
                pop_parameters(output, function.symbol(), IndexedFunction::ARITY, position)?;
            let mut args = slots.into_iter().map(build_tree).collect::<ParseResult<Vec<_>>>()?;
            let (Some(body), Some(end), Some(start), Some(Node::Variable { name, .. })) =
                (args.pop(), args.pop(), args.pop(), args.pop())
            else {
                return Err(ParseError::syntax(position));
            };
            Node::Indexed(IndexedNode { function,
                                        variable: name,
                                        start: Box::new(start),
                                        end: Box::new(end),
                                        body: Box::new(body),
                                        position })
        },
        Pending::LeftBracket { position } => {
            return Err(ParseError::bracket(UNMATCHED_OPENING, position));
        },
    };
    output.push(Operand::Node(node));
    Ok(())
}

fn pop_node(output: &mut Vec<Operand>, position: Position) -> ParseResult<Node> {
    match output.pop() {
        Some(Operand::Node(node)) => Ok(node),
        _ => Err(ParseError::syntax(position)),
    }
}

fn pop_parameters(output: &mut Vec<Operand>,
                  name: &str,
                  arity: Arity,
                  position: Position)
                  -> ParseResult<Vec<Vec<Token>>> {
    let Some(Operand::Parameters { slots, .. }) = output.pop() else {
        return Err(ParseError::syntax(position));
    };
    if !arity.accepts(slots.len()) {
        return Err(ParseError::ArgumentCount { name: name.to_string(),
                                               count: slots.len(),
                                               position });
    }
    Ok(slots)
}
