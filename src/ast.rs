use std::fmt;

/// Character offset into the parsed input, used for diagnostics.
pub type Position = usize;

/// Precedence shared by signs, function calls and plain values.
///
/// Nothing binds tighter than these, so a child carrying this precedence is
/// never wrapped in brackets when rendered.
pub const MAX_PRECEDENCE: u8 = u8::MAX;

/// Represents a binary operator.
///
/// Binary operators combine two operands. Every operator has a fixed symbol
/// in the input language, a precedence and an associativity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`^`)
    Pow,
    /// Modulo (`%`)
    Mod,
    /// Equal to (`=`)
    Equal,
    /// Not equal to (`<>`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
    /// Bitwise and (`&`)
    BitAnd,
    /// Bitwise or (`|`)
    BitOr,
    /// Bitwise exclusive or (`^|`)
    BitXor,
    /// Arithmetic shift left (`<<`)
    Shl,
    /// Arithmetic shift right (`>>`)
    Shr,
    /// Logical shift right on the low 32 bits (`>>>`)
    UShr,
}

impl BinaryOperator {
    /// Every binary operator, in declaration order.
    pub const ALL: [Self; 20] = [Self::Add,
                                 Self::Sub,
                                 Self::Mul,
                                 Self::Div,
                                 Self::Pow,
                                 Self::Mod,
                                 Self::Equal,
                                 Self::NotEqual,
                                 Self::Less,
                                 Self::Greater,
                                 Self::LessEqual,
                                 Self::GreaterEqual,
                                 Self::And,
                                 Self::Or,
                                 Self::BitAnd,
                                 Self::BitOr,
                                 Self::BitXor,
                                 Self::Shl,
                                 Self::Shr,
                                 Self::UShr];

    /// Returns the text this operator is written as.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Mod => "%",
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^|",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
        }
    }

    /// Returns the binding strength of the operator.
    ///
    /// Higher values bind tighter:
    ///
    /// | operators               | precedence |
    /// |-------------------------|------------|
    /// | `\|\|`                  | 2          |
    /// | `&&`                    | 3          |
    /// | `\|`                    | 4          |
    /// | `^\|`                   | 5          |
    /// | `&`                     | 6          |
    /// | `=` `<>`                | 7          |
    /// | `<` `>` `<=` `>=`       | 8          |
    /// | `<<` `>>` `>>>`         | 9          |
    /// | `+` `-`                 | 10         |
    /// | `*` `/` `%`             | 11         |
    /// | `^`                     | 12         |
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 2,
            Self::And => 3,
            Self::BitOr => 4,
            Self::BitXor => 5,
            Self::BitAnd => 6,
            Self::Equal | Self::NotEqual => 7,
            Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual => 8,
            Self::Shl | Self::Shr | Self::UShr => 9,
            Self::Add | Self::Sub => 10,
            Self::Mul | Self::Div | Self::Mod => 11,
            Self::Pow => 12,
        }
    }

    /// Only exponentiation groups from the right: `2^3^2` is `2^(3^2)`.
    #[must_use]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A named value that never changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// `pi`
    Pi,
    /// `e`, Euler's number.
    E,
    /// `true`, evaluates to 1.
    True,
    /// `false`, evaluates to 0.
    False,
}

impl Constant {
    /// Every constant.
    pub const ALL: [Self; 4] = [Self::Pi, Self::E, Self::True, Self::False];

    /// Returns the name the constant is written as.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
            Self::True => "true",
            Self::False => "false",
        }
    }

    /// Returns the double precision value of the constant.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
            Self::True => 1.0,
            Self::False => 0.0,
        }
    }
}

/// Specifies the allowed number of arguments for a function.
///
/// - `Exact(n)` means the function must receive exactly `n` arguments.
/// - `Variadic` means the function accepts one or more arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// A fixed argument count.
    Exact(usize),
    /// Any positive argument count.
    Variadic,
}

impl Arity {
    /// Returns `true` if a call with `count` arguments is well formed.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => n == count,
            Self::Variadic => count > 0,
        }
    }
}

/// Defines the built-in function enum together with its symbols and arities.
macro_rules! builtin_functions {
    ($($variant:ident => $symbol:literal, $arity:expr;)*) => {
        /// A function that is part of every symbol table.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum BuiltinFunction {
            $(
                #[doc = concat!("`", $symbol, "`")]
                $variant,
            )*
        }

        impl BuiltinFunction {
            /// Every built-in function.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the name the function is called by.
            #[must_use]
            pub const fn symbol(self) -> &'static str {
                match self {
                    $(Self::$variant => $symbol,)*
                }
            }

            /// Returns the number of arguments the function takes.
            #[must_use]
            pub const fn arity(self) -> Arity {
                match self {
                    $(Self::$variant => $arity,)*
                }
            }
        }
    };
}

builtin_functions! {
    Negate => "neg", Arity::Exact(1);
    Sqrt => "sqrt", Arity::Exact(1);
    Cbrt => "cbrt", Arity::Exact(1);
    Exp => "exp", Arity::Exact(1);
    Sin => "sin", Arity::Exact(1);
    Cos => "cos", Arity::Exact(1);
    Tan => "tan", Arity::Exact(1);
    Abs => "abs", Arity::Exact(1);
    Lg => "lg", Arity::Exact(1);
    Ln => "ln", Arity::Exact(1);
    Asin => "asin", Arity::Exact(1);
    Acos => "acos", Arity::Exact(1);
    Atan => "atan", Arity::Exact(1);
    Sinh => "sinh", Arity::Exact(1);
    Cosh => "cosh", Arity::Exact(1);
    Tanh => "tanh", Arity::Exact(1);
    Rad => "rad", Arity::Exact(1);
    Deg => "deg", Arity::Exact(1);
    Ceil => "ceil", Arity::Exact(1);
    Floor => "flr", Arity::Exact(1);
    Round => "rnd", Arity::Exact(1);
    Sign => "sgn", Arity::Exact(1);
    Trunc => "trun", Arity::Exact(1);
    Not => "not", Arity::Exact(1);
    Fact => "fact", Arity::Exact(1);
    Log => "log", Arity::Exact(2);
    If => "if", Arity::Exact(3);
    Min => "min", Arity::Variadic;
    Max => "max", Arity::Variadic;
    Avg => "avg", Arity::Variadic;
    And => "and", Arity::Variadic;
    Or => "or", Arity::Variadic;
    Xor => "xor", Arity::Variadic;
}

/// A function that binds an iteration variable over an inclusive range.
///
/// Written as `sum(i, start, end, body)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IndexedFunction {
    /// `sum`, accumulates by addition starting from 0.
    Sum,
    /// `prod`, accumulates by multiplication starting from 1.
    Prod,
}

impl IndexedFunction {
    /// Every indexed function.
    pub const ALL: [Self; 2] = [Self::Sum, Self::Prod];
    /// Binder, start, end and body.
    pub const ARITY: Arity = Arity::Exact(4);

    /// Returns the name the function is called by.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Prod => "prod",
        }
    }

    /// Returns the accumulator's starting value.
    #[must_use]
    pub const fn identity(self) -> f64 {
        match self {
            Self::Sum => 0.0,
            Self::Prod => 1.0,
        }
    }
}

/// The callee of a function node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    /// A built-in function.
    Builtin(BuiltinFunction),
    /// A function registered on the parser, looked up by name when evaluated.
    User(String),
}

impl Function {
    /// Returns the name the function is called by.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Builtin(builtin) => builtin.symbol(),
            Self::User(name) => name,
        }
    }
}

/// A binary operation, or a prefix sign.
///
/// A sign is stored as a subtraction whose left operand is a synthesized
/// zero literal, so `-x` evaluates as `0 - x` in every numeric strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorNode {
    /// The operator applied to the operands.
    pub op:       BinaryOperator,
    /// Left operand.
    pub left:     Box<Node>,
    /// Right operand.
    pub right:    Box<Node>,
    /// Whether the node is a prefix sign rather than a binary operation.
    pub sign:     bool,
    /// Position of the operator in the input.
    pub position: Position,
}

impl OperatorNode {
    /// Creates a binary operation.
    #[must_use]
    pub fn new(op: BinaryOperator, left: Node, right: Node, position: Position) -> Self {
        Self { op,
               left: Box::new(left),
               right: Box::new(right),
               sign: false,
               position }
    }

    /// Creates a prefix sign over `operand`.
    #[must_use]
    pub fn sign(operand: Node, position: Position) -> Self {
        Self { op: BinaryOperator::Sub,
               left: Box::new(Node::Number { text: "0".to_string(),
                                             position }),
               right: Box::new(operand),
               sign: true,
               position }
    }

    /// Signs bind tighter than every binary operator.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        if self.sign { MAX_PRECEDENCE } else { self.op.precedence() }
    }
}

/// A call of a built-in or user function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    /// The function being called.
    pub function: Function,
    /// One subtree per argument slot.
    pub args:     Vec<Node>,
    /// Position of the function name in the input.
    pub position: Position,
}

/// A summation or product over an inclusive integer range.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedNode {
    /// `sum` or `prod`.
    pub function: IndexedFunction,
    /// Name of the bound iteration variable.
    pub variable: String,
    /// First value of the iteration variable.
    pub start:    Box<Node>,
    /// Last value of the iteration variable, inclusive.
    pub end:      Box<Node>,
    /// Expression evaluated once per step.
    pub body:     Box<Node>,
    /// Position of the function name in the input.
    pub position: Position,
}

/// An abstract syntax tree (AST) node representing a parsed expression.
///
/// Every node exposes a symbol and the position it was read from. Trees are
/// immutable once built and can be evaluated any number of times.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A numeric literal, kept as text so exact evaluators lose no digits.
    Number {
        /// Literal text with grouping spaces removed and `.` as decimal point.
        text:     String,
        /// Position in the input.
        position: Position,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name:     String,
        /// Position in the input.
        position: Position,
    },
    /// One of the built-in constants.
    Constant {
        /// Which constant.
        constant: Constant,
        /// Position in the input.
        position: Position,
    },
    /// Binary operation or sign.
    Operator(OperatorNode),
    /// Function call.
    Function(FunctionNode),
    /// Indexed summation or product.
    Indexed(IndexedNode),
}

impl Node {
    /// Returns the text the node was written as.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Number { text, .. } => text,
            Self::Variable { name, .. } => name,
            Self::Constant { constant, .. } => constant.symbol(),
            Self::Operator(node) => node.op.symbol(),
            Self::Function(node) => node.function.symbol(),
            Self::Indexed(node) => node.function.symbol(),
        }
    }

    /// Returns where the node was read from.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Number { position, .. }
            | Self::Variable { position, .. }
            | Self::Constant { position, .. } => *position,
            Self::Operator(node) => node.position,
            Self::Function(node) => node.position,
            Self::Indexed(node) => node.position,
        }
    }

    /// Returns the binding strength used to decide bracketing.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Operator(node) => node.precedence(),
            _ => MAX_PRECEDENCE,
        }
    }

    /// Returns the child subtrees in evaluation order.
    ///
    /// The binder of an indexed node is a name, not a subtree, and is not
    /// included.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Number { .. } | Self::Variable { .. } | Self::Constant { .. } => Vec::new(),
            Self::Operator(node) => vec![&node.left, &node.right],
            Self::Function(node) => node.args.iter().collect(),
            Self::Indexed(node) => vec![&node.start, &node.end, &node.body],
        }
    }
}
