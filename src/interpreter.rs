/// Character cursor over the input that skips whitespace between tokens.
mod cursor;
/// The evaluator module walks a parsed tree and produces a result.
///
/// Every evaluation strategy implements the same trait, so a tree can be
/// turned into a double, a decimal, a boolean, a closure or a rendering
/// without any change to the tree itself.
///
/// # Responsibilities
/// - Evaluates trees numerically in double, decimal and arbitrary-precision
///   decimal arithmetic.
/// - Renders trees as infix, postfix or MathML text.
/// - Compiles trees into reusable closures.
pub mod evaluator;
/// Number and name formats for the two separator styles.
pub mod format;
/// The lexer module tokenizes expressions.
///
/// Tokenization is driven by the symbol table: the longest known symbol at
/// the cursor wins, so user names can shadow shorter built-ins. Function
/// parameter lists are read eagerly into nested token groups.
///
/// # Responsibilities
/// - Recognizes numbers, symbols, signs and brackets with their positions.
/// - Inserts implicit multiplication between a number and a following name.
/// - Enforces the nesting limit and reports lexical errors.
pub mod lexer;
/// The parser module builds the expression tree from tokens.
///
/// # Responsibilities
/// - Applies operator precedence and associativity.
/// - Checks bracket balance and function argument counts.
pub mod parser;
/// The public parsing and evaluation entry points.
///
/// [`session::Parser`] owns the variables and functions of a session and
/// produces [`session::ParserResult`] values that can be evaluated, rendered
/// or compiled.
pub mod session;
/// The symbol table and the shared environment evaluators read from.
///
/// # Responsibilities
/// - Holds built-in symbols alongside user variables and functions.
/// - Validates names and rejects collisions.
/// - Describes every built-in symbol for reference listings.
pub mod symbols;
/// Values a variable can hold.
pub mod value;
