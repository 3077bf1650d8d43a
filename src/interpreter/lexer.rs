use std::mem;

use tracing::trace;

use crate::{
    ast::{Arity, BinaryOperator, Constant, Function, IndexedFunction, Position},
    error::ParseError,
    interpreter::{
        cursor::Cursor,
        format::SeparatorStyle,
        parser::ParseResult,
        symbols::{Symbol, SymbolTable},
    },
};

/// Represents a lexical token of an expression.
///
/// Brackets and parameter lists only exist between tokenizing and tree
/// building; they never appear in a finished tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A number literal, with grouping spaces removed.
    Number {
        /// The literal text, using the active decimal separator.
        text:     String,
        /// Position of the literal.
        position: Position,
    },
    /// A user variable or a bound iteration variable.
    Variable {
        /// The variable name.
        name:     String,
        /// Position of the name.
        position: Position,
    },
    /// A named constant such as `pi`.
    Constant {
        /// The constant.
        constant: Constant,
        /// Position of the name.
        position: Position,
    },
    /// A binary operator.
    Operator {
        /// The operator.
        op:       BinaryOperator,
        /// Position of the operator.
        position: Position,
    },
    /// A `-` found where a value was expected.
    Sign {
        /// Position of the minus.
        position: Position,
    },
    /// A built-in or user function name.
    Function {
        /// The function.
        function: Function,
        /// Arguments it accepts.
        arity:    Arity,
        /// Position of the name.
        position: Position,
    },
    /// `sum` or `prod`.
    Indexed {
        /// The function.
        function: IndexedFunction,
        /// Position of the name.
        position: Position,
    },
    /// `(`
    LeftBracket {
        /// Position of the bracket.
        position: Position,
    },
    /// `)`
    RightBracket {
        /// Position of the bracket.
        position: Position,
    },
    /// The arguments of the preceding function, one token list per slot.
    Parameters {
        /// Token lists, one per argument.
        slots:    Vec<Vec<Token>>,
        /// Position where the argument list starts.
        position: Position,
    },
}

impl Token {
    /// Returns the position of the token.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Number { position, .. }
            | Self::Variable { position, .. }
            | Self::Constant { position, .. }
            | Self::Operator { position, .. }
            | Self::Sign { position }
            | Self::Function { position, .. }
            | Self::Indexed { position, .. }
            | Self::LeftBracket { position }
            | Self::RightBracket { position }
            | Self::Parameters { position, .. } => *position,
        }
    }
}

/// What the previously read token was, as far as sign handling and implicit
/// multiplication care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Start,
    Value,
    Number,
    Operator,
    Sign,
    LeftBracket,
    RightBracket,
}

impl Class {
    const fn expects_value(self) -> bool {
        matches!(self, Self::Start | Self::Operator | Self::Sign | Self::LeftBracket)
    }
}

const INVALID_FUNCTION_USAGE: &str = "Invalid function usage.";
const INVALID_BINDER: &str = "Invalid index variable definition.";
const UNEQUAL_BRACKETS: &str = "Unequal number of opening and closing brackets.";

/// Turns expression text into tokens.
///
/// Numbers are matched first; anything else is looked up in the symbol
/// table, taking the longest symbol at the cursor. Function arguments are
/// tokenized recursively into [`Token::Parameters`].
#[derive(Debug)]
pub struct Tokenizer<'a> {
    symbols:   &'a SymbolTable,
    style:     SeparatorStyle,
    max_depth: Option<usize>,
    bound:     Vec<String>,
    depth:     usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer reading names from `symbols`.
    #[must_use]
    pub const fn new(symbols: &'a SymbolTable, style: SeparatorStyle) -> Self {
        Self { symbols,
               style,
               max_depth: None,
               bound: Vec::new(),
               depth: 0 }
    }

    /// Limits how deeply brackets and calls may nest.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Tokenizes a whole expression.
    ///
    /// # Example
    /// ```
    /// use exprcalc::{
    ///     SeparatorStyle,
    ///     interpreter::{lexer::Tokenizer, symbols::SymbolTable},
    /// };
    ///
    /// let table = SymbolTable::new();
    /// let tokens = Tokenizer::new(&table, SeparatorStyle::Dot).tokenize("2pi").unwrap();
    /// // The number, an implicit `*` and the constant.
    /// assert_eq!(tokens.len(), 3);
    /// ```
    pub fn tokenize(mut self, input: &str) -> ParseResult<Vec<Token>> {
        let mut cursor = Cursor::new(input);
        let mut tokens = Vec::new();
        let mut prev = Class::Start;
        while !cursor.is_eof() {
            prev = self.read_token(&mut tokens, prev, &mut cursor)?;
        }
        trace!(?tokens, "tokenized expression");
        Ok(tokens)
    }

    fn read_token(&mut self,
                  tokens: &mut Vec<Token>,
                  prev: Class,
                  cursor: &mut Cursor<'_>)
                  -> ParseResult<Class> {
        let position = cursor.position();
        let rest = cursor.remaining();

        if let Some(found) = self.style.number_pattern().find(rest) {
            let text = self.style.canonical_number(found.as_str());
            cursor.advance_by(found.end());
            tokens.push(Token::Number { text, position });
            return Ok(Class::Number);
        }

        let Some((len, symbol)) = self.lookup(rest) else {
            let character = rest.chars().next().unwrap_or(' ');
            return Err(ParseError::UnexpectedCharacter { character, position });
        };
        let text = &rest[..len];
        cursor.advance_by(len);

        match symbol {
            Symbol::Operator(op) if prev.expects_value() && op == BinaryOperator::Add => {
                if cursor.is_eof() {
                    return Err(ParseError::syntax(position));
                }
                let next = self.read_token(tokens, prev, cursor)?;
                if next == Class::Operator {
                    return Err(ParseError::syntax(position));
                }
                Ok(next)
            },
            Symbol::Operator(op) if prev.expects_value() && op == BinaryOperator::Sub => {
                tokens.push(Token::Sign { position });
                Ok(Class::Sign)
            },
            Symbol::Operator(op) => {
                tokens.push(Token::Operator { op, position });
                Ok(Class::Operator)
            },
            Symbol::Variable(_) => {
                Self::push_value(tokens, prev, Token::Variable { name: text.to_string(),
                                                                 position });
                Ok(Class::Value)
            },
            Symbol::Constant(constant) => {
                Self::push_value(tokens, prev, Token::Constant { constant, position });
                Ok(Class::Value)
            },
            Symbol::Builtin(function) => {
                tokens.push(Token::Function { function: Function::Builtin(function),
                                              arity: function.arity(),
                                              position });
                tokens.push(self.read_parameters(cursor, false, position)?);
                Ok(Class::Value)
            },
            Symbol::Function { arity, .. } => {
                tokens.push(Token::Function { function: Function::User(text.to_string()),
                                              arity,
                                              position });
                tokens.push(self.read_parameters(cursor, false, position)?);
                Ok(Class::Value)
            },
            Symbol::Indexed(function) => {
                tokens.push(Token::Indexed { function, position });
                tokens.push(self.read_parameters(cursor, true, position)?);
                Ok(Class::Value)
            },
            Symbol::LeftBracket => {
                self.enter(position)?;
                tokens.push(Token::LeftBracket { position });
                Ok(Class::LeftBracket)
            },
            Symbol::RightBracket => {
                self.depth = self.depth.saturating_sub(1);
                tokens.push(Token::RightBracket { position });
                Ok(Class::RightBracket)
            },
        }
    }

    /// Finds the longest symbol or bound iteration variable at the start of
    /// `rest`. Bound names shadow table entries of the same length.
    fn lookup(&self, rest: &str) -> Option<(usize, Symbol)> {
        let table = self.symbols
                        .longest_match(rest)
                        .map(|(text, symbol)| (text.len(), symbol.clone()));
        let bound = self.bound
                        .iter()
                        .filter(|name| rest.starts_with(name.as_str()))
                        .map(String::len)
                        .max();
        match (table, bound) {
            (Some((table_len, _)), Some(bound_len)) if bound_len >= table_len => {
                Some((bound_len, Symbol::Variable(None)))
            },
            (None, Some(bound_len)) => Some((bound_len, Symbol::Variable(None))),
            (table, _) => table,
        }
    }

    /// Pushes a variable or constant, inserting a `*` after a number.
    fn push_value(tokens: &mut Vec<Token>, prev: Class, token: Token) {
        if prev == Class::Number {
            tokens.push(Token::Operator { op:       BinaryOperator::Mul,
                                          position: token.position(), });
        }
        tokens.push(token);
    }

    fn enter(&mut self, position: Position) -> ParseResult<()> {
        self.depth += 1;
        if let Some(limit) = self.max_depth
           && self.depth > limit
        {
            return Err(ParseError::NestingTooDeep { limit, position });
        }
        Ok(())
    }

    /// Reads the argument list following a function name.
    fn read_parameters(&mut self,
                       cursor: &mut Cursor<'_>,
                       indexed: bool,
                       position: Position)
                       -> ParseResult<Token> {
        if cursor.is_eof() {
            return Err(ParseError::syntax_with(INVALID_FUNCTION_USAGE, position));
        }
        self.enter(position)?;
        let start = cursor.position();
        let slots = if indexed {
            self.read_indexed_slots(cursor, position)?
        } else {
            self.read_slots(cursor, false, position)?
        };
        self.depth -= 1;
        Ok(Token::Parameters { slots,
                               position: start })
    }

    /// Reads `(name, start, end, body)`, binding `name` inside the remaining
    /// slots only.
    fn read_indexed_slots(&mut self,
                          cursor: &mut Cursor<'_>,
                          position: Position)
                          -> ParseResult<Vec<Vec<Token>>> {
        let rest = cursor.remaining();
        let Some(captures) = self.style.binder_pattern().captures(rest) else {
            return Err(ParseError::syntax_with(INVALID_BINDER, cursor.position()));
        };
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            return Err(ParseError::syntax_with(INVALID_BINDER, cursor.position()));
        };
        let binder_position = cursor.position() + rest[..name.start()].chars().count();
        let name = name.as_str();
        if self.symbols.get(name).is_some_and(|symbol| !matches!(symbol, Symbol::Variable(_))) {
            return Err(ParseError::syntax_with(INVALID_BINDER, cursor.position()));
        }
        let binder = Token::Variable { name:     name.to_string(),
                                       position: binder_position, };
        cursor.advance_by(whole.end());

        self.bound.push(name.to_string());
        let remaining = self.read_slots(cursor, true, position);
        self.bound.pop();

        let mut slots = vec![vec![binder]];
        slots.extend(remaining?);
        Ok(slots)
    }

    /// Splits an argument list into slots.
    ///
    /// A bracketed list ends at the bracket matching its opening one, and
    /// separators split slots only at that depth. Without brackets the list
    /// is a single value, optionally preceded by signs.
    fn read_slots(&mut self,
                  cursor: &mut Cursor<'_>,
                  already_open: bool,
                  position: Position)
                  -> ParseResult<Vec<Vec<Token>>> {
        let separator = self.style.argument_separator();
        let bracketed = already_open || cursor.eat_char('(');
        if bracketed && !already_open && cursor.eat_char(')') {
            return Ok(Vec::new());
        }

        let mut slots = Vec::new();
        let mut current = Vec::new();
        let mut open = usize::from(bracketed);
        let mut close = 0;
        let mut prev = Class::Start;
        let mut closed = false;

        while !cursor.is_eof() {
            if bracketed && open == close + 1 {
                if cursor.eat_char(separator) {
                    slots.push(mem::take(&mut current));
                    prev = Class::Start;
                    continue;
                }
                if cursor.eat_char(')') {
                    closed = true;
                    break;
                }
            }
            prev = self.read_token(&mut current, prev, cursor)?;
            match prev {
                Class::LeftBracket => open += 1,
                Class::RightBracket => close += 1,
                _ => {},
            }
            if !bracketed && close >= open && prev != Class::Sign {
                break;
            }
        }

        if bracketed && !closed {
            return Err(ParseError::bracket(UNEQUAL_BRACKETS, position));
        }
        slots.push(current);
        Ok(slots)
    }
}
