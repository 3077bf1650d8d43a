use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Arity, BinaryOperator, BuiltinFunction, Constant, IndexedFunction},
    error::DefinitionError,
    interpreter::{
        format::{SeparatorStyle, is_valid_name},
        value::Value,
    },
};

/// A host or user function over doubles.
pub type MathFn = Rc<dyn Fn(&[f64]) -> f64>;

/// What a name in the symbol table stands for.
#[derive(Clone)]
pub enum Symbol {
    /// A binary operator.
    Operator(BinaryOperator),
    /// A built-in function.
    Builtin(BuiltinFunction),
    /// A function binding an iteration variable.
    Indexed(IndexedFunction),
    /// A named constant.
    Constant(Constant),
    /// `(`
    LeftBracket,
    /// `)`
    RightBracket,
    /// A user variable and its current value, if assigned.
    Variable(Option<Value>),
    /// A user function.
    Function {
        /// Number of arguments the function takes.
        arity: Arity,
        /// The callable.
        body:  MathFn,
    },
}

impl Symbol {
    /// Returns `true` for symbols that are part of every table.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        !matches!(self, Self::Variable(_) | Self::Function { .. })
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator(op) => f.debug_tuple("Operator").field(op).finish(),
            Self::Builtin(func) => f.debug_tuple("Builtin").field(func).finish(),
            Self::Indexed(func) => f.debug_tuple("Indexed").field(func).finish(),
            Self::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            Self::LeftBracket => f.write_str("LeftBracket"),
            Self::RightBracket => f.write_str("RightBracket"),
            Self::Variable(value) => f.debug_tuple("Variable").field(value).finish(),
            Self::Function { arity, .. } => {
                f.debug_struct("Function").field("arity", arity).finish_non_exhaustive()
            },
        }
    }
}

/// Maps symbol text to what it stands for.
///
/// The table is seeded with every operator, built-in function, constant and
/// bracket. User variables and functions are added and removed at runtime; a
/// name belongs to at most one entry.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: BTreeMap<String, Symbol>,
}

#[allow(clippy::new_without_default)]
impl SymbolTable {
    /// Creates a table holding only the built-in symbols.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        for op in BinaryOperator::ALL {
            entries.insert(op.symbol().to_string(), Symbol::Operator(op));
        }
        for &func in BuiltinFunction::ALL {
            entries.insert(func.symbol().to_string(), Symbol::Builtin(func));
        }
        for func in IndexedFunction::ALL {
            entries.insert(func.symbol().to_string(), Symbol::Indexed(func));
        }
        for constant in Constant::ALL {
            entries.insert(constant.symbol().to_string(), Symbol::Constant(constant));
        }
        entries.insert("(".to_string(), Symbol::LeftBracket);
        entries.insert(")".to_string(), Symbol::RightBracket);
        Self { entries }
    }

    /// Looks up a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    /// Returns `true` if the name is taken by any entry.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Finds the longest symbol the input starts with.
    ///
    /// Entries are visited in descending order, so a symbol is always seen
    /// before any of its prefixes (`>=` before `>`, `sinh` before `sin`).
    ///
    /// # Example
    /// ```
    /// use exprcalc::interpreter::symbols::SymbolTable;
    ///
    /// let table = SymbolTable::new();
    /// assert_eq!(table.longest_match(">>> 2").map(|(text, _)| text), Some(">>>"));
    /// assert_eq!(table.longest_match("sinh(1)").map(|(text, _)| text), Some("sinh"));
    /// assert!(table.longest_match("#").is_none());
    /// ```
    #[must_use]
    pub fn longest_match(&self, input: &str) -> Option<(&str, &Symbol)> {
        self.entries
            .iter()
            .rev()
            .find(|(text, _)| input.starts_with(text.as_str()))
            .map(|(text, symbol)| (text.as_str(), symbol))
    }

    /// Adds an unassigned variable.
    pub fn declare(&mut self, name: &str) -> Result<(), DefinitionError> {
        self.check_free(name)?;
        self.entries.insert(name.to_string(), Symbol::Variable(None));
        Ok(())
    }

    /// Assigns a variable, declaring it first if the name is free.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), DefinitionError> {
        match self.entries.get_mut(name) {
            Some(Symbol::Variable(slot)) => {
                *slot = Some(value);
                Ok(())
            },
            Some(_) => Err(DefinitionError::InvalidName { name: name.to_string() }),
            None => {
                self.check_free(name)?;
                self.entries.insert(name.to_string(), Symbol::Variable(Some(value)));
                Ok(())
            },
        }
    }

    /// Adds a user function.
    pub fn define(&mut self, name: &str, arity: Arity, body: MathFn) -> Result<(), DefinitionError> {
        self.check_free(name)?;
        self.entries.insert(name.to_string(), Symbol::Function { arity, body });
        Ok(())
    }

    /// Returns the value of a variable; `None` if it is unknown or unassigned.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        match self.entries.get(name) {
            Some(Symbol::Variable(value)) => value.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` if the name is a declared variable.
    #[must_use]
    pub fn is_variable(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Symbol::Variable(_)))
    }

    /// Returns the arity and body of a user function.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<(Arity, MathFn)> {
        match self.entries.get(name) {
            Some(Symbol::Function { arity, body }) => Some((*arity, Rc::clone(body))),
            _ => None,
        }
    }

    /// Removes a variable.
    pub fn remove_variable(&mut self, name: &str) -> Result<(), DefinitionError> {
        if !self.is_variable(name) {
            return Err(DefinitionError::UnknownVariable { name: name.to_string() });
        }
        self.entries.remove(name);
        Ok(())
    }

    /// Removes a user function.
    pub fn remove_function(&mut self, name: &str) -> Result<(), DefinitionError> {
        if !matches!(self.entries.get(name), Some(Symbol::Function { .. })) {
            return Err(DefinitionError::UnknownFunction { name: name.to_string() });
        }
        self.entries.remove(name);
        Ok(())
    }

    /// Removes every user variable.
    pub fn remove_all_variables(&mut self) {
        self.entries.retain(|_, symbol| !matches!(symbol, Symbol::Variable(_)));
    }

    /// Removes every user function.
    pub fn remove_all_functions(&mut self) {
        self.entries.retain(|_, symbol| !matches!(symbol, Symbol::Function { .. }));
    }

    /// Names of all user variables, in ascending order.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        self.names_where(|symbol| matches!(symbol, Symbol::Variable(_)))
    }

    /// Names of all user functions, in ascending order.
    #[must_use]
    pub fn functions(&self) -> Vec<String> {
        self.names_where(|symbol| matches!(symbol, Symbol::Function { .. }))
    }

    fn names_where(&self, keep: impl Fn(&Symbol) -> bool) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, symbol)| keep(symbol))
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn check_free(&self, name: &str) -> Result<(), DefinitionError> {
        if !is_valid_name(name) || self.contains(name) {
            return Err(DefinitionError::InvalidName { name: name.to_string() });
        }
        Ok(())
    }
}

#[derive(Debug)]
struct State {
    symbols: SymbolTable,
    style:   SeparatorStyle,
}

/// The shared symbol table and separator style of a parser.
///
/// Cloning an environment yields another handle to the same state: results
/// parsed from a parser read the variable values the parser holds at the
/// moment they are evaluated. The state is single-threaded.
#[derive(Debug, Clone)]
pub struct Environment {
    state: Rc<RefCell<State>>,
}

#[allow(clippy::new_without_default)]
impl Environment {
    /// Creates an environment with only the built-in symbols.
    #[must_use]
    pub fn new() -> Self {
        Self::with_style(SeparatorStyle::default())
    }

    /// Creates an environment with only the built-in symbols and the given
    /// separator style.
    #[must_use]
    pub fn with_style(style: SeparatorStyle) -> Self {
        Self { state: Rc::new(RefCell::new(State { symbols: SymbolTable::new(),
                                                   style })) }
    }

    /// The active separator style.
    #[must_use]
    pub fn style(&self) -> SeparatorStyle {
        self.state.borrow().style
    }

    /// Switches the separator style.
    pub fn set_style(&self, style: SeparatorStyle) {
        self.state.borrow_mut().style = style;
    }

    /// Returns the current value of a variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<Value> {
        self.state.borrow().symbols.variable(name).cloned()
    }

    /// Returns the arity and body of a user function.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<(Arity, MathFn)> {
        self.state.borrow().symbols.function(name)
    }

    /// Assigns a variable, declaring it if the name is free.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), DefinitionError> {
        debug!(name, %value, "assigning variable");
        self.with_symbols_mut(|symbols| symbols.assign(name, value))
    }

    /// Runs `f` with read access to the symbol table.
    pub fn with_symbols<T>(&self, f: impl FnOnce(&SymbolTable) -> T) -> T {
        f(&self.state.borrow().symbols)
    }

    /// Runs `f` with write access to the symbol table.
    pub fn with_symbols_mut<T>(&self, f: impl FnOnce(&mut SymbolTable) -> T) -> T {
        f(&mut self.state.borrow_mut().symbols)
    }
}

/// Documentation for one built-in symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo {
    /// The symbol text.
    pub symbol:      &'static str,
    /// What the symbol does.
    pub description: &'static str,
    /// A usage example and an expression for its expected result.
    pub example:     Option<(&'static str, &'static str)>,
}

macro_rules! reference_table {
    ($($symbol:literal => $description:literal $(, $usage:literal => $result:literal)?;)*) => {
        const REFERENCE: &[SymbolInfo] = &[
            $(SymbolInfo { symbol:      $symbol,
                           description: $description,
                           example:     reference_table!(@example $($usage, $result)?), },)*
        ];
    };
    (@example $usage:literal, $result:literal) => { Some(($usage, $result)) };
    (@example) => { None };
}

reference_table! {
    "+" => "Adds two numbers", "12 + 5" => "17";
    "-" => "Subtracts two numbers", "9 - 4" => "5";
    "*" => "Multiplies two numbers", "4 * 6" => "24";
    "/" => "Divides two numbers", "35 / 2" => "17.5";
    "^" => "Raises a number to the specified power", "4 ^ 3" => "64";
    "%" => "Remainder of the division of two numbers", "23 % 4" => "3";
    "=" => "Checks if two values are equal", "2*4 = 8" => "true";
    "<>" => "Checks if two values are not equal", "12 <> 14" => "true";
    "<" => "Checks if one value is less than another", "8 < 10" => "true";
    ">" => "Checks if one value is greater than another", "4.5 > -3" => "true";
    "<=" => "Checks if one value is less than or equal to another", "5 <= 5" => "true";
    ">=" => "Checks if one value is greater than or equal to another", "8 >= 7" => "true";
    "&&" => "Boolean and of two values", "2 < 3 && 3 < 2" => "false";
    "||" => "Boolean or of two values", "2 < 3 || 3 < 2" => "true";
    "&" => "Bitwise and of two integers", "6 & 11" => "2";
    "|" => "Bitwise or of two integers", "6 | 11" => "15";
    "^|" => "Bitwise xor of two integers", "6 ^| 11" => "13";
    "<<" => "Arithmetic left shift", "8 << 2" => "32";
    ">>" => "Arithmetic right shift", "-24 >> 2" => "-6";
    ">>>" => "Logical right shift of the low 32 bits", "16 >>> 2" => "4";
    "sqrt" => "Square root", "sqrt(49)" => "7";
    "cbrt" => "Cubic root", "cbrt(27)" => "3";
    "exp" => "Raises e to the specified power", "exp(2)" => "e^2";
    "sin" => "Sine of an angle", "sin(0)" => "0";
    "cos" => "Cosine of an angle", "cos(pi)" => "-1";
    "tan" => "Tangent of an angle", "tan(0)" => "0";
    "asin" => "Angle whose sine is the given number", "asin(0)" => "0";
    "acos" => "Angle whose cosine is the given number", "acos(-1)" => "pi";
    "atan" => "Angle whose tangent is the given number", "atan(0)" => "0";
    "sinh" => "Hyperbolic sine", "sinh(0)" => "0";
    "cosh" => "Hyperbolic cosine", "cosh(0)" => "1";
    "tanh" => "Hyperbolic tangent", "tanh(0)" => "0";
    "rad" => "Converts degrees to radians", "rad(180)" => "pi";
    "deg" => "Converts radians to degrees", "deg(pi)" => "180";
    "lg" => "Base 10 logarithm", "lg(10)" => "1";
    "ln" => "Natural logarithm", "ln(e)" => "1";
    "log" => "Logarithm to the given base", "log(2, 8)" => "3";
    "neg" => "Negates a number", "neg -23" => "23";
    "abs" => "Absolute value", "abs(-15)" => "15";
    "ceil" => "Smallest integer not less than the number", "ceil(2.7)" => "3";
    "flr" => "Largest integer not greater than the number", "flr(2.7)" => "2";
    "rnd" => "Rounds to the nearest integer", "rnd(2.7)" => "3";
    "sgn" => "Sign of a number", "sgn(-5)" => "-1";
    "trun" => "Integral part of a number", "trun(3.54)" => "3";
    "min" => "Minimum of the given values", "min(6, -5, 2)" => "-5";
    "max" => "Maximum of the given values", "max(6, -5, 2)" => "6";
    "avg" => "Arithmetic mean of the given values", "avg(6, -5, 2)" => "1";
    "and" => "Boolean and of all given values", "and(true, false, 0=0)" => "false";
    "or" => "Boolean or of all given values", "or(true, false, 0=0)" => "true";
    "xor" => "Boolean xor of all given values", "xor(true, false, 0=0)" => "false";
    "not" => "Boolean not", "not true" => "false";
    "fact" => "Factorial", "fact(5)" => "120";
    "if" => "Picks one of two values based on a condition", "if(-5 >= 0, 1, -1)" => "-1";
    "sum" => "Sum of a sequence of terms", "sum(i, 1, 10, 2^i)" => "2046";
    "prod" => "Product of a sequence of terms", "prod(i, 1, 5, i)" => "120";
    "pi" => "The number pi";
    "e" => "Euler's number";
    "true" => "Boolean true, the value 1";
    "false" => "Boolean false, the value 0";
    "(" => "Opening bracket";
    ")" => "Closing bracket";
}

/// Lists every built-in symbol with a description and, where one makes
/// sense, a usage example.
///
/// Examples are written with the default separator style.
///
/// # Example
/// ```
/// use exprcalc::interpreter::symbols::reference;
///
/// let sqrt = reference().iter().find(|info| info.symbol == "sqrt").unwrap();
/// assert_eq!(sqrt.example, Some(("sqrt(49)", "7")));
/// ```
#[must_use]
pub const fn reference() -> &'static [SymbolInfo] {
    REFERENCE
}
