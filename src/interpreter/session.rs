use std::{collections::BTreeMap, fmt, rc::Rc};

use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    ast::{Arity, Node},
    error::{DefinitionError, Error},
    interpreter::{
        evaluator::{
            big_decimal::BigDecimalEvaluator,
            boolean::BooleanEvaluator,
            compile::{CompiledFunction, CompilingEvaluator},
            core::{EvalResult, EvaluationOptions, Evaluator},
            decimal::DecimalEvaluator,
            double::DoubleEvaluator,
            mathml::{MATHML_NAMESPACE, MathMlEvaluator},
            text::{InfixEvaluator, PostfixEvaluator},
        },
        format::{SeparatorStyle, is_valid_name},
        lexer::Tokenizer,
        parser::{ParseResult, build_tree},
        symbols::{Environment, MathFn},
        value::Value,
    },
    numeric::big_decimal::BigDecimal,
};

/// Parses expressions against a set of user variables and functions.
///
/// The parser owns the symbol table. Results it produces share that table,
/// so changing a variable changes what an already parsed expression
/// evaluates to.
///
/// # Example
/// ```
/// use exprcalc::Parser;
///
/// let mut parser = Parser::with_variables(&["x"]).unwrap();
/// let result = parser.parse("2*x + 5").unwrap();
///
/// parser.set_variable("x", 1).unwrap();
/// assert_eq!(result.evaluate().unwrap(), 7.0);
///
/// parser.set_variable("x", 2.5).unwrap();
/// assert_eq!(result.evaluate().unwrap(), 10.0);
/// ```
#[derive(Debug)]
pub struct Parser {
    environment: Environment,
    max_depth:   Option<usize>,
}

#[allow(clippy::new_without_default)]
impl Parser {
    /// Creates a parser that knows only the built-in symbols.
    #[must_use]
    pub fn new() -> Self {
        Self { environment: Environment::new(),
               max_depth:   None, }
    }

    /// Creates a parser with the given variables declared but unassigned.
    ///
    /// # Errors
    /// `InvalidName` if a name is malformed, a built-in or given twice.
    pub fn with_variables(names: &[&str]) -> Result<Self, DefinitionError> {
        let mut parser = Self::new();
        for name in names {
            parser.add_variable(name)?;
        }
        Ok(parser)
    }

    /// Returns a handle to the shared symbol table and separator style.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.clone()
    }

    /// The active separator style.
    #[must_use]
    pub fn separator_style(&self) -> SeparatorStyle {
        self.environment.style()
    }

    /// Switches between `1.5, max(1, 2)` and `1,5; max(1; 2)` conventions.
    ///
    /// Affects later parsing and rendering, and how number literals of
    /// existing results are read.
    pub fn set_separator_style(&mut self, style: SeparatorStyle) {
        self.environment.set_style(style);
    }

    /// The nesting limit for brackets and calls, if any.
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Limits how deeply brackets and calls may nest in parsed input.
    pub const fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.max_depth = max_depth;
    }

    /// Declares an unassigned variable.
    ///
    /// # Errors
    /// `InvalidName` if the name is malformed or already taken.
    pub fn add_variable(&mut self, name: &str) -> Result<(), DefinitionError> {
        debug!(name, "declaring variable");
        self.environment.with_symbols_mut(|symbols| symbols.declare(name))
    }

    /// Assigns a variable, declaring it if the name is free.
    ///
    /// # Errors
    /// `InvalidName` if the name is malformed or taken by a function or
    /// built-in.
    pub fn set_variable(&mut self, name: &str, value: impl Into<Value>) -> Result<(), DefinitionError> {
        self.environment.assign(name, value.into())
    }

    /// Returns the value of a variable; `None` if it is unknown or unassigned.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.environment.variable(name)
    }

    /// Removes a variable.
    ///
    /// # Errors
    /// `UnknownVariable` if there is no such variable.
    pub fn remove_variable(&mut self, name: &str) -> Result<(), DefinitionError> {
        debug!(name, "removing variable");
        self.environment.with_symbols_mut(|symbols| symbols.remove_variable(name))
    }

    /// Removes every variable.
    pub fn remove_all_variables(&mut self) {
        self.environment.with_symbols_mut(|symbols| symbols.remove_all_variables());
    }

    /// Names of all declared variables.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        self.environment.with_symbols(|symbols| symbols.variables())
    }

    /// Names of all user functions.
    #[must_use]
    pub fn functions(&self) -> Vec<String> {
        self.environment.with_symbols(|symbols| symbols.functions())
    }

    /// Defines a function from an expression over the named arguments.
    ///
    /// The expression is parsed by a separate parser that knows only the
    /// arguments, then compiled once.
    ///
    /// # Errors
    /// - `InvalidName` if the function name is malformed or taken.
    /// - `InvalidFunction` if the arguments or the expression are invalid.
    ///
    /// # Example
    /// ```
    /// use exprcalc::Parser;
    ///
    /// let mut parser = Parser::new();
    /// parser.add_function("hyp", "sqrt(a^2 + b^2)", &["a", "b"]).unwrap();
    /// assert_eq!(parser.parse("hyp(3, 4)").unwrap().evaluate().unwrap(), 5.0);
    /// ```
    pub fn add_function(&mut self,
                        name: &str,
                        expression: &str,
                        args: &[&str])
                        -> Result<(), DefinitionError> {
        if self.is_defined(name) || !is_valid_name(name) {
            return Err(DefinitionError::InvalidName { name: name.to_string() });
        }
        let invalid = |source: Error| DefinitionError::InvalidFunction { name:   name.to_string(),
                                                                         source: Box::new(source), };

        let mut child = Self::with_variables(args).map_err(|e| invalid(e.into()))?;
        child.set_separator_style(self.separator_style());
        let function = child.parse(expression)
                            .map_err(|e| invalid(e.into()))?
                            .compile(args)
                            .map_err(|e| invalid(e.into()))?;

        debug!(name, arity = args.len(), "defining function");
        self.add_math_fn(name, Arity::Exact(args.len()), function.into_math_fn())
    }

    /// Registers a host function of one argument.
    ///
    /// # Errors
    /// `InvalidName` if the name is malformed or taken.
    pub fn add_one_param_function(&mut self,
                                  name: &str,
                                  f: impl Fn(f64) -> f64 + 'static)
                                  -> Result<(), DefinitionError> {
        self.add_math_fn(name, Arity::Exact(1), Rc::new(move |v: &[f64]| match v {
                             [a] => f(*a),
                             _ => f64::NAN,
                         }))
    }

    /// Registers a host function of two arguments.
    ///
    /// # Errors
    /// `InvalidName` if the name is malformed or taken.
    pub fn add_two_param_function(&mut self,
                                  name: &str,
                                  f: impl Fn(f64, f64) -> f64 + 'static)
                                  -> Result<(), DefinitionError> {
        self.add_math_fn(name, Arity::Exact(2), Rc::new(move |v: &[f64]| match v {
                             [a, b] => f(*a, *b),
                             _ => f64::NAN,
                         }))
    }

    /// Registers a host function of three arguments.
    ///
    /// # Errors
    /// `InvalidName` if the name is malformed or taken.
    pub fn add_three_param_function(&mut self,
                                    name: &str,
                                    f: impl Fn(f64, f64, f64) -> f64 + 'static)
                                    -> Result<(), DefinitionError> {
        self.add_math_fn(name,
                         Arity::Exact(3),
                         Rc::new(move |v: &[f64]| match v {
                             [a, b, c] => f(*a, *b, *c),
                             _ => f64::NAN,
                         }))
    }

    /// Registers a host function taking one or more arguments.
    ///
    /// # Errors
    /// `InvalidName` if the name is malformed or taken.
    ///
    /// # Example
    /// ```
    /// use exprcalc::Parser;
    ///
    /// let mut parser = Parser::new();
    /// parser.add_multi_param_function("total", |v| v.iter().sum()).unwrap();
    /// assert_eq!(parser.parse("total(1, 2, 3)").unwrap().evaluate().unwrap(), 6.0);
    /// ```
    pub fn add_multi_param_function(&mut self,
                                    name: &str,
                                    f: impl Fn(&[f64]) -> f64 + 'static)
                                    -> Result<(), DefinitionError> {
        self.add_math_fn(name, Arity::Variadic, Rc::new(f))
    }

    fn add_math_fn(&mut self, name: &str, arity: Arity, body: MathFn) -> Result<(), DefinitionError> {
        self.environment.with_symbols_mut(|symbols| symbols.define(name, arity, body))
    }

    /// Removes a user function.
    ///
    /// # Errors
    /// `UnknownFunction` if there is no such function.
    pub fn remove_function(&mut self, name: &str) -> Result<(), DefinitionError> {
        debug!(name, "removing function");
        self.environment.with_symbols_mut(|symbols| symbols.remove_function(name))
    }

    /// Removes every user function.
    pub fn remove_all_functions(&mut self) {
        self.environment.with_symbols_mut(|symbols| symbols.remove_all_functions());
    }

    /// Returns `true` if the name is a built-in, a variable or a function.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.environment.with_symbols(|symbols| symbols.contains(name))
    }

    /// Returns `true` if `item` could appear as one piece of an expression:
    /// a number, a defined name or a separator.
    ///
    /// # Example
    /// ```
    /// use exprcalc::Parser;
    ///
    /// let parser = Parser::new();
    /// assert!(parser.is_valid_item(".56E+10"));
    /// assert!(parser.is_valid_item("sin"));
    /// assert!(!parser.is_valid_item("4+2"));
    /// ```
    #[must_use]
    pub fn is_valid_item(&self, item: &str) -> bool {
        let item: String = item.chars().filter(|c| *c != ' ').collect();
        if item.is_empty() {
            return true;
        }
        let style = self.separator_style();
        let separator = |c: char| item.chars().eq(std::iter::once(c));
        style.is_valid_number(&item)
        || self.is_defined(&item)
        || separator(style.argument_separator())
        || separator(style.decimal_separator())
    }

    /// Checks that an expression parses.
    ///
    /// # Errors
    /// The error parsing would report.
    pub fn validate(&self, expression: &str) -> ParseResult<()> {
        self.parse(expression).map(|_| ())
    }

    /// Returns `true` if an expression parses.
    #[must_use]
    pub fn is_valid(&self, expression: &str) -> bool {
        self.validate(expression).is_ok()
    }

    /// Parses an expression. Blank input parses as `0`.
    ///
    /// # Errors
    /// Lexical, syntax, bracket, argument count or nesting errors, each with
    /// the character position it was found at.
    pub fn parse(&self, expression: &str) -> ParseResult<ParserResult> {
        if expression.trim().is_empty() {
            return Ok(ParserResult { environment: self.environment(),
                                     tree:        Node::Number { text:     "0".to_string(),
                                                                 position: 0, }, });
        }
        let style = self.separator_style();
        let tokens = self.environment.with_symbols(|symbols| {
                                         Tokenizer::new(symbols, style).with_max_depth(self.max_depth)
                                                                       .tokenize(expression)
                                     })?;
        let tree = build_tree(tokens)?;
        Ok(ParserResult { environment: self.environment(),
                          tree })
    }

    /// Parses and evaluates an expression in one step.
    ///
    /// # Example
    /// ```
    /// use exprcalc::Parser;
    ///
    /// assert_eq!(Parser::evaluate("sum(i, 1, 10, 2^i)").unwrap(), 2046.0);
    /// ```
    pub fn evaluate(expression: &str) -> Result<f64, Error> {
        Self::evaluate_with_style(expression, SeparatorStyle::default())
    }

    /// Parses and evaluates an expression written in the given style.
    pub fn evaluate_with_style(expression: &str, style: SeparatorStyle) -> Result<f64, Error> {
        let mut parser = Self::new();
        parser.set_separator_style(style);
        Ok(parser.parse(expression)?.evaluate()?)
    }

    /// Like [`Parser::evaluate`], but returns `None` on any error and on NaN.
    #[must_use]
    pub fn try_evaluate(expression: &str) -> Option<f64> {
        Self::evaluate(expression).ok().filter(|value| !value.is_nan())
    }
}

/// A parsed expression, ready to be evaluated any number of times.
#[derive(Debug, Clone)]
pub struct ParserResult {
    environment: Environment,
    tree:        Node,
}

impl ParserResult {
    /// The parsed tree.
    #[must_use]
    pub const fn tree(&self) -> &Node {
        &self.tree
    }

    /// Evaluates the tree with any strategy.
    ///
    /// # Example
    /// ```
    /// use exprcalc::{EvaluationOptions, Parser, interpreter::evaluator::text::PostfixEvaluator};
    ///
    /// let result = Parser::new().parse("1 + 2").unwrap();
    /// let postfix = result.evaluate_as::<PostfixEvaluator>(EvaluationOptions::default());
    /// assert_eq!(postfix.unwrap(), "1 2 +");
    /// ```
    pub fn evaluate_as<E: Evaluator>(&self, options: EvaluationOptions) -> EvalResult<E::Output> {
        E::new(self.environment.clone(), options).eval(&self.tree)
    }

    /// Evaluates to a double with default options.
    pub fn evaluate(&self) -> EvalResult<f64> {
        self.evaluate_with(EvaluationOptions::default())
    }

    /// Evaluates to a double.
    pub fn evaluate_with(&self, options: EvaluationOptions) -> EvalResult<f64> {
        self.evaluate_as::<DoubleEvaluator>(options)
    }

    /// Evaluates to a fixed precision decimal with default options.
    pub fn evaluate_decimal(&self) -> EvalResult<Decimal> {
        self.evaluate_decimal_with(EvaluationOptions::default())
    }

    /// Evaluates to a fixed precision decimal.
    pub fn evaluate_decimal_with(&self, options: EvaluationOptions) -> EvalResult<Decimal> {
        self.evaluate_as::<DecimalEvaluator>(options)
    }

    /// Evaluates to an arbitrary-precision decimal with default options.
    pub fn evaluate_big_decimal(&self) -> EvalResult<BigDecimal> {
        self.evaluate_big_decimal_with(EvaluationOptions::default())
    }

    /// Evaluates to an arbitrary-precision decimal.
    pub fn evaluate_big_decimal_with(&self, options: EvaluationOptions) -> EvalResult<BigDecimal> {
        self.evaluate_as::<BigDecimalEvaluator>(options)
    }

    /// Evaluates to a boolean with default options.
    pub fn evaluate_bool(&self) -> EvalResult<bool> {
        self.evaluate_bool_with(EvaluationOptions::default())
    }

    /// Evaluates to a boolean. The result must be 0 or 1 within epsilon.
    pub fn evaluate_bool_with(&self, options: EvaluationOptions) -> EvalResult<bool> {
        self.evaluate_as::<BooleanEvaluator>(options)
    }

    /// Renders the expression in infix notation.
    pub fn expression(&self) -> EvalResult<String> {
        self.evaluate_as::<InfixEvaluator>(EvaluationOptions::default())
    }

    /// Renders the expression in postfix notation.
    pub fn postfix_expression(&self) -> EvalResult<String> {
        self.evaluate_as::<PostfixEvaluator>(EvaluationOptions::default())
    }

    /// Renders the expression as a MathML `<math>` element.
    pub fn mathml(&self) -> EvalResult<String> {
        let body = self.evaluate_as::<MathMlEvaluator>(EvaluationOptions::default())?;
        Ok(format!("<math xmlns=\"{MATHML_NAMESPACE}\">{body}</math>"))
    }

    /// Evaluates once per value, assigning each value to `variable` first.
    ///
    /// The variable keeps the last value afterwards.
    ///
    /// # Errors
    /// A definition error if `variable` cannot hold a value, or the first
    /// evaluation error.
    ///
    /// # Example
    /// ```
    /// use exprcalc::Parser;
    ///
    /// let parser = Parser::with_variables(&["x"]).unwrap();
    /// let squares = parser.parse("x^2").unwrap().evaluate_list("x", [1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(squares.values().copied().collect::<Vec<_>>(), vec![1.0, 4.0, 9.0]);
    /// ```
    pub fn evaluate_list(&self,
                         variable: &str,
                         values: impl IntoIterator<Item = f64>)
                         -> Result<BTreeMap<OrderedFloat<f64>, f64>, Error> {
        self.evaluate_list_with(variable, values, EvaluationOptions::default())
    }

    /// Like [`ParserResult::evaluate_list`], with explicit options.
    pub fn evaluate_list_with(&self,
                              variable: &str,
                              values: impl IntoIterator<Item = f64>,
                              options: EvaluationOptions)
                              -> Result<BTreeMap<OrderedFloat<f64>, f64>, Error> {
        let evaluator = DoubleEvaluator::new(self.environment.clone(), options);
        let mut results = BTreeMap::new();
        for value in values {
            self.environment.assign(variable, Value::Real(value))?;
            results.insert(OrderedFloat(value), evaluator.eval(&self.tree)?);
        }
        Ok(results)
    }

    /// Evaluates for the `count` consecutive integers starting at `start`.
    pub fn evaluate_range(&self,
                          variable: &str,
                          start: i32,
                          count: u32)
                          -> Result<BTreeMap<OrderedFloat<f64>, f64>, Error> {
        let values = (0..count).map(|offset| f64::from(start) + f64::from(offset));
        self.evaluate_list(variable, values)
    }

    /// Compiles the expression into a function of the named parameters.
    ///
    /// Variables that are not parameters are read now; later assignments do
    /// not affect the compiled function.
    ///
    /// # Errors
    /// `UnassignedVariable` if a variable that is not a parameter has no
    /// value.
    pub fn compile(&self, parameters: &[&str]) -> EvalResult<CompiledFunction> {
        let parameters: Vec<String> = parameters.iter().map(ToString::to_string).collect();
        let code = CompilingEvaluator::new(self.environment.clone(), EvaluationOptions::default())
            .with_parameters(parameters.clone())
            .eval(&self.tree)?;
        Ok(CompiledFunction::new(parameters, code))
    }
}

impl fmt::Display for ParserResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expression() {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}
