use once_cell::sync::Lazy;
use regex::Regex;

/// Builds the pattern for a number literal.
///
/// A literal is either digits and spaces followed by the separator and at
/// least one digit, or a digit followed by digits and spaces. Either form may
/// carry an exponent introduced by a capital `E`; a lowercase `e` is Euler's
/// number and never part of a literal.
fn number_regex(separator: char, whole: bool) -> Regex {
    let separator = regex::escape(&separator.to_string());
    let end = if whole { "$" } else { "" };
    Regex::new(&format!(r"^(?:[0-9 ]*{separator}[0-9]+|[0-9][0-9 ]*)(?:E[+-]?[0-9][0-9 ]*)?{end}"))
        .expect("number pattern is valid")
}

/// Builds the pattern for `(name<separator>` at the start of an indexed call.
fn binder_regex(separator: char) -> Regex {
    let separator = regex::escape(&separator.to_string());
    Regex::new(&format!(r"^\(\s*([a-zA-Z]+[0-9]*)\s*{separator}")).expect("binder pattern is valid")
}

static DOT_NUMBER: Lazy<Regex> = Lazy::new(|| number_regex('.', false));
static COMMA_NUMBER: Lazy<Regex> = Lazy::new(|| number_regex(',', false));
static DOT_WHOLE_NUMBER: Lazy<Regex> = Lazy::new(|| number_regex('.', true));
static COMMA_WHOLE_NUMBER: Lazy<Regex> = Lazy::new(|| number_regex(',', true));
static DOT_BINDER: Lazy<Regex> = Lazy::new(|| binder_regex(','));
static COMMA_BINDER: Lazy<Regex> = Lazy::new(|| binder_regex(';'));
static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+[0-9]*$").expect("name pattern is valid"));

/// Returns `true` if `name` has the shape of a variable or function name:
/// letters optionally followed by digits.
///
/// # Example
/// ```
/// use exprcalc::interpreter::format::is_valid_name;
///
/// assert!(is_valid_name("x1"));
/// assert!(!is_valid_name("a1b"));
/// assert!(!is_valid_name("1a"));
/// ```
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Locale convention for decimal points and argument lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeparatorStyle {
    /// `1.5` and `max(1, 2)`.
    #[default]
    Dot,
    /// `1,5` and `max(1; 2)`.
    Comma,
}

impl SeparatorStyle {
    /// The character between the integral and fractional digits.
    #[must_use]
    pub const fn decimal_separator(self) -> char {
        match self {
            Self::Dot => '.',
            Self::Comma => ',',
        }
    }

    /// The character between function arguments.
    #[must_use]
    pub const fn argument_separator(self) -> char {
        match self {
            Self::Dot => ',',
            Self::Comma => ';',
        }
    }

    /// Pattern matching a number literal at the start of the input.
    #[must_use]
    pub fn number_pattern(self) -> &'static Regex {
        match self {
            Self::Dot => &DOT_NUMBER,
            Self::Comma => &COMMA_NUMBER,
        }
    }

    /// Pattern matching the opening `(name,` of an indexed call.
    #[must_use]
    pub fn binder_pattern(self) -> &'static Regex {
        match self {
            Self::Dot => &DOT_BINDER,
            Self::Comma => &COMMA_BINDER,
        }
    }

    /// Returns `true` if the whole of `text` is a number literal.
    ///
    /// # Example
    /// ```
    /// use exprcalc::SeparatorStyle;
    ///
    /// assert!(SeparatorStyle::Dot.is_valid_number("1 000.25E-3"));
    /// assert!(SeparatorStyle::Comma.is_valid_number("0,5"));
    /// assert!(!SeparatorStyle::Dot.is_valid_number("2e3"));
    /// ```
    #[must_use]
    pub fn is_valid_number(self, text: &str) -> bool {
        let pattern = match self {
            Self::Dot => &DOT_WHOLE_NUMBER,
            Self::Comma => &COMMA_WHOLE_NUMBER,
        };
        pattern.is_match(text)
    }

    /// Rewrites a number literal written in this style with `.` as decimal
    /// point and no grouping spaces. Trees store literals in this form.
    ///
    /// # Example
    /// ```
    /// use exprcalc::SeparatorStyle;
    ///
    /// assert_eq!(SeparatorStyle::Comma.canonical_number("1 000,5"), "1000.5");
    /// assert_eq!(SeparatorStyle::Dot.canonical_number("2.5E3"), "2.5E3");
    /// ```
    #[must_use]
    pub fn canonical_number(self, text: &str) -> String {
        text.chars()
            .filter(|c| *c != ' ')
            .map(|c| if c == self.decimal_separator() { '.' } else { c })
            .collect()
    }

    /// Writes a canonical number literal in this style.
    #[must_use]
    pub fn localized_number(self, text: &str) -> String {
        match self {
            Self::Dot => text.to_string(),
            Self::Comma => text.replace('.', ","),
        }
    }

    /// Reads a number literal written in this style as a double.
    #[must_use]
    pub fn parse_f64(self, text: &str) -> Option<f64> {
        self.canonical_number(text).parse().ok()
    }
}
